//! Allocates festival volunteers to crews by skill.
//!
//! [`engine::run_auto_assignment`] plans all assignments from scratch,
//! [`Roster::assign`] and [`Roster::unassign`] adjust single volunteers
//! afterwards. Loading and persisting the records is up to the caller.

extern crate alloc;

pub mod engine;
pub mod error;
pub mod model;
pub mod roster;
pub mod scorer;

pub use engine::{run_auto_assignment, run_auto_assignment_with_progress, Outcome, Progress};
pub use error::{AllocationError, CrewConfigError};
pub use model::{AvailabilityWindow, Crew, CrewId, Skill, Volunteer, VolunteerId};
pub use roster::{manual_assign, manual_unassign, AllocationSummary, Roster};
pub use scorer::{score, SkillMatch};

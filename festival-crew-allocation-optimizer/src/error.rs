use crate::model::{CrewId, VolunteerId};

/// Why a crew (or the roster around it) cannot take part in an allocation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CrewConfigError {
    #[error("crew {0} has no required skills")]
    NoRequiredSkills(CrewId),
    #[error("crew {crew} needs 0 < min ({min}) <= max ({max}) volunteers")]
    InvalidBounds { crew: CrewId, min: usize, max: usize },
    #[error("crew id {0} is used more than once")]
    DuplicateCrew(CrewId),
    #[error("volunteer id {0} is used more than once")]
    DuplicateVolunteer(VolunteerId),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("configuration error: {0}")]
    Configuration(#[from] CrewConfigError),
    #[error("crew {crew} is already at its maximum of {max_volunteers} volunteers")]
    CapacityExceeded {
        crew: CrewId,
        max_volunteers: usize,
    },
    #[error("volunteer {0} not found")]
    VolunteerNotFound(VolunteerId),
    #[error("crew {0} not found")]
    CrewNotFound(CrewId),
    #[error("volunteer {volunteer} is already assigned to crew {crew}, unassign first")]
    AlreadyAssigned { volunteer: VolunteerId, crew: CrewId },
    #[error("inconsistent roster: {0}")]
    Inconsistent(String),
}

impl AllocationError {
    /// Whether the error is one of the two not-found cases.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::VolunteerNotFound(_) | Self::CrewNotFound(_))
    }
}

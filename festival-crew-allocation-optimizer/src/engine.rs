//! Greedy volunteer to crew allocation.
//!
//! Every run starts from scratch: all previous assignments, including manual
//! ones, are dropped. Volunteers are ranked by the best skill match they reach
//! with any crew (ties keep input order) and then, in that order, put into the
//! best matching crew that still has room (ties go to the earlier crew). This
//! is a deliberately simple O(volunteers * crews) heuristic, not an optimal
//! matching.
//!
//! Without any volunteers there is nothing to plan and the crews are handed
//! back as they came in.

use core::cmp::Reverse;
use core::fmt::{self, Display};

use itertools::Itertools;
use tracing::{debug, info, info_span, warn};

use crate::error::{AllocationError, CrewConfigError};
use crate::model::{Crew, CrewId, Volunteer, VolunteerId};
use crate::roster::{check_unique_ids, Roster};
use crate::scorer::{score, SkillMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnassignedReason {
    /// Every crew was already full.
    NoCapacity,
    /// None of the crews with room needs any of the volunteer's skills.
    NoSkillOverlap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Assigned { crew: CrewId, score: SkillMatch },
    Unassigned(UnassignedReason),
}

/// Reported once per volunteer, in ranked order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Starts at 1.
    pub processed: usize,
    pub total: usize,
    pub volunteer: VolunteerId,
    pub outcome: Outcome,
}

impl Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}] ", self.processed, self.total)?;
        match &self.outcome {
            Outcome::Assigned { crew, score } => {
                write!(f, "assigned {} to {crew} ({score} match)", self.volunteer)
            }
            Outcome::Unassigned(UnassignedReason::NoCapacity) => {
                write!(f, "{} left unassigned, all crews are full", self.volunteer)
            }
            Outcome::Unassigned(UnassignedReason::NoSkillOverlap) => write!(
                f,
                "{} left unassigned, no crew with room needs their skills",
                self.volunteer
            ),
        }
    }
}

/// Checks everything the run relies on before anything is touched.
pub fn validate(volunteers: &[Volunteer], crews: &[Crew]) -> Result<(), CrewConfigError> {
    check_unique_ids(volunteers, crews)?;
    for crew in crews {
        if crew.required_skills.is_empty() {
            return Err(CrewConfigError::NoRequiredSkills(crew.id.clone()));
        }
        if crew.min_volunteers == 0 || crew.min_volunteers > crew.max_volunteers {
            return Err(CrewConfigError::InvalidBounds {
                crew: crew.id.clone(),
                min: crew.min_volunteers,
                max: crew.max_volunteers,
            });
        }
    }
    Ok(())
}

pub fn run_auto_assignment(
    volunteers: &[Volunteer],
    crews: &[Crew],
) -> Result<Roster, AllocationError> {
    run_auto_assignment_with_progress(volunteers, crews, |_| {})
}

/// Like [`run_auto_assignment`], calling `on_progress` after each volunteer.
///
/// On error nothing has been assigned and `on_progress` was never called.
pub fn run_auto_assignment_with_progress<F>(
    volunteers: &[Volunteer],
    crews: &[Crew],
    mut on_progress: F,
) -> Result<Roster, AllocationError>
where
    F: FnMut(&Progress),
{
    validate(volunteers, crews)?;

    let span = info_span!(
        "auto_assignment",
        volunteers = volunteers.len(),
        crews = crews.len()
    );
    let _entered = span.enter();

    if volunteers.is_empty() {
        info!("no volunteers, crews left as they are");
        return Ok(Roster::from_parts_unchecked(Vec::new(), crews.to_vec()));
    }

    let volunteers: Vec<Volunteer> = volunteers
        .iter()
        .cloned()
        .map(|mut volunteer| {
            volunteer.assigned_crew = None;
            volunteer
        })
        .collect();
    let crews: Vec<Crew> = crews
        .iter()
        .cloned()
        .map(|mut crew| {
            crew.assigned_volunteers.clear();
            crew
        })
        .collect();

    // scores[volunteer][crew], the run only ever looks these up
    let scores: Vec<Vec<SkillMatch>> = volunteers
        .iter()
        .map(|volunteer| {
            crews
                .iter()
                .map(|crew| score(volunteer, crew))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<_, _>>()?;

    let ranked = rank(&scores);

    let mut roster = Roster::from_parts_unchecked(volunteers, crews);
    let total = ranked.len();

    for (position, volunteer_index) in ranked.into_iter().enumerate() {
        let outcome = match best_crew_with_room(roster.crews(), &scores[volunteer_index]) {
            None => Outcome::Unassigned(UnassignedReason::NoCapacity),
            Some((_, best)) if best.is_zero() => {
                Outcome::Unassigned(UnassignedReason::NoSkillOverlap)
            }
            Some((crew_index, best)) => {
                roster.link(volunteer_index, crew_index);
                Outcome::Assigned {
                    crew: roster.crews()[crew_index].id.clone(),
                    score: best,
                }
            }
        };

        let progress = Progress {
            processed: position + 1,
            total,
            volunteer: roster.volunteers()[volunteer_index].id.clone(),
            outcome,
        };
        debug!("{progress}");
        on_progress(&progress);
    }

    let summary = roster.summary();
    info!(
        assigned = summary.assigned,
        unassigned = summary.unassigned.len(),
        "auto assignment finished"
    );
    for crew in roster.crews().iter().filter(|crew| crew.is_understaffed()) {
        warn!(
            crew = %crew.id,
            assigned = crew.assigned_volunteers.len(),
            min = crew.min_volunteers,
            "crew is understaffed"
        );
    }

    Ok(roster)
}

fn best_score(scores: &[SkillMatch]) -> SkillMatch {
    scores.iter().max().copied().unwrap_or(SkillMatch::NONE)
}

/// Volunteer indices by descending best score.
fn rank(scores: &[Vec<SkillMatch>]) -> Vec<usize> {
    let best: Vec<SkillMatch> = scores.iter().map(|row| best_score(row)).collect();
    // sorted_by_key is stable, so equal best scores keep their input order
    (0..best.len())
        .sorted_by_key(|&index| Reverse(best[index]))
        .collect()
}

/// Highest scoring crew that still has room, the first one on ties.
fn best_crew_with_room(crews: &[Crew], scores: &[SkillMatch]) -> Option<(usize, SkillMatch)> {
    crews
        .iter()
        .zip(scores)
        .enumerate()
        .filter(|(_, (crew, _))| crew.has_capacity())
        .fold(None, |best, (index, (_, &candidate))| match best {
            Some((_, best_score)) if best_score >= candidate => best,
            _ => Some((index, candidate)),
        })
}

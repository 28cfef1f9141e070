use alloc::collections::BTreeSet;
use core::fmt::{self, Display};

use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use crate::error::{AllocationError, CrewConfigError};
use crate::model::{Crew, CrewId, Volunteer, VolunteerId};

/// Volunteers and crews together with the assignments between them.
///
/// Both sides of an assignment (`Volunteer::assigned_crew` and
/// `Crew::assigned_volunteers`) are only ever changed together, so a `Roster`
/// always satisfies [`Roster::check_invariants`]. Input order is preserved.
///
/// A `Roster` is plain data. Running the engine and the manual operations
/// concurrently against the *same* persisted records has to be serialized by
/// whoever owns those records.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Roster {
    volunteers: Vec<Volunteer>,
    crews: Vec<Crew>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationSummary {
    pub assigned: usize,
    pub unassigned: Vec<VolunteerId>,
    /// Crews with fewer than `min_volunteers` assigned.
    pub understaffed: Vec<CrewId>,
}

impl Display for AllocationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} assigned, {} unassigned",
            self.assigned,
            self.unassigned.len()
        )?;
        if !self.understaffed.is_empty() {
            write!(
                f,
                ", understaffed crews: {}",
                self.understaffed.iter().join(", ")
            )?;
        }
        Ok(())
    }
}

impl Roster {
    /// Takes over records as loaded by the host application.
    ///
    /// Existing assignments are kept but have to be consistent on both sides.
    pub fn new(volunteers: Vec<Volunteer>, crews: Vec<Crew>) -> Result<Self, AllocationError> {
        check_unique_ids(&volunteers, &crews)?;
        let roster = Self { volunteers, crews };
        roster.check_invariants()?;
        Ok(roster)
    }

    /// Only for callers that established the invariants themselves.
    pub(crate) const fn from_parts_unchecked(volunteers: Vec<Volunteer>, crews: Vec<Crew>) -> Self {
        Self { volunteers, crews }
    }

    #[must_use]
    pub fn volunteers(&self) -> &[Volunteer] {
        &self.volunteers
    }

    #[must_use]
    pub fn crews(&self) -> &[Crew] {
        &self.crews
    }

    #[must_use]
    pub fn volunteer(&self, id: &VolunteerId) -> Option<&Volunteer> {
        self.volunteers.iter().find(|volunteer| &volunteer.id == id)
    }

    #[must_use]
    pub fn crew(&self, id: &CrewId) -> Option<&Crew> {
        self.crews.iter().find(|crew| &crew.id == id)
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<Volunteer>, Vec<Crew>) {
        (self.volunteers, self.crews)
    }

    fn volunteer_index(&self, id: &VolunteerId) -> Result<usize, AllocationError> {
        self.volunteers
            .iter()
            .position(|volunteer| &volunteer.id == id)
            .ok_or_else(|| AllocationError::VolunteerNotFound(id.clone()))
    }

    fn crew_index(&self, id: &CrewId) -> Result<usize, AllocationError> {
        self.crews
            .iter()
            .position(|crew| &crew.id == id)
            .ok_or_else(|| AllocationError::CrewNotFound(id.clone()))
    }

    /// Manually puts an unassigned volunteer into a crew.
    ///
    /// Nothing is changed if this fails. A volunteer that already has a crew
    /// has to be unassigned first, and a full crew is never made room in.
    pub fn assign(&mut self, volunteer: &VolunteerId, crew: &CrewId) -> Result<(), AllocationError> {
        let volunteer_index = self.volunteer_index(volunteer)?;
        let crew_index = self.crew_index(crew)?;

        if let Some(current) = &self.volunteers[volunteer_index].assigned_crew {
            return Err(AllocationError::AlreadyAssigned {
                volunteer: volunteer.clone(),
                crew: current.clone(),
            });
        }
        let target = &self.crews[crew_index];
        if !target.has_capacity() {
            return Err(AllocationError::CapacityExceeded {
                crew: crew.clone(),
                max_volunteers: target.max_volunteers,
            });
        }

        self.link(volunteer_index, crew_index);
        debug!(%volunteer, %crew, "manually assigned");
        Ok(())
    }

    /// Removes a volunteer from their crew, returning the crew they were in.
    ///
    /// Unassigning an unassigned volunteer does nothing.
    pub fn unassign(&mut self, volunteer: &VolunteerId) -> Result<Option<CrewId>, AllocationError> {
        let volunteer_index = self.volunteer_index(volunteer)?;
        let Some(crew) = self.volunteers[volunteer_index].assigned_crew.clone() else {
            return Ok(None);
        };
        let crew_index = self.crew_index(&crew).map_err(|_| {
            AllocationError::Inconsistent(format!(
                "volunteer {volunteer} points to missing crew {crew}"
            ))
        })?;

        self.volunteers[volunteer_index].assigned_crew = None;
        self.crews[crew_index].assigned_volunteers.remove(volunteer);
        debug!(%volunteer, %crew, "manually unassigned");
        Ok(Some(crew))
    }

    /// Sets both sides of an assignment. Callers check capacity.
    pub(crate) fn link(&mut self, volunteer_index: usize, crew_index: usize) {
        let crew = &mut self.crews[crew_index];
        let volunteer = &mut self.volunteers[volunteer_index];
        crew.assigned_volunteers.insert(volunteer.id.clone());
        volunteer.assigned_crew = Some(crew.id.clone());
    }

    /// Crews the volunteer could be manually assigned to right now.
    ///
    /// Empty for a volunteer that already has a crew.
    pub fn assignable_crews(&self, volunteer: &VolunteerId) -> Result<Vec<&Crew>, AllocationError> {
        let volunteer_index = self.volunteer_index(volunteer)?;
        if self.volunteers[volunteer_index].assigned_crew.is_some() {
            return Ok(Vec::new());
        }
        Ok(self.crews.iter().filter(|crew| crew.has_capacity()).collect())
    }

    #[must_use]
    pub fn summary(&self) -> AllocationSummary {
        let (assigned, unassigned): (Vec<_>, Vec<_>) = self
            .volunteers
            .iter()
            .partition(|volunteer| volunteer.assigned_crew.is_some());
        AllocationSummary {
            assigned: assigned.len(),
            unassigned: unassigned
                .into_iter()
                .map(|volunteer| volunteer.id.clone())
                .collect(),
            understaffed: self
                .crews
                .iter()
                .filter(|crew| crew.is_understaffed())
                .map(|crew| crew.id.clone())
                .collect(),
        }
    }

    /// Verifies that no crew is over capacity and that every assignment is
    /// recorded on both the volunteer and exactly one crew.
    pub fn check_invariants(&self) -> Result<(), AllocationError> {
        let inconsistent = |message: String| Err(AllocationError::Inconsistent(message));

        for crew in &self.crews {
            if crew.assigned_volunteers.len() > crew.max_volunteers {
                return inconsistent(format!(
                    "crew {} has {} volunteers but allows at most {}",
                    crew.id,
                    crew.assigned_volunteers.len(),
                    crew.max_volunteers
                ));
            }
            for member in &crew.assigned_volunteers {
                match self.volunteer(member) {
                    None => {
                        return inconsistent(format!(
                            "crew {} lists unknown volunteer {member}",
                            crew.id
                        ));
                    }
                    Some(volunteer) if volunteer.assigned_crew.as_ref() != Some(&crew.id) => {
                        return inconsistent(format!(
                            "crew {} lists volunteer {member} who is not assigned to it",
                            crew.id
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        for volunteer in &self.volunteers {
            if let Some(crew_id) = &volunteer.assigned_crew {
                let listed = self
                    .crew(crew_id)
                    .is_some_and(|crew| crew.assigned_volunteers.contains(&volunteer.id));
                if !listed {
                    return inconsistent(format!(
                        "volunteer {} is assigned to crew {crew_id} which does not list them",
                        volunteer.id
                    ));
                }
            }
        }

        Ok(())
    }
}

pub(crate) fn check_unique_ids(volunteers: &[Volunteer], crews: &[Crew]) -> Result<(), CrewConfigError> {
    let mut seen = BTreeSet::new();
    if let Some(duplicate) = volunteers.iter().find(|volunteer| !seen.insert(&volunteer.id)) {
        return Err(CrewConfigError::DuplicateVolunteer(duplicate.id.clone()));
    }
    let mut seen = BTreeSet::new();
    if let Some(duplicate) = crews.iter().find(|crew| !seen.insert(&crew.id)) {
        return Err(CrewConfigError::DuplicateCrew(duplicate.id.clone()));
    }
    Ok(())
}

/// Manual assign on an immutable roster, returning the updated copy.
pub fn manual_assign(
    volunteer: &VolunteerId,
    crew: &CrewId,
    roster: &Roster,
) -> Result<Roster, AllocationError> {
    let mut next = roster.clone();
    next.assign(volunteer, crew)?;
    Ok(next)
}

/// Manual unassign on an immutable roster, returning the updated copy.
pub fn manual_unassign(volunteer: &VolunteerId, roster: &Roster) -> Result<Roster, AllocationError> {
    let mut next = roster.clone();
    next.unassign(volunteer)?;
    Ok(next)
}

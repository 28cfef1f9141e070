// these come from the host application's records, the optimizer never creates or deletes them
// ids have to be unique within one roster, which `Roster::new` checks

use alloc::collections::BTreeSet;
use core::fmt::{self, Display};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct VolunteerId(pub String);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct CrewId(pub String);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Skill(pub String);

macro_rules! string_newtype {
    ($($name:ident),*) => {
        $(
            impl Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $name {
                fn from(value: &str) -> Self {
                    Self(value.to_owned())
                }
            }
        )*
    };
}

string_newtype!(VolunteerId, CrewId, Skill);

/// When a volunteer said they could help.
///
/// Carried along for the host application, the allocation itself only looks
/// at skills.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Empty means every day of the week.
    #[serde(default)]
    pub days: Vec<Weekday>,
    pub start_time: NaiveTime,
    /// May be before `start_time` for shifts running past midnight.
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    #[must_use]
    pub fn is_available_on(&self, at: NaiveDateTime) -> bool {
        let date = at.date();
        if date < self.start_date || date > self.end_date {
            return false;
        }
        if !self.days.is_empty() && !self.days.contains(&date.weekday()) {
            return false;
        }
        let time = at.time();
        if self.start_time <= self.end_time {
            self.start_time <= time && time < self.end_time
        } else {
            self.start_time <= time || time < self.end_time
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: VolunteerId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub skills: BTreeSet<Skill>,
    #[serde(default)]
    pub availability: Option<AvailabilityWindow>,
    #[serde(default)]
    pub assigned_crew: Option<CrewId>,
}

impl Volunteer {
    pub fn new(
        id: impl Into<VolunteerId>,
        skills: impl IntoIterator<Item = impl Into<Skill>>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.0.clone(),
            id,
            skills: skills.into_iter().map(Into::into).collect(),
            availability: None,
            assigned_crew: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Crew {
    pub id: CrewId,
    #[serde(default)]
    pub name: String,
    pub required_skills: BTreeSet<Skill>,
    pub min_volunteers: usize,
    pub max_volunteers: usize,
    #[serde(default)]
    pub assigned_volunteers: BTreeSet<VolunteerId>,
}

impl Crew {
    pub fn new(
        id: impl Into<CrewId>,
        required_skills: impl IntoIterator<Item = impl Into<Skill>>,
        min_volunteers: usize,
        max_volunteers: usize,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.0.clone(),
            id,
            required_skills: required_skills.into_iter().map(Into::into).collect(),
            min_volunteers,
            max_volunteers,
            assigned_volunteers: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn has_capacity(&self) -> bool {
        self.assigned_volunteers.len() < self.max_volunteers
    }

    #[must_use]
    pub fn remaining_capacity(&self) -> usize {
        self.max_volunteers.saturating_sub(self.assigned_volunteers.len())
    }

    #[must_use]
    pub fn is_understaffed(&self) -> bool {
        self.assigned_volunteers.len() < self.min_volunteers
    }
}

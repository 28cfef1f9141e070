use core::cmp::Ordering;
use core::fmt::{self, Display};

use crate::error::{AllocationError, CrewConfigError};
use crate::model::{Crew, Volunteer};

/// Share of a crew's required skills a volunteer brings along.
///
/// Kept as a fraction so that e.g. 1/3 and 2/6 compare equal without any
/// floating point rounding deciding a tie. Only [`score`] builds one, so the
/// denominator is never zero.
#[derive(Debug, Clone, Copy)]
pub struct SkillMatch {
    matching: usize,
    required: usize,
}

impl SkillMatch {
    pub const NONE: Self = Self {
        matching: 0,
        required: 1,
    };

    #[cfg(test)]
    pub(crate) const fn new(matching: usize, required: usize) -> Self {
        assert!(required > 0);
        Self { matching, required }
    }

    /// Required skills the volunteer has.
    #[must_use]
    pub const fn matching(self) -> usize {
        self.matching
    }

    /// Skills the crew requires, never zero.
    #[must_use]
    pub const fn required(self) -> usize {
        self.required
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.matching == 0
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "skill counts are tiny")]
    pub fn percentage(self) -> f64 {
        100.0 * self.matching as f64 / self.required as f64
    }
}

impl Ord for SkillMatch {
    fn cmp(&self, other: &Self) -> Ordering {
        // a/b <=> c/d  <=>  a*d <=> c*b for positive denominators
        let left = self.matching as u128 * other.required as u128;
        let right = other.matching as u128 * self.required as u128;
        left.cmp(&right)
    }
}

impl PartialOrd for SkillMatch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SkillMatch {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SkillMatch {}

impl Display for SkillMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.0}%", self.percentage())
    }
}

/// Skill-match percentage of `volunteer` for `crew`.
pub fn score(volunteer: &Volunteer, crew: &Crew) -> Result<SkillMatch, AllocationError> {
    if crew.required_skills.is_empty() {
        return Err(CrewConfigError::NoRequiredSkills(crew.id.clone()).into());
    }
    Ok(SkillMatch {
        matching: crew
            .required_skills
            .intersection(&volunteer.skills)
            .count(),
        required: crew.required_skills.len(),
    })
}

//! Profile invariants enforced before a profile reaches storage.

use time::OffsetDateTime;

use crate::domain::entities::{Profile, Skill};
use crate::domain::error::DomainError;

/// Earliest year accepted for any "year started"/"year last used" field.
pub const MINIMUM_YEAR: i32 = 1989;

pub fn current_year() -> i32 {
    OffsetDateTime::now_utc().year()
}

/// Validate a full profile document against the domain rules.
pub fn validate_profile(profile: &Profile) -> Result<(), DomainError> {
    validate_profile_at(profile, current_year())
}

pub(crate) fn validate_profile_at(profile: &Profile, this_year: i32) -> Result<(), DomainError> {
    if profile.id.is_nil() {
        return Err(DomainError::validation("profile id must not be empty"));
    }
    if profile.first_name.trim().is_empty() {
        return Err(DomainError::validation("first name is required"));
    }
    if profile.last_name.trim().is_empty() {
        return Err(DomainError::validation("last name is required"));
    }
    if profile.email.trim().is_empty() {
        return Err(DomainError::validation("email is required"));
    }
    if let Some(year) = profile.birth_year
        && year > this_year
    {
        return Err(DomainError::validation(format!(
            "birth year {year} is in the future"
        )));
    }
    if let Some(year) = profile.year_started_in_tech {
        check_year("year started in tech", year, this_year)?;
    }
    for skill in &profile.skills {
        validate_skill_at(skill, this_year)?;
    }
    Ok(())
}

pub(crate) fn validate_skill_at(skill: &Skill, this_year: i32) -> Result<(), DomainError> {
    if skill.name.trim().is_empty() {
        return Err(DomainError::validation("skill name is required"));
    }
    if let Some(year) = skill.year_started {
        check_year("skill year started", year, this_year)?;
    }
    if let Some(year) = skill.year_last_used {
        check_year("skill year last used", year, this_year)?;
    }
    if let (Some(started), Some(last_used)) = (skill.year_started, skill.year_last_used)
        && started > last_used
    {
        return Err(DomainError::validation(format!(
            "skill `{}` was last used ({last_used}) before it was started ({started})",
            skill.name
        )));
    }
    Ok(())
}

fn check_year(field: &str, year: i32, this_year: i32) -> Result<(), DomainError> {
    if year < MINIMUM_YEAR {
        return Err(DomainError::validation(format!(
            "{field} {year} is before {MINIMUM_YEAR}"
        )));
    }
    if year > this_year {
        return Err(DomainError::validation(format!(
            "{field} {year} is in the future"
        )));
    }
    Ok(())
}

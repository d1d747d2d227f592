//! Domain entities mirrored from persistent storage.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::types::{CategoryGroup, CategoryLinkChangeType, ProfileStatus, SkillLevel};

/// Case-insensitive comparison used for every category/profile value match.
pub fn names_match(left: &str, right: &str) -> bool {
    left == right || left.to_uppercase() == right.to_uppercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub provider: String,
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub level: SkillLevel,
    pub year_started: Option<i32>,
    pub year_last_used: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub about: Option<String>,
    pub birth_year: Option<i32>,
    pub gender: Option<String>,
    pub time_zone: Option<String>,
    pub github_username: Option<String>,
    pub twitter_username: Option<String>,
    pub website: Option<String>,
    pub year_started_in_tech: Option<i32>,
    pub languages: Vec<String>,
    pub skills: Vec<Skill>,
    pub status: ProfileStatus,
    pub banned_at: Option<OffsetDateTime>,
}

impl Profile {
    /// A freshly created profile: hidden until its owner publishes it.
    pub fn new(id: Uuid, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: String::new(),
            about: None,
            birth_year: None,
            gender: None,
            time_zone: None,
            github_username: None,
            twitter_username: None,
            website: None,
            year_started_in_tech: None,
            languages: Vec::new(),
            skills: Vec::new(),
            status: ProfileStatus::Hidden,
            banned_at: None,
        }
    }

    pub fn is_banned(&self) -> bool {
        self.banned_at.is_some()
    }

    /// Whether this profile belongs in the public search snapshot.
    pub fn is_searchable(&self) -> bool {
        !self.is_banned() && self.status.is_searchable()
    }
}

/// Denormalised search row for a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResult {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    pub year_started_in_tech: Option<i32>,
    pub time_zone: Option<String>,
    pub status: ProfileStatus,
}

impl From<&Profile> for ProfileResult {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            gender: profile.gender.clone(),
            birth_year: profile.birth_year,
            year_started_in_tech: profile.year_started_in_tech,
            time_zone: profile.time_zone.clone(),
            status: profile.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub group: CategoryGroup,
    pub name: String,
    pub link_count: u32,
    pub reviewed: bool,
    pub visible: bool,
}

impl Category {
    /// A category discovered through a profile; it waits for review before it is shown.
    pub fn discovered(group: CategoryGroup, name: impl Into<String>) -> Self {
        Self {
            group,
            name: name.into(),
            link_count: 1,
            reviewed: false,
            visible: false,
        }
    }

    pub fn matches(&self, group: CategoryGroup, name: &str) -> bool {
        self.group == group && names_match(&self.name, name)
    }
}

/// A stored association between a category value and a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLink {
    pub group: CategoryGroup,
    pub name: String,
    pub profile_id: Uuid,
}

/// Instruction for the link store to add or remove one profile link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLinkChange {
    pub profile_id: Uuid,
    pub change_type: CategoryLinkChangeType,
}

/// Search predicate on a category value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfileFilter {
    pub group: CategoryGroup,
    pub name: String,
}

impl ProfileFilter {
    pub fn new(group: CategoryGroup, name: impl Into<String>) -> Self {
        Self {
            group,
            name: name.into(),
        }
    }
}

/// One category-link delta derived from a profile edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChange {
    pub group: CategoryGroup,
    pub name: String,
    pub change_type: CategoryLinkChangeType,
}

impl CategoryChange {
    pub fn add(group: CategoryGroup, name: impl Into<String>) -> Self {
        Self {
            group,
            name: name.into(),
            change_type: CategoryLinkChangeType::Add,
        }
    }

    pub fn remove(group: CategoryGroup, name: impl Into<String>) -> Self {
        Self {
            group,
            name: name.into(),
            change_type: CategoryLinkChangeType::Remove,
        }
    }

    pub fn filter(&self) -> ProfileFilter {
        ProfileFilter::new(self.group, self.name.clone())
    }
}

/// Outcome of diffing two versions of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChangeResult {
    pub profile_changed: bool,
    pub category_changes: Vec<CategoryChange>,
}

impl ProfileChangeResult {
    pub fn has_changes(&self) -> bool {
        self.profile_changed || !self.category_changes.is_empty()
    }
}

//! Shared domain enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Visibility state of a profile.
///
/// Variants are declared in search rank order: sorting descending puts
/// `Available` profiles ahead of `Unavailable` ones.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    #[default]
    Hidden,
    Unavailable,
    Available,
}

impl ProfileStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileStatus::Hidden => "Hidden",
            ProfileStatus::Unavailable => "Unavailable",
            ProfileStatus::Available => "Available",
        }
    }

    /// Whether profiles in this state may appear in public search results.
    pub fn is_searchable(self) -> bool {
        !matches!(self, ProfileStatus::Hidden)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Hobbyist,
    Beginner,
    Intermediate,
    Expert,
    Master,
}

/// Taxonomy groups a category can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryGroup {
    Gender,
    Language,
    Skill,
}

impl CategoryGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryGroup::Gender => "Gender",
            CategoryGroup::Language => "Language",
            CategoryGroup::Skill => "Skill",
        }
    }
}

impl fmt::Display for CategoryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryLinkChangeType {
    Add,
    Remove,
}

impl CategoryLinkChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryLinkChangeType::Add => "Add",
            CategoryLinkChangeType::Remove => "Remove",
        }
    }
}

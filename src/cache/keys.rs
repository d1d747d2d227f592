//! Cache key definitions.
//!
//! Every entry kind has its own variant so keys of different kinds can never collide.

use std::fmt;

use uuid::Uuid;

use crate::domain::entities::ProfileFilter;
use crate::domain::types::CategoryGroup;

/// Kind of a cached entry. Drives expiration and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Account,
    Profile,
    Categories,
    CategoryLinks,
    ProfileResults,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::Account => "account",
            EntryKind::Profile => "profile",
            EntryKind::Categories => "categories",
            EntryKind::CategoryLinks => "category_links",
            EntryKind::ProfileResults => "profile_results",
        }
    }
}

/// Key of a category-link entry.
///
/// The name is stored upper-cased so that `Female` and `FEMALE` share one entry,
/// matching the case-insensitive lookups performed against the link store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryLinkKey {
    group: CategoryGroup,
    name: String,
}

impl CategoryLinkKey {
    pub fn new(group: CategoryGroup, name: &str) -> Self {
        Self {
            group,
            name: name.to_uppercase(),
        }
    }

    pub fn group(&self) -> CategoryGroup {
        self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl From<&ProfileFilter> for CategoryLinkKey {
    fn from(filter: &ProfileFilter) -> Self {
        Self::new(filter.group, &filter.name)
    }
}

/// Unified cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    // Singletons
    Categories,
    ProfileResults,

    // KV lookups
    Account(String),
    Profile(Uuid),
    CategoryLinks(CategoryLinkKey),
}

impl CacheKey {
    pub fn kind(&self) -> EntryKind {
        match self {
            CacheKey::Categories => EntryKind::Categories,
            CacheKey::ProfileResults => EntryKind::ProfileResults,
            CacheKey::Account(_) => EntryKind::Account,
            CacheKey::Profile(_) => EntryKind::Profile,
            CacheKey::CategoryLinks(_) => EntryKind::CategoryLinks,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Categories => f.write_str("Categories"),
            CacheKey::ProfileResults => f.write_str("ProfileResults"),
            CacheKey::Account(username) => write!(f, "Account|{username}"),
            CacheKey::Profile(id) => write!(f, "Profile|{id}"),
            CacheKey::CategoryLinks(key) => write!(f, "CategoryLinks|{}|{}", key.group, key.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;

    fn hash_of<T: Hash>(value: &T) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn link_keys_ignore_name_case() {
        let lower = CacheKey::CategoryLinks(CategoryLinkKey::new(CategoryGroup::Gender, "female"));
        let upper = CacheKey::CategoryLinks(CategoryLinkKey::new(CategoryGroup::Gender, "FEMALE"));
        assert_eq!(lower, upper);
        assert_eq!(hash_of(&lower), hash_of(&upper));
    }

    #[test]
    fn same_text_in_different_kinds_does_not_collide() {
        let id = Uuid::nil();
        let profile = CacheKey::Profile(id);
        let account = CacheKey::Account(id.to_string());
        assert_ne!(profile, account);
        assert_ne!(profile.kind(), account.kind());
    }

    #[test]
    fn link_keys_are_scoped_by_group() {
        let skill = CategoryLinkKey::new(CategoryGroup::Skill, "Go");
        let language = CategoryLinkKey::new(CategoryGroup::Language, "Go");
        assert_ne!(skill, language);
    }

    #[test]
    fn display_keeps_legacy_layout() {
        let key = CacheKey::CategoryLinks(CategoryLinkKey::new(CategoryGroup::Skill, "Rust"));
        assert_eq!(key.to_string(), "CategoryLinks|Skill|RUST");
        assert_eq!(CacheKey::Account("ada".into()).to_string(), "Account|ada");
    }
}

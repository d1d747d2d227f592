//! Cache configuration.
//!
//! Sliding expirations per entry kind, resolved from the `[cache]` settings table.

use std::time::Duration;

use super::keys::EntryKind;

/// Expiration applied when a duration is unset or zero.
pub const DEFAULT_EXPIRATION: Duration = Duration::from_secs(300);
const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Sliding expiration of username → account id entries.
    pub account_expiration: Duration,
    /// Sliding expiration of single profile documents.
    pub profile_expiration: Duration,
    /// Sliding expiration of the full category list.
    pub categories_expiration: Duration,
    /// Sliding expiration of per-filter profile id sets.
    pub category_links_expiration: Duration,
    /// Sliding expiration of the searchable profile snapshot.
    pub profile_results_expiration: Duration,
    /// Upper bound on the number of live entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            account_expiration: DEFAULT_EXPIRATION,
            profile_expiration: DEFAULT_EXPIRATION,
            categories_expiration: DEFAULT_EXPIRATION,
            category_links_expiration: DEFAULT_EXPIRATION,
            profile_results_expiration: DEFAULT_EXPIRATION,
            max_capacity: DEFAULT_MAX_CAPACITY,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            account_expiration: settings.account_expiration,
            profile_expiration: settings.profile_expiration,
            categories_expiration: settings.categories_expiration,
            category_links_expiration: settings.category_links_expiration,
            profile_results_expiration: settings.profile_results_expiration,
            max_capacity: settings.max_capacity.get(),
        }
    }
}

impl CacheConfig {
    /// Sliding expiration for the given entry kind, falling back to the default when zero.
    pub fn expiration_for(&self, kind: EntryKind) -> Duration {
        let configured = match kind {
            EntryKind::Account => self.account_expiration,
            EntryKind::Profile => self.profile_expiration,
            EntryKind::Categories => self.categories_expiration,
            EntryKind::CategoryLinks => self.category_links_expiration,
            EntryKind::ProfileResults => self.profile_results_expiration,
        };
        expiration_or_default(configured)
    }
}

/// Map an unset (zero) expiration to [`DEFAULT_EXPIRATION`].
pub fn expiration_or_default(value: Duration) -> Duration {
    if value.is_zero() {
        DEFAULT_EXPIRATION
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert_eq!(config.account_expiration, Duration::from_secs(300));
        assert_eq!(config.profile_expiration, Duration::from_secs(300));
        assert_eq!(config.categories_expiration, Duration::from_secs(300));
        assert_eq!(config.category_links_expiration, Duration::from_secs(300));
        assert_eq!(config.profile_results_expiration, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[test]
    fn zero_expiration_falls_back_to_default() {
        let config = CacheConfig {
            profile_expiration: Duration::ZERO,
            ..Default::default()
        };
        assert_eq!(config.expiration_for(EntryKind::Profile), DEFAULT_EXPIRATION);
    }

    #[test]
    fn expiration_is_resolved_per_kind() {
        let config = CacheConfig {
            category_links_expiration: Duration::from_secs(42),
            ..Default::default()
        };
        assert_eq!(
            config.expiration_for(EntryKind::CategoryLinks),
            Duration::from_secs(42)
        );
        assert_eq!(
            config.expiration_for(EntryKind::Categories),
            DEFAULT_EXPIRATION
        );
    }
}

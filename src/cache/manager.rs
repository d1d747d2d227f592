//! Typed facade over the expiring store.
//!
//! Only touches the in-memory cache. Loading from the backing stores on a miss
//! is the caller's job.

use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{Account, Category, Profile, ProfileFilter, ProfileResult};

use super::config::CacheConfig;
use super::keys::{CacheKey, CategoryLinkKey};
use super::store::ExpiringStore;

const METRIC_CACHE_HIT: &str = "techmentor_cache_hit_total";
const METRIC_CACHE_MISS: &str = "techmentor_cache_miss_total";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheError {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument {
        name: &'static str,
        reason: &'static str,
    },
}

impl CacheError {
    fn invalid(name: &'static str, reason: &'static str) -> Self {
        Self::InvalidArgument { name, reason }
    }
}

#[derive(Debug, Clone)]
enum CacheValue {
    AccountId(Uuid),
    Profile(Arc<Profile>),
    Categories(Arc<Vec<Category>>),
    CategoryLinks(Arc<Vec<Uuid>>),
    ProfileResults(Arc<Vec<ProfileResult>>),
}

/// Domain-level cache shared by the query and command services.
///
/// Construct one per process and hand it out behind an `Arc`.
pub struct CacheManager {
    config: CacheConfig,
    store: ExpiringStore<CacheKey, CacheValue>,
}

impl CacheManager {
    pub fn new(config: CacheConfig) -> Self {
        let store = ExpiringStore::new(config.max_capacity);
        Self { config, store }
    }

    // ========================================================================
    // Accounts
    // ========================================================================

    /// Look up the account id cached for `username`.
    ///
    /// Only the id is cached, so the returned account has an empty provider.
    pub fn get_account(&self, username: &str) -> Result<Option<Account>, CacheError> {
        require_text("username", username)?;

        let id = match self.lookup(&CacheKey::Account(username.to_string())) {
            Some(CacheValue::AccountId(id)) => id,
            _ => return Ok(None),
        };

        Ok(Some(Account {
            id,
            provider: String::new(),
            username: username.to_string(),
        }))
    }

    pub fn store_account(&self, account: &Account) -> Result<(), CacheError> {
        require_text("account.username", &account.username)?;
        require_id("account.id", account.id)?;

        self.put(
            CacheKey::Account(account.username.clone()),
            CacheValue::AccountId(account.id),
        );
        Ok(())
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    pub fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, CacheError> {
        require_id("id", id)?;

        Ok(match self.lookup(&CacheKey::Profile(id)) {
            Some(CacheValue::Profile(profile)) => Some(Profile::clone(&profile)),
            _ => None,
        })
    }

    pub fn store_profile(&self, profile: &Profile) -> Result<(), CacheError> {
        require_id("profile.id", profile.id)?;

        self.put(
            CacheKey::Profile(profile.id),
            CacheValue::Profile(Arc::new(profile.clone())),
        );
        Ok(())
    }

    pub fn remove_profile(&self, id: Uuid) -> Result<(), CacheError> {
        require_id("id", id)?;

        self.evict(&CacheKey::Profile(id));
        Ok(())
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// The cached category list, shared with the cache entry.
    pub fn get_categories(&self) -> Option<Arc<Vec<Category>>> {
        match self.lookup(&CacheKey::Categories) {
            Some(CacheValue::Categories(categories)) => Some(categories),
            _ => None,
        }
    }

    pub fn store_categories(&self, categories: &[Category]) {
        self.put(
            CacheKey::Categories,
            CacheValue::Categories(Arc::new(categories.to_vec())),
        );
    }

    pub fn remove_categories(&self) {
        self.evict(&CacheKey::Categories);
    }

    // ========================================================================
    // Category links
    // ========================================================================

    pub fn get_category_links(&self, filter: &ProfileFilter) -> Result<Option<Vec<Uuid>>, CacheError> {
        let key = link_key(filter)?;

        Ok(match self.lookup(&key) {
            Some(CacheValue::CategoryLinks(ids)) => Some(ids.as_ref().clone()),
            _ => None,
        })
    }

    pub fn store_category_links(&self, filter: &ProfileFilter, ids: &[Uuid]) -> Result<(), CacheError> {
        let key = link_key(filter)?;

        self.put(key, CacheValue::CategoryLinks(Arc::new(ids.to_vec())));
        Ok(())
    }

    pub fn remove_category_links(&self, filter: &ProfileFilter) -> Result<(), CacheError> {
        let key = link_key(filter)?;

        self.evict(&key);
        Ok(())
    }

    // ========================================================================
    // Profile results
    // ========================================================================

    /// The cached search snapshot, shared with the cache entry.
    pub fn get_profile_results(&self) -> Option<Arc<Vec<ProfileResult>>> {
        match self.lookup(&CacheKey::ProfileResults) {
            Some(CacheValue::ProfileResults(results)) => Some(results),
            _ => None,
        }
    }

    pub fn store_profile_results(&self, results: &[ProfileResult]) {
        self.put(
            CacheKey::ProfileResults,
            CacheValue::ProfileResults(Arc::new(results.to_vec())),
        );
    }

    pub fn remove_profile_results(&self) {
        self.evict(&CacheKey::ProfileResults);
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Clear all cached data.
    pub fn clear(&self) {
        self.store.clear();
    }

    fn lookup(&self, key: &CacheKey) -> Option<CacheValue> {
        let kind = key.kind().as_str();
        match self.store.get(key) {
            Some(value) => {
                counter!(METRIC_CACHE_HIT, "kind" => kind).increment(1);
                Some(value)
            }
            None => {
                counter!(METRIC_CACHE_MISS, "kind" => kind).increment(1);
                debug!(cache_key = %key, "Cache miss");
                None
            }
        }
    }

    fn put(&self, key: CacheKey, value: CacheValue) {
        let ttl = self.config.expiration_for(key.kind());
        self.store.set(key, value, ttl);
    }

    fn evict(&self, key: &CacheKey) {
        debug!(cache_key = %key, "Cache entry removed");
        self.store.remove(key);
    }
}

fn require_text(name: &'static str, value: &str) -> Result<(), CacheError> {
    if value.trim().is_empty() {
        return Err(CacheError::invalid(name, "must not be blank"));
    }
    Ok(())
}

fn require_id(name: &'static str, id: Uuid) -> Result<(), CacheError> {
    if id.is_nil() {
        return Err(CacheError::invalid(name, "must not be empty"));
    }
    Ok(())
}

fn link_key(filter: &ProfileFilter) -> Result<CacheKey, CacheError> {
    require_text("filter.name", &filter.name)?;
    Ok(CacheKey::CategoryLinks(CategoryLinkKey::from(filter)))
}

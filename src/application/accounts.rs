//! Account lookup by identity provider and username.

use std::sync::Arc;

use tracing::debug;

use crate::application::error::AppError;
use crate::application::repos::AccountStore;
use crate::cache::CacheManager;
use crate::domain::entities::Account;

#[derive(Clone)]
pub struct AccountManager {
    cache: Arc<CacheManager>,
    store: Arc<dyn AccountStore>,
}

impl AccountManager {
    pub fn new(cache: Arc<CacheManager>, store: Arc<dyn AccountStore>) -> Self {
        Self { cache, store }
    }

    /// Cached lookups are keyed by username alone; the provider is filled back in
    /// from the request.
    pub async fn get_account(
        &self,
        provider: &str,
        username: &str,
    ) -> Result<Option<Account>, AppError> {
        if provider.trim().is_empty() {
            return Err(AppError::validation("provider must not be blank"));
        }

        if let Some(mut account) = self.cache.get_account(username)? {
            account.provider = provider.to_string();
            return Ok(Some(account));
        }

        let Some(account) = self.store.get_account(provider, username).await? else {
            debug!(provider, username, "Account not registered");
            return Ok(None);
        };

        self.cache.store_account(&account)?;
        Ok(Some(account))
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::cache::CacheConfig;
    use crate::infra::memory::MemoryAccountStore;

    fn manager_with(account: Option<Account>) -> (AccountManager, Arc<MemoryAccountStore>) {
        let store = Arc::new(MemoryAccountStore::new());
        if let Some(account) = account {
            store.insert(account);
        }
        let cache = Arc::new(CacheManager::new(CacheConfig::default()));
        (AccountManager::new(cache, store.clone()), store)
    }

    #[tokio::test]
    async fn second_lookup_is_served_from_cache() {
        let account = Account {
            id: Uuid::new_v4(),
            provider: "github".to_string(),
            username: "ada".to_string(),
        };
        let (manager, store) = manager_with(Some(account.clone()));

        let first = manager.get_account("github", "ada").await.expect("lookup");
        let second = manager.get_account("github", "ada").await.expect("lookup");

        assert_eq!(first, Some(account.clone()));
        assert_eq!(second, Some(account));
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn unknown_accounts_are_not_cached() {
        let (manager, store) = manager_with(None);

        assert_eq!(manager.get_account("github", "nobody").await.expect("lookup"), None);
        assert_eq!(manager.get_account("github", "nobody").await.expect("lookup"), None);
        assert_eq!(store.reads(), 2);
    }

    #[tokio::test]
    async fn blank_username_is_rejected() {
        let (manager, store) = manager_with(None);

        let err = manager.get_account("github", "").await.expect_err("blank");
        assert!(err.is_invalid_input());
        assert_eq!(store.reads(), 0);
    }
}

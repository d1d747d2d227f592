//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{
    Account, Category, CategoryLink, CategoryLinkChange, Profile, ProfileResult,
};
use crate::domain::types::CategoryGroup;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("storage timeout")]
    Timeout,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, RepoError>;

    async fn store_profile(&self, profile: &Profile) -> Result<(), RepoError>;

    /// Mark the profile as banned. Returns the updated profile, or `None` when unknown.
    async fn ban_profile(&self, id: Uuid, at: OffsetDateTime) -> Result<Option<Profile>, RepoError>;

    async fn delete_profile(&self, id: Uuid) -> Result<Option<Profile>, RepoError>;

    /// Non-banned, non-hidden profiles in display order.
    async fn get_profile_results(&self) -> Result<Vec<ProfileResult>, RepoError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn get_all_categories(&self) -> Result<Vec<Category>, RepoError>;

    async fn store_category(&self, category: &Category) -> Result<(), RepoError>;
}

#[async_trait]
pub trait CategoryLinkStore: Send + Sync {
    /// Links for the (group, name) value, matched case-insensitively.
    async fn get_category_links(
        &self,
        group: CategoryGroup,
        name: &str,
    ) -> Result<Vec<CategoryLink>, RepoError>;

    async fn store_category_link(
        &self,
        group: CategoryGroup,
        name: &str,
        change: CategoryLinkChange,
    ) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get_account(&self, provider: &str, username: &str)
    -> Result<Option<Account>, RepoError>;
}

/// Notification sink for profile and category activity.
#[async_trait]
pub trait EventTrigger: Send + Sync {
    async fn profile_updated(&self, profile: &Profile) -> Result<(), RepoError>;

    async fn new_category(&self, category: &Category) -> Result<(), RepoError>;
}

//! Profile reads and writes.

use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::application::changes::calculate_changes;
use crate::application::error::AppError;
use crate::application::processor::ProfileChangeProcessor;
use crate::application::repos::ProfileStore;
use crate::cache::CacheManager;
use crate::domain::entities::{Profile, ProfileChangeResult};
use crate::domain::error::DomainError;
use crate::domain::profiles::validate_profile;

#[derive(Clone)]
pub struct ProfileManager {
    cache: Arc<CacheManager>,
    store: Arc<dyn ProfileStore>,
    processor: ProfileChangeProcessor,
}

impl ProfileManager {
    pub fn new(
        cache: Arc<CacheManager>,
        store: Arc<dyn ProfileStore>,
        processor: ProfileChangeProcessor,
    ) -> Self {
        Self {
            cache,
            store,
            processor,
        }
    }

    pub async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, AppError> {
        if let Some(profile) = self.cache.get_profile(id)? {
            return Ok(Some(profile));
        }

        let Some(profile) = self.store.get_profile(id).await? else {
            return Ok(None);
        };

        self.cache.store_profile(&profile)?;
        Ok(Some(profile))
    }

    /// Replace the profile document and propagate the diff.
    ///
    /// The ban timestamp is owned by [`ProfileManager::ban_profile`] and is
    /// carried over from the stored profile.
    #[instrument(skip(self, updated))]
    pub async fn update_profile(&self, id: Uuid, mut updated: Profile) -> Result<Profile, AppError> {
        if updated.id != id {
            return Err(AppError::validation("profile id does not match the request"));
        }
        validate_profile(&updated)?;

        let original = self
            .store
            .get_profile(id)
            .await?
            .ok_or_else(|| DomainError::not_found("profile"))?;
        updated.banned_at = original.banned_at;

        let changes = calculate_changes(&original, &updated);
        self.processor.execute(&updated, &changes).await?;

        if changes.has_changes() {
            self.cache.remove_profile_results();
        }

        Ok(updated)
    }

    /// Soft delete: persist the ban, unlink every category value and drop the
    /// search snapshot. Returns `None` for an unknown profile.
    #[instrument(skip(self))]
    pub async fn ban_profile(
        &self,
        id: Uuid,
        at: OffsetDateTime,
    ) -> Result<Option<Profile>, AppError> {
        if id.is_nil() {
            return Err(AppError::validation("profile id must not be empty"));
        }

        let Some(original) = self.store.get_profile(id).await? else {
            return Ok(None);
        };
        let Some(banned) = self.store.ban_profile(id, at).await? else {
            return Ok(None);
        };

        self.cache.store_profile(&banned)?;

        let unlinks = ProfileChangeResult {
            profile_changed: false,
            category_changes: calculate_changes(&original, &banned).category_changes,
        };
        self.processor.execute(&banned, &unlinks).await?;
        self.cache.remove_profile_results();

        info!(removed_links = unlinks.category_changes.len(), "Profile banned");
        Ok(Some(banned))
    }
}

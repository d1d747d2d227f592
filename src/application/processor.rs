//! Applies a computed profile diff to the stores, the cache and the event sink.
//!
//! Steps are applied in order without compensation: a failure part way through
//! leaves earlier writes committed. Link counts are read-modify-write against the
//! category store, so concurrent batches touching the same category can lose an
//! update.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::repos::{CategoryLinkStore, CategoryStore, EventTrigger, ProfileStore};
use crate::cache::CacheManager;
use crate::domain::entities::{
    Category, CategoryChange, CategoryLinkChange, Profile, ProfileChangeResult, ProfileFilter,
};
use crate::domain::types::CategoryLinkChangeType;

const METRIC_CATEGORY_CREATED: &str = "techmentor_category_created_total";

#[derive(Clone)]
pub struct ProfileChangeProcessor {
    profiles: Arc<dyn ProfileStore>,
    categories: Arc<dyn CategoryStore>,
    links: Arc<dyn CategoryLinkStore>,
    events: Arc<dyn EventTrigger>,
    cache: Arc<CacheManager>,
}

impl ProfileChangeProcessor {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        categories: Arc<dyn CategoryStore>,
        links: Arc<dyn CategoryLinkStore>,
        events: Arc<dyn EventTrigger>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            profiles,
            categories,
            links,
            events,
            cache,
        }
    }

    #[instrument(
        skip_all,
        fields(
            profile_id = %profile.id,
            profile_changed = changes.profile_changed,
            category_changes = changes.category_changes.len()
        )
    )]
    pub async fn execute(
        &self,
        profile: &Profile,
        changes: &ProfileChangeResult,
    ) -> Result<(), AppError> {
        if !changes.has_changes() {
            debug!("No profile changes to apply");
            return Ok(());
        }

        if let Some(change) = changes
            .category_changes
            .iter()
            .find(|change| change.name.trim().is_empty())
        {
            return Err(AppError::validation(format!(
                "{} category change has a blank name",
                change.group
            )));
        }

        if changes.profile_changed {
            self.profiles.store_profile(profile).await?;
            self.cache.store_profile(profile)?;
            self.events.profile_updated(profile).await?;
        }

        if changes.category_changes.is_empty() {
            return Ok(());
        }

        let mut categories = self.categories.get_all_categories().await?;

        for change in &changes.category_changes {
            self.apply_category_change(profile.id, change, &mut categories)
                .await?;
        }

        self.cache.store_categories(&categories);

        info!("Profile changes applied");
        Ok(())
    }

    async fn apply_category_change(
        &self,
        profile_id: Uuid,
        change: &CategoryChange,
        categories: &mut Vec<Category>,
    ) -> Result<(), AppError> {
        let existing = categories
            .iter()
            .position(|category| category.matches(change.group, &change.name));

        let link_name = match existing {
            Some(index) => {
                let category = &mut categories[index];
                category.link_count = match change.change_type {
                    CategoryLinkChangeType::Add => category.link_count.saturating_add(1),
                    CategoryLinkChangeType::Remove => category.link_count.saturating_sub(1),
                };
                self.categories.store_category(category).await?;
                category.name.clone()
            }
            None if change.change_type == CategoryLinkChangeType::Add => {
                let category = Category::discovered(change.group, change.name.clone());
                self.categories.store_category(&category).await?;
                self.events.new_category(&category).await?;

                counter!(METRIC_CATEGORY_CREATED, "group" => change.group.as_str()).increment(1);
                info!(group = %change.group, name = %change.name, "New category discovered");

                categories.push(category);
                change.name.clone()
            }
            None => {
                warn!(
                    group = %change.group,
                    name = %change.name,
                    "Link removal for an unknown category"
                );
                change.name.clone()
            }
        };

        self.links
            .store_category_link(
                change.group,
                &link_name,
                CategoryLinkChange {
                    profile_id,
                    change_type: change.change_type,
                },
            )
            .await?;

        self.cache
            .remove_category_links(&ProfileFilter::new(change.group, link_name))?;

        Ok(())
    }
}

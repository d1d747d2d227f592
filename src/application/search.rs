//! Profile search.
//!
//! Filters are a conjunction of category values. Each filter resolves to the set
//! of linked profile ids (cache first, then the link store), the sets are
//! intersected, and the ordered profile snapshot is joined against the result.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use futures::future::try_join_all;
use metrics::{counter, histogram};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::application::categories::{CategoryQuery, ReadType};
use crate::application::error::AppError;
use crate::application::repos::{CategoryLinkStore, ProfileStore};
use crate::cache::CacheManager;
use crate::domain::entities::{ProfileFilter, ProfileResult};
use crate::domain::types::CategoryGroup;

const METRIC_SEARCH_MS: &str = "techmentor_search_ms";
const METRIC_LINK_FALLBACK: &str = "techmentor_link_store_fallback_total";

#[derive(Clone)]
pub struct ProfileSearchQuery {
    cache: Arc<CacheManager>,
    profiles: Arc<dyn ProfileStore>,
    links: Arc<dyn CategoryLinkStore>,
    categories: CategoryQuery,
}

impl ProfileSearchQuery {
    pub fn new(
        cache: Arc<CacheManager>,
        profiles: Arc<dyn ProfileStore>,
        links: Arc<dyn CategoryLinkStore>,
        categories: CategoryQuery,
    ) -> Self {
        Self {
            cache,
            profiles,
            links,
            categories,
        }
    }

    /// Searchable profiles matching every filter, in display order.
    ///
    /// Filters that resolve to no profiles are ignored. Genders that are not a
    /// visible category are cleared from the returned rows.
    #[instrument(skip(self), fields(filter_count = filters.len()))]
    pub async fn get_profile_results(
        &self,
        filters: &[ProfileFilter],
    ) -> Result<Vec<ProfileResult>, AppError> {
        let started_at = Instant::now();

        let results = self.filter_results(filters).await?;
        let results = self.remove_unapproved_genders(results).await?;

        histogram!(METRIC_SEARCH_MS).record(started_at.elapsed().as_secs_f64() * 1000.0);
        debug!(result_count = results.len(), "Profile search completed");

        Ok(results)
    }

    async fn filter_results(
        &self,
        filters: &[ProfileFilter],
    ) -> Result<Vec<ProfileResult>, AppError> {
        let results = self.load_results().await?;

        if filters.is_empty() {
            return Ok(results.as_ref().clone());
        }

        let matching = self.matching_profile_ids(filters).await?;

        Ok(results
            .iter()
            .filter(|result| matching.contains(&result.id))
            .cloned()
            .collect())
    }

    async fn load_results(&self) -> Result<Arc<Vec<ProfileResult>>, AppError> {
        if let Some(results) = self.cache.get_profile_results() {
            return Ok(results);
        }

        let results = self.profiles.get_profile_results().await?;
        self.cache.store_profile_results(&results);

        Ok(Arc::new(results))
    }

    async fn matching_profile_ids(
        &self,
        filters: &[ProfileFilter],
    ) -> Result<HashSet<Uuid>, AppError> {
        let link_sets =
            try_join_all(filters.iter().map(|filter| self.category_links(filter))).await?;

        // Filters without links usually come from stale category lists on the client.
        let mut non_empty = link_sets.into_iter().filter(|ids| !ids.is_empty());

        let Some(first) = non_empty.next() else {
            return Ok(HashSet::new());
        };

        let mut matches: HashSet<Uuid> = first.into_iter().collect();
        for ids in non_empty {
            let next: HashSet<Uuid> = ids.into_iter().collect();
            matches.retain(|id| next.contains(id));

            if matches.is_empty() {
                break;
            }
        }

        Ok(matches)
    }

    async fn category_links(&self, filter: &ProfileFilter) -> Result<Vec<Uuid>, AppError> {
        if let Some(ids) = self.cache.get_category_links(filter)? {
            return Ok(ids);
        }

        let ids: Vec<Uuid> = self
            .links
            .get_category_links(filter.group, &filter.name)
            .await?
            .into_iter()
            .map(|link| link.profile_id)
            .collect();

        counter!(METRIC_LINK_FALLBACK, "group" => filter.group.as_str()).increment(1);
        self.cache.store_category_links(filter, &ids)?;

        Ok(ids)
    }

    async fn remove_unapproved_genders(
        &self,
        mut results: Vec<ProfileResult>,
    ) -> Result<Vec<ProfileResult>, AppError> {
        let approved: HashSet<String> = self
            .categories
            .get_categories(ReadType::VisibleOnly)
            .await?
            .into_iter()
            .filter(|category| category.group == CategoryGroup::Gender)
            .map(|category| category.name.to_uppercase())
            .collect();

        for result in &mut results {
            if let Some(gender) = &result.gender
                && !approved.contains(&gender.to_uppercase())
            {
                result.gender = None;
            }
        }

        Ok(results)
    }
}

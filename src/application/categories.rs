//! Read-through access to the category list.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::error::AppError;
use crate::application::repos::CategoryStore;
use crate::cache::CacheManager;
use crate::domain::entities::Category;
use crate::domain::types::CategoryGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadType {
    All,
    VisibleOnly,
}

impl ReadType {
    fn admits(self, category: &Category) -> bool {
        match self {
            ReadType::All => true,
            ReadType::VisibleOnly => category.visible,
        }
    }
}

#[derive(Clone)]
pub struct CategoryQuery {
    cache: Arc<CacheManager>,
    store: Arc<dyn CategoryStore>,
}

impl CategoryQuery {
    pub fn new(cache: Arc<CacheManager>, store: Arc<dyn CategoryStore>) -> Self {
        Self { cache, store }
    }

    #[instrument(skip(self))]
    pub async fn get_categories(&self, read_type: ReadType) -> Result<Vec<Category>, AppError> {
        let categories = match self.cache.get_categories() {
            Some(categories) => categories,
            None => {
                let categories = self.store.get_all_categories().await?;
                debug!(count = categories.len(), "Loaded categories from store");
                self.cache.store_categories(&categories);
                Arc::new(categories)
            }
        };

        Ok(categories
            .iter()
            .filter(|category| read_type.admits(category))
            .cloned()
            .collect())
    }

    /// Single category by (group, name), matched case-insensitively.
    pub async fn get_category(
        &self,
        read_type: ReadType,
        group: CategoryGroup,
        name: &str,
    ) -> Result<Option<Category>, AppError> {
        if name.trim().is_empty() {
            return Err(AppError::validation("category name must not be blank"));
        }

        Ok(self
            .get_categories(read_type)
            .await?
            .into_iter()
            .find(|category| category.matches(group, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheConfig;
    use crate::infra::memory::MemoryCategoryStore;

    fn category(group: CategoryGroup, name: &str, visible: bool) -> Category {
        Category {
            group,
            name: name.to_string(),
            link_count: 1,
            reviewed: visible,
            visible,
        }
    }

    fn query_with(categories: Vec<Category>) -> (CategoryQuery, Arc<MemoryCategoryStore>) {
        let store = Arc::new(MemoryCategoryStore::with_categories(categories));
        let cache = Arc::new(CacheManager::new(CacheConfig::default()));
        (CategoryQuery::new(cache, store.clone()), store)
    }

    #[tokio::test]
    async fn categories_are_read_through_the_cache() {
        let (query, store) = query_with(vec![category(CategoryGroup::Skill, "Rust", true)]);

        let first = query.get_categories(ReadType::All).await.expect("categories");
        let second = query.get_categories(ReadType::All).await.expect("categories");

        assert_eq!(first, second);
        assert_eq!(store.reads(), 1);
    }

    #[tokio::test]
    async fn visible_only_hides_unreviewed_categories() {
        let (query, _) = query_with(vec![
            category(CategoryGroup::Gender, "Female", true),
            category(CategoryGroup::Gender, "Other", false),
        ]);

        let visible = query
            .get_categories(ReadType::VisibleOnly)
            .await
            .expect("categories");
        let all = query.get_categories(ReadType::All).await.expect("categories");

        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Female");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn get_category_matches_case_insensitively() {
        let (query, _) = query_with(vec![category(CategoryGroup::Language, "English", false)]);

        let found = query
            .get_category(ReadType::All, CategoryGroup::Language, "ENGLISH")
            .await
            .expect("lookup");
        assert!(found.is_some());

        let hidden = query
            .get_category(ReadType::VisibleOnly, CategoryGroup::Language, "english")
            .await
            .expect("lookup");
        assert!(hidden.is_none());
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (query, _) = query_with(Vec::new());
        let err = query
            .get_category(ReadType::All, CategoryGroup::Skill, " ")
            .await
            .expect_err("blank name");
        assert!(err.is_invalid_input());
    }
}

//! In-memory store adapters.
//!
//! Thread-safe implementations of the repository traits. Each adapter counts the
//! calls it serves so callers can assert on store traffic.

use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    AccountStore, CategoryLinkStore, CategoryStore, ProfileStore, RepoError,
};
use crate::domain::entities::{
    Account, Category, CategoryLink, CategoryLinkChange, Profile, ProfileResult, names_match,
};
use crate::domain::profiles::current_year;
use crate::domain::types::{CategoryGroup, CategoryLinkChangeType};

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "infra::memory";

#[derive(Debug, Default)]
struct Counter(AtomicUsize);

impl Counter {
    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

// ============================================================================
// Profiles
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<Uuid, Profile>>,
    reads: Counter,
    writes: Counter,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile without counting it as a write.
    pub fn insert(&self, profile: Profile) {
        rw_write(&self.profiles, SOURCE, "profiles.insert").insert(profile.id, profile);
    }

    /// Number of `get_profile`/`get_profile_results` calls served.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Number of store, ban and delete calls served.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>, RepoError> {
        self.reads.bump();
        Ok(rw_read(&self.profiles, SOURCE, "profiles.get")
            .get(&id)
            .cloned())
    }

    async fn store_profile(&self, profile: &Profile) -> Result<(), RepoError> {
        self.writes.bump();
        rw_write(&self.profiles, SOURCE, "profiles.store").insert(profile.id, profile.clone());
        Ok(())
    }

    async fn ban_profile(&self, id: Uuid, at: OffsetDateTime) -> Result<Option<Profile>, RepoError> {
        self.writes.bump();
        let mut profiles = rw_write(&self.profiles, SOURCE, "profiles.ban");
        Ok(profiles.get_mut(&id).map(|profile| {
            profile.banned_at = Some(at);
            profile.clone()
        }))
    }

    async fn delete_profile(&self, id: Uuid) -> Result<Option<Profile>, RepoError> {
        self.writes.bump();
        Ok(rw_write(&self.profiles, SOURCE, "profiles.delete").remove(&id))
    }

    async fn get_profile_results(&self) -> Result<Vec<ProfileResult>, RepoError> {
        self.reads.bump();
        let mut results: Vec<ProfileResult> = rw_read(&self.profiles, SOURCE, "profiles.results")
            .values()
            .filter(|profile| profile.is_searchable())
            .map(ProfileResult::from)
            .collect();
        let this_year = current_year();
        results.sort_by(|left, right| display_order(left, right, this_year));
        Ok(results)
    }
}

/// Status descending, then year started in tech descending, then birth year
/// ascending (older first). An unknown start year sorts last; an unknown birth
/// year counts as `this_year`. Ids break remaining ties.
fn display_order(left: &ProfileResult, right: &ProfileResult, this_year: i32) -> CmpOrdering {
    right
        .status
        .cmp(&left.status)
        .then_with(|| right.year_started_in_tech.cmp(&left.year_started_in_tech))
        .then_with(|| {
            left.birth_year
                .unwrap_or(this_year)
                .cmp(&right.birth_year.unwrap_or(this_year))
        })
        .then_with(|| left.id.cmp(&right.id))
}

// ============================================================================
// Categories
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryCategoryStore {
    categories: RwLock<Vec<Category>>,
    reads: Counter,
    writes: Counter,
}

impl MemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(categories: impl IntoIterator<Item = Category>) -> Self {
        Self {
            categories: RwLock::new(categories.into_iter().collect()),
            ..Self::default()
        }
    }

    /// Current stored version of a category, matched case-insensitively.
    pub fn find(&self, group: CategoryGroup, name: &str) -> Option<Category> {
        rw_read(&self.categories, SOURCE, "categories.find")
            .iter()
            .find(|category| category.matches(group, name))
            .cloned()
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

#[async_trait]
impl CategoryStore for MemoryCategoryStore {
    async fn get_all_categories(&self) -> Result<Vec<Category>, RepoError> {
        self.reads.bump();
        Ok(rw_read(&self.categories, SOURCE, "categories.all").clone())
    }

    async fn store_category(&self, category: &Category) -> Result<(), RepoError> {
        if category.name.trim().is_empty() {
            return Err(RepoError::InvalidInput {
                message: "category name must not be blank".to_string(),
            });
        }

        self.writes.bump();
        let mut categories = rw_write(&self.categories, SOURCE, "categories.store");
        match categories
            .iter_mut()
            .find(|existing| existing.matches(category.group, &category.name))
        {
            Some(existing) => *existing = category.clone(),
            None => categories.push(category.clone()),
        }
        Ok(())
    }
}

// ============================================================================
// Category links
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryCategoryLinkStore {
    links: RwLock<Vec<CategoryLink>>,
    reads: Counter,
    writes: Counter,
}

impl MemoryCategoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_links(links: impl IntoIterator<Item = CategoryLink>) -> Self {
        Self {
            links: RwLock::new(links.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

fn link_matches(link: &CategoryLink, group: CategoryGroup, name: &str) -> bool {
    link.group == group && names_match(&link.name, name)
}

#[async_trait]
impl CategoryLinkStore for MemoryCategoryLinkStore {
    async fn get_category_links(
        &self,
        group: CategoryGroup,
        name: &str,
    ) -> Result<Vec<CategoryLink>, RepoError> {
        self.reads.bump();
        Ok(rw_read(&self.links, SOURCE, "links.get")
            .iter()
            .filter(|link| link_matches(link, group, name))
            .cloned()
            .collect())
    }

    async fn store_category_link(
        &self,
        group: CategoryGroup,
        name: &str,
        change: CategoryLinkChange,
    ) -> Result<(), RepoError> {
        self.writes.bump();
        let mut links = rw_write(&self.links, SOURCE, "links.store");
        let existing = links
            .iter()
            .position(|link| link.profile_id == change.profile_id && link_matches(link, group, name));

        match (change.change_type, existing) {
            (CategoryLinkChangeType::Add, None) => links.push(CategoryLink {
                group,
                name: name.to_string(),
                profile_id: change.profile_id,
            }),
            (CategoryLinkChangeType::Remove, Some(index)) => {
                links.swap_remove(index);
            }
            (CategoryLinkChangeType::Add, Some(_)) | (CategoryLinkChangeType::Remove, None) => {}
        }
        Ok(())
    }
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<Vec<Account>>,
    reads: Counter,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, account: Account) {
        rw_write(&self.accounts, SOURCE, "accounts.insert").push(account);
    }

    pub fn reads(&self) -> usize {
        self.reads.get()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get_account(
        &self,
        provider: &str,
        username: &str,
    ) -> Result<Option<Account>, RepoError> {
        self.reads.bump();
        Ok(rw_read(&self.accounts, SOURCE, "accounts.get")
            .iter()
            .find(|account| account.provider == provider && account.username == username)
            .cloned())
    }
}

//! Domain cache for profile search.
//!
//! A single in-process cache holds five kinds of derived state:
//!
//! - **Accounts**: username → account id
//! - **Profiles**: full profile documents by id
//! - **Categories**: the entire category list as one entry
//! - **Category links**: profile ids linked to one (group, name) value
//! - **Profile results**: the ordered snapshot of searchable profiles
//!
//! Every entry has a sliding expiration configured per kind. Entries are never
//! the source of truth: callers repopulate them from the backing stores on a miss.
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! profile_expiration_secs = 300
//! category_links_expiration_secs = 120
//! max_capacity = 10000
//! ```

mod config;
mod keys;
mod manager;
mod store;

pub use config::{CacheConfig, DEFAULT_EXPIRATION, expiration_or_default};
pub use keys::{CacheKey, CategoryLinkKey, EntryKind};
pub use manager::{CacheError, CacheManager};
pub use store::ExpiringStore;

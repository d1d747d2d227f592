//! Profile search and category-link caching for a mentor-matching platform.
//!
//! Profile edits flow through [`application::processor::ProfileChangeProcessor`],
//! which keeps category link counts, stored links and the [`cache::CacheManager`]
//! in step. Reads go through [`application::search::ProfileSearchQuery`].

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;

//! Application services: profile search and the profile write pipeline.

pub mod accounts;
pub mod categories;
pub mod changes;
pub mod error;
pub mod processor;
pub mod profiles;
pub mod repos;
pub mod search;

//! Infrastructure adapters and runtime bootstrap.

pub mod error;
pub mod events;
mod lock;
pub mod memory;
pub mod telemetry;

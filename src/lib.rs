//! Setpoint - typed, validated settings for interactive tools
//!
//! Setpoint models a tool's named settings as validated property holders and
//! persists them to a flat key=value file through a merge-safe container that
//! never leaves the file half-written and never silently clobbers edits made
//! by another process.

pub mod commands;
pub mod error;
pub mod logging;
pub mod property;
pub mod store;

pub use error::{PropertyError, StoreError};
pub use property::{PropertyHolder, PropertyRegistry, ValueValidator};
pub use store::{ConfigurationContainer, StoreOutcome};

/// Result type alias for Setpoint operations
pub type Result<T> = anyhow::Result<T>;

//! Durable, merge-safe persistence of flat key=value property files

pub mod container;
pub mod digest;
pub mod properties;

pub use container::{ConfigurationContainer, StoreOutcome, WriteOutcome};
pub use digest::DigestStream;

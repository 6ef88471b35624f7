//! billing-core: Shared infrastructure for billing crates.
pub mod config;
pub mod error;
pub mod observability;

pub use tracing;

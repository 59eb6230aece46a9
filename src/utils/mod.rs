//! The `utils` module provides shared definitions used across `cancerboard`:
//! the crate-wide error type and the tracing initialisation helper.

pub mod error;
pub mod logging;

pub use error::{DashboardError, Result};

#[cfg(test)]
mod tests;

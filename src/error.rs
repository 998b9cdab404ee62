//! Errors reported by the search engine.
//!
//! Caller misuse (searching from a state the engine was not primed for,
//! selecting on an unexpanded node, simulating from a position without legal
//! actions) is not represented here: those are programming errors and panic.

use thiserror::Error;

/// Errors that can occur while configuring or running a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to start search workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

//! # TakeError
//!
//! Centralized error handling for the Clutch Takes ecosystem.
//! Every remote-call failure is caught at the service/controller boundary
//! and converted into one of these kinds; nothing propagates as an
//! uncaught fault into the presentation layer.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum TakeError {
    /// Local validation failure: the submitted text was empty after
    /// trimming. Never reaches the classifier or the store.
    #[error("take cannot be empty")]
    EmptyInput,

    /// The moderation classifier call failed. Moderation is a hard
    /// prerequisite to persistence, so nothing was stored.
    #[error("moderation unavailable: {0}")]
    ModerationUnavailable(#[source] anyhow::Error),

    /// The store insert failed after a successful classification. The
    /// moderation result is discarded; nothing was stored.
    #[error("failed to persist take: {0}")]
    PersistenceFailure(#[source] anyhow::Error),

    /// The full-collection load failed; in-memory state is unchanged.
    #[error("failed to fetch takes: {0}")]
    FetchFailure(#[source] anyhow::Error),

    /// The vote increment failed; local counters are unchanged.
    #[error("failed to cast vote: {0}")]
    VoteFailure(#[source] anyhow::Error),

    /// The comment append failed; the local comment list is unchanged.
    #[error("failed to add comment: {0}")]
    CommentFailure(#[source] anyhow::Error),
}

/// A specialized Result type for Clutch Takes logic.
pub type Result<T> = std::result::Result<T, TakeError>;

//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be used by the binary.
//! Mocks are generated with mockall when the `testing` feature is on so
//! external test crates can exercise the services without real adapters.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{ModerationVerdict, NewTake, Take, VoteChoice};

/// Persistence contract for the take collection.
///
/// Increment and append must be atomic server-side operations. The caller
/// never performs a read-modify-write cycle, so concurrent sessions cannot
/// lose each other's votes or comments.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait TakeStore: Send + Sync {
    /// Persists a new take with zeroed votes, no comments, and a
    /// store-assigned timestamp. Returns the store-generated id.
    async fn insert(&self, new: NewTake) -> anyhow::Result<Uuid>;

    /// Atomically bumps the named counter by exactly 1.
    async fn increment_vote(&self, id: Uuid, choice: VoteChoice) -> anyhow::Result<()>;

    /// Atomically appends one comment, preserving insertion order against
    /// concurrent appends from other sessions.
    async fn append_comment(&self, id: Uuid, text: &str) -> anyhow::Result<()>;

    /// Full-collection scan. No filter, no pagination; timestamps are
    /// normalized to UTC on read.
    async fn list_all(&self) -> anyhow::Result<Vec<Take>>;
}

/// Hosted content-moderation contract.
///
/// One classification call per submission: no retry, no caching, no rate
/// limiting in this core. A failed call must surface as an error — the
/// classifier never fabricates a verdict.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ModerationClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> anyhow::Result<ModerationVerdict>;
}

//! # Domain Models
//!
//! These structs represent the core entities of Clutch Takes.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Yes/no vote counters for a single take.
///
/// Counters are increment-only: each vote action adds exactly 1 to one
/// side, and nothing in the system ever decrements or resets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Votes {
    pub yes: u64,
    pub no: u64,
}

impl Votes {
    /// Combined engagement across both sides.
    pub fn total(&self) -> u64 {
        self.yes + self.no
    }
}

/// A single user-submitted opinion statement.
///
/// Once created, a take is immutable except for `votes` (increment-only)
/// and `comments` (append-only). There is no delete operation anywhere in
/// the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Take {
    pub id: Uuid,
    pub text: String,
    pub votes: Votes,
    /// Append-only, insertion order preserved.
    pub comments: Vec<String>,
    /// Store-assigned canonical value. The submit path returns a transient
    /// client-side approximation until the next full load.
    pub created_at: DateTime<Utc>,
    /// Set exactly once at creation from the moderation outcome.
    pub is_flagged: bool,
    /// Empty when not flagged.
    pub flag_reason: String,
}

/// The write-side shape handed to the store. The store assigns `id` and
/// the canonical `created_at`; votes and comments always start empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTake {
    pub text: String,
    pub is_flagged: bool,
    pub flag_reason: String,
}

/// Which side of a take a vote lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yes,
    No,
}

impl VoteChoice {
    /// Wire/column name of the counter this choice targets.
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteChoice::Yes => "yes",
            VoteChoice::No => "no",
        }
    }
}

/// The moderation classifier's decision for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    pub flag_for_review: bool,
    /// Absent when the model affirms the schema but offers no justification.
    pub reason: Option<String>,
}

/// Feed orderings. Parsed leniently: an unrecognized key sorts nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    MostVotesTotal,
    MostApproved,
    MostDisapproved,
    MostDiscussed,
    /// Identity ordering for keys we don't recognize.
    Unsorted,
}

impl SortKey {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "newest" => SortKey::Newest,
            "oldest" => SortKey::Oldest,
            "most_votes_total" => SortKey::MostVotesTotal,
            "most_approved" => SortKey::MostApproved,
            "most_disapproved" => SortKey::MostDisapproved,
            "most_discussed" => SortKey::MostDiscussed,
            _ => SortKey::Unsorted,
        }
    }
}

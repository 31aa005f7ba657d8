//! # api-adapters
//!
//! The thin presentation adapter: JSON routes mapping 1:1 onto the
//! domain's presentation boundary (submit, vote, comment, load + sorted
//! view). All failures arrive here as structured `TakeError` kinds and
//! leave as JSON with a matching status code; nothing panics across this
//! boundary.

#[cfg(feature = "web-axum")]
pub mod routes;

#[cfg(feature = "web-axum")]
pub use routes::{router, AppState};

use chrono::{DateTime, Utc};
use domains::{Take, Votes};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Wire projection of a take, camelCase per the web client contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TakeDto {
    pub id: Uuid,
    pub text: String,
    pub votes: Votes,
    pub comments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub is_flagged: bool,
    pub flag_reason: String,
}

impl From<Take> for TakeDto {
    fn from(take: Take) -> Self {
        Self {
            id: take.id,
            text: take.text,
            votes: take.votes,
            comments: take.comments,
            created_at: take.created_at,
            is_flagged: take.is_flagged,
            flag_reason: take.flag_reason,
        }
    }
}

/// Response shape for a submission attempt, success or failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitTakeResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take: Option<TakeDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SubmitTakeResult {
    pub fn ok(take: Take) -> Self {
        let flagged = take.is_flagged;
        let reason = take.flag_reason.clone();
        Self {
            success: true,
            take: Some(take.into()),
            error: None,
            flagged: Some(flagged),
            reason: Some(reason),
        }
    }

    pub fn err(message: String) -> Self {
        Self {
            success: false,
            take: None,
            error: Some(message),
            flagged: None,
            reason: None,
        }
    }
}

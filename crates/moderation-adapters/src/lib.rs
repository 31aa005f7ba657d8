//! # moderation-adapters
//!
//! Gemini-backed implementation of the `ModerationClassifier` port over
//! the Generative Language REST API.
//!
//! One request per classification, output constrained to the verdict
//! schema via `responseSchema`. No retries, no caching: any transport,
//! quota, or malformed-output failure surfaces to the caller, which
//! treats moderation as a hard prerequisite to persistence.

use anyhow::{bail, Context};
use async_trait::async_trait;
use domains::{ModerationClassifier, ModerationVerdict};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::json;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-latest";

const MODERATION_PROMPT: &str = "You are an AI content moderator responsible for \
reviewing user-submitted takes and flagging those that contain hate speech, \
negativity, or violate community guidelines.\n\n\
Analyze the following take and determine if it should be flagged for review. \
Consider factors such as the presence of offensive language, discriminatory \
statements, or overly negative sentiment.\n\n\
Take: ";

pub struct GeminiClassifier {
    http: reqwest::Client,
    model: String,
    api_key: Option<SecretString>,
}

impl GeminiClassifier {
    /// A missing API key is tolerated at construction: we log a warning
    /// and rely on ambient credential discovery on the hosted side.
    /// Requests that end up unauthenticated fail per call, not at startup.
    pub fn new(model: impl Into<String>, api_key: Option<SecretString>) -> Self {
        if api_key.is_none() {
            tracing::warn!(
                "no Gemini API key configured; falling back to ambient credentials, \
                 classification calls may fail"
            );
        }
        Self {
            http: reqwest::Client::new(),
            model: model.into(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }
}

#[async_trait]
impl ModerationClassifier for GeminiClassifier {
    async fn classify(&self, text: &str) -> anyhow::Result<ModerationVerdict> {
        let mut request = self
            .http
            .post(self.endpoint())
            .json(&moderation_request(text));
        if let Some(key) = &self.api_key {
            request = request.header("x-goog-api-key", key.expose_secret());
        }

        let response = request
            .send()
            .await
            .context("moderation request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("moderation service returned {status}: {body}");
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("moderation response was not valid JSON")?;
        verdict_from_response(parsed)
    }
}

/// Request body: fixed instruction plus the take text, output locked to
/// the verdict schema, and a hate-speech safety threshold so the hosted
/// filter can intercept egregious content on its own.
fn moderation_request(text: &str) -> serde_json::Value {
    json!({
        "contents": [{
            "parts": [{ "text": format!("{MODERATION_PROMPT}{text}") }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "flagForReview": { "type": "BOOLEAN" },
                    "reason": { "type": "STRING" }
                },
                "required": ["flagForReview"]
            }
        },
        "safetySettings": [{
            "category": "HARM_CATEGORY_HATE_SPEECH",
            "threshold": "BLOCK_MEDIUM_AND_ABOVE"
        }]
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// The model's JSON verdict, camelCase on the wire.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVerdict {
    flag_for_review: bool,
    reason: Option<String>,
}

/// Extracts the verdict from a response, or fails. Never fabricates a
/// decision: a safety block or an empty candidate list is an error for
/// the submission as a whole.
fn verdict_from_response(response: GenerateContentResponse) -> anyhow::Result<ModerationVerdict> {
    if let Some(feedback) = &response.prompt_feedback {
        if let Some(reason) = &feedback.block_reason {
            bail!("prompt blocked by safety filter: {reason}");
        }
    }

    let text = response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|c| c.parts.first())
        .and_then(|p| p.text.as_deref())
        .filter(|t| !t.trim().is_empty());

    let Some(text) = text else {
        bail!("moderation model returned no output");
    };

    let wire: WireVerdict = serde_json::from_str(text)
        .context("moderation model output did not match the verdict schema")?;

    Ok(ModerationVerdict {
        flag_for_review: wire.flag_for_review,
        reason: wire.reason.filter(|r| !r.is_empty()),
    })
}

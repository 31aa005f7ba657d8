//! Axum routes for the take feed.
//!
//! Vote and comment writes go straight to the store port, exactly like
//! the client controller does; submission goes through the lifecycle
//! service so moderation always runs first.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use domains::{SortKey, TakeError, TakeStore, VoteChoice};
use serde::{Deserialize, Serialize};
use services::feed::sorted_by;
use services::TakeLifecycleService;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::{SubmitTakeResult, TakeDto};

pub struct AppState {
    pub lifecycle: Arc<TakeLifecycleService>,
    pub store: Arc<dyn TakeStore>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/takes", get(list_takes).post(submit_take))
        .route("/takes/{id}/votes", post(cast_vote))
        .route("/takes/{id}/comments", post(add_comment))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn status_for(err: &TakeError) -> StatusCode {
    match err {
        TakeError::EmptyInput => StatusCode::UNPROCESSABLE_ENTITY,
        TakeError::ModerationUnavailable(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(err: TakeError) -> Response {
    let status = status_for(&err);
    tracing::warn!(%err, "request failed");
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

#[derive(Debug, Deserialize)]
struct ListParams {
    sort: Option<String>,
}

async fn list_takes(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Response {
    let takes = match state.store.list_all().await {
        Ok(takes) => takes,
        Err(e) => return error_response(TakeError::FetchFailure(e)),
    };

    let key = params
        .sort
        .as_deref()
        .map(SortKey::parse)
        .unwrap_or_default();
    let view: Vec<TakeDto> = sorted_by(&takes, key).into_iter().map(Into::into).collect();
    Json(view).into_response()
}

#[derive(Debug, Deserialize)]
struct SubmitBody {
    text: String,
}

async fn submit_take(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SubmitBody>,
) -> Response {
    match state.lifecycle.submit_take(&body.text).await {
        Ok(take) => (StatusCode::CREATED, Json(SubmitTakeResult::ok(take))).into_response(),
        Err(err) => {
            let status = status_for(&err);
            tracing::warn!(%err, "submission failed");
            (status, Json(SubmitTakeResult::err(err.to_string()))).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct VoteBody {
    choice: VoteChoice,
}

#[derive(Debug, Serialize)]
struct Ack {
    success: bool,
}

async fn cast_vote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<VoteBody>,
) -> Response {
    match state.store.increment_vote(id, body.choice).await {
        Ok(()) => Json(Ack { success: true }).into_response(),
        Err(e) => error_response(TakeError::VoteFailure(e)),
    }
}

#[derive(Debug, Deserialize)]
struct CommentBody {
    text: String,
}

async fn add_comment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<CommentBody>,
) -> Response {
    // Empty comments are a silent no-op, same as the client controller.
    if body.text.trim().is_empty() {
        return Json(Ack { success: true }).into_response();
    }
    match state.store.append_comment(id, &body.text).await {
        Ok(()) => Json(Ack { success: true }).into_response(),
        Err(e) => error_response(TakeError::CommentFailure(e)),
    }
}

//! JSON handlers for the leaderboard API.
//!
//! Field names on the wire follow the existing frontend, including its
//! `reactiountime` spelling.

use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use rtb_engine::{Leaderboard, Submission};
use rtb_types::Entry;

use crate::error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub board: Leaderboard,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    pub rank: u32,
    #[serde(rename = "reactiountime")]
    pub reaction_time: f64,
    pub time: String,
    pub code: String,
    pub info: String,
}

impl From<&Entry> for EntryView {
    fn from(e: &Entry) -> Self {
        Self {
            rank: e.rank,
            reaction_time: e.reaction_time,
            time: e.timestamp.to_iso(),
            code: e.code.to_string(),
            info: e.info.clone(),
        }
    }
}

/// Submission body. Fields are loosely typed so wrong types can be reported
/// or ignored the way clients expect.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubmitRequest {
    #[serde(rename = "reactionTime")]
    pub reaction_time: Option<Value>,
    pub info: Option<Value>,
    pub code: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub rank: u32,
    pub code: String,
    pub entry: EntryView,
    pub leaderboard: Vec<EntryView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CodeResponse {
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn views(entries: &[Entry]) -> Vec<EntryView> {
    entries.iter().map(EntryView::from).collect()
}

/// `GET /api/leaderboard`
pub async fn leaderboard_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<EntryView>>, ApiError> {
    let entries = state.board.list().await?;
    Ok(Json(views(&entries)))
}

/// `POST /api/submit`
pub async fn submit_handler(
    State(state): State<AppState>,
    body: Option<Json<SubmitRequest>>,
) -> Result<Json<SubmitResponse>, ApiError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let reaction_time = req
        .reaction_time
        .as_ref()
        .and_then(Value::as_f64)
        .ok_or_else(|| ApiError::bad_request("reactionTime must be a number"))?;

    let submission = Submission {
        reaction_time,
        info: req.info.as_ref().and_then(Value::as_str).map(str::to_string),
        code: req.code.as_ref().and_then(Value::as_str).map(str::to_string),
    };
    let outcome = state.board.submit(submission).await?;

    Ok(Json(SubmitResponse {
        rank: outcome.entry.rank,
        code: outcome.entry.code.to_string(),
        entry: EntryView::from(&outcome.entry),
        leaderboard: views(&outcome.leaderboard),
    }))
}

/// `GET /api/new-code`
pub async fn new_code_handler(State(state): State<AppState>) -> Result<Json<CodeResponse>, ApiError> {
    let code = state.board.reserve_code().await?;
    Ok(Json(CodeResponse {
        code: code.to_string(),
    }))
}

/// `GET /api/health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

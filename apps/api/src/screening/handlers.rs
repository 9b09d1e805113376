//! Axum route handlers for the Screening API.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::session::{Phase, SessionState, TranscriptEntry};
use crate::screening::store::SessionHandle;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
    pub phase: Phase,
    pub transcript: Vec<TranscriptEntry>,
}

/// Session state plus the candidate profile derived from it.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub session: SessionState,
    pub profile: BTreeMap<String, String>,
}

impl From<&SessionState> for SessionSnapshot {
    fn from(session: &SessionState) -> Self {
        Self {
            session: session.clone(),
            profile: session.profile(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct TurnResponse {
    pub reply: String,
    pub phase: Phase,
    /// Key of the field being collected; absent once collection is over.
    pub current_field: Option<&'static str>,
    pub retry_count: u8,
    pub tech_index: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session = state.screener.start_session(Uuid::new_v4());
    let response = CreateSessionResponse {
        session_id: session.id,
        phase: session.phase,
        transcript: session.transcript.clone(),
    };
    state.sessions.insert(session).await;
    info!(session_id = %response.session_id, "Session created");

    (StatusCode::CREATED, Json(response))
}

/// GET /api/v1/sessions/:id
///
/// Full snapshot: transcript, collected answers (forced-skips included) and
/// technical answers with feedback.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = find_session(&state, id).await?;
    let session = handle.lock().await;
    Ok(Json(SessionSnapshot::from(&*session)))
}

/// POST /api/v1/sessions/:id/turns
///
/// Processes one candidate message. The session lock is held for the whole
/// turn, so a second submission waits for the first to finish.
pub async fn handle_turn(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TurnRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    debug!(session_id = %id, text = %request.text, "Candidate turn");

    let outcome = state.screener.handle_turn(&mut session, &request.text).await;

    let current_field = match session.phase {
        Phase::Collecting => state
            .screener
            .fields()
            .get(session.current_field_index)
            .map(|f| f.key),
        _ => None,
    };

    Ok(Json(TurnResponse {
        reply: outcome.reply,
        phase: outcome.phase,
        current_field,
        retry_count: session.retry_count,
        tech_index: session.tech_index,
    }))
}

/// POST /api/v1/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = find_session(&state, id).await?;
    let mut session = handle.lock().await;
    state.screener.reset_session(&mut session);
    Ok(Json(SessionSnapshot::from(&*session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    info!(session_id = %id, "Session deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::interview::orchestrator::InterviewSnapshot;
use crate::interview::profile::{form_options, FormOptions, ProfileForm};
use crate::interview::session::Session;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub snapshot: InterviewSnapshot,
}

#[derive(Deserialize)]
pub struct AnswerRequest {
    pub answer: String,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Start,
    RequestScores,
    Reset,
    DismissError,
    Resume,
}

#[derive(Deserialize)]
pub struct ActionRequest {
    pub action: Action,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Session, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// GET /api/v1/options
pub async fn handle_options() -> Json<FormOptions> {
    Json(form_options())
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionCreated>) {
    let session = state.sessions.create().await;
    (
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id,
            created_at: session.created_at,
            snapshot: session.snapshot(),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    Ok(Json(session.snapshot()))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id).await {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/profile
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(form): AppJson<ProfileForm>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    session.lock()?.submit_profile(form)?;
    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/answers
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<AnswerRequest>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    let mut interview = session.lock()?;
    let services = state.services.clone();

    // Runs to completion even if the client goes away.
    tokio::spawn(async move { interview.submit_answer(&services, &req.answer).await })
        .await
        .map_err(anyhow::Error::from)??;

    Ok(Json(session.snapshot()))
}

/// POST /api/v1/sessions/:id/actions
pub async fn handle_action(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<ActionRequest>,
) -> Result<Json<InterviewSnapshot>, AppError> {
    let session = find_session(&state, id).await?;
    let mut interview = session.lock()?;
    let services = state.services.clone();
    info!("Session {}: {:?}", id, req.action);

    tokio::spawn(async move {
        match req.action {
            Action::Start => interview.start(&services).await,
            Action::RequestScores => interview.request_scores(&services).await,
            Action::Resume => interview.resume(&services).await,
            Action::Reset => {
                interview.reset();
                Ok(())
            }
            Action::DismissError => interview.dismiss_error(),
        }
    })
    .await
    .map_err(anyhow::Error::from)??;

    Ok(Json(session.snapshot()))
}

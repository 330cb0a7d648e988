//! Axum route handlers for the Interview API.
//!
//! Every handler takes the session lock with `try_lock` and keeps it until the
//! action (model call included) is finished, so a session never has two model
//! calls in flight.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::conductor::{self, TurnOutcome, MAX_ANSWER_CHARS};
use crate::interview::feedback;
use crate::interview::prompts::OPENING_HINT;
use crate::models::message::Message;
use crate::models::profile::{
    Company, Level, Position, Profile, ProfileForm, MAX_EXPERIENCE_CHARS, MAX_NAME_CHARS,
    MAX_SKILLS_CHARS,
};
use crate::session::store::SessionHandle;
use crate::session::{Phase, Session, MAX_TURNS};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: String,
}

/// What the presentation layer renders. The system instruction is never exposed.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub phase: Phase,
    pub turn_count: u32,
    pub max_turns: u32,
    pub turns_remaining: u32,
    pub chat_complete: bool,
    pub feedback_shown: bool,
    pub profile: Option<Profile>,
    pub messages: Vec<Message>,
    pub feedback: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub hint: Option<&'static str>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        let hint = (session.phase == Phase::Interviewing).then_some(OPENING_HINT);
        SessionView {
            id: session.id,
            phase: session.phase,
            turn_count: session.turn_count,
            max_turns: MAX_TURNS,
            turns_remaining: session.turns_remaining(),
            chat_complete: session.chat_complete(),
            feedback_shown: session.feedback_shown(),
            profile: session.profile.clone(),
            messages: session.transcript.visible().cloned().collect(),
            feedback: session.feedback.clone(),
            started_at: session.started_at,
            hint,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileDefaults {
    pub level: Level,
    pub position: Position,
    pub company: Company,
}

#[derive(Debug, Serialize)]
pub struct Limits {
    pub name_chars: usize,
    pub experience_chars: usize,
    pub skills_chars: usize,
    pub answer_chars: usize,
    pub max_turns: u32,
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub levels: &'static [Level],
    pub positions: &'static [Position],
    pub companies: &'static [Company],
    pub defaults: ProfileDefaults,
    pub limits: Limits,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/options
///
/// Choices, defaults and bounds for rendering the setup form and chat input.
pub async fn handle_get_options() -> Json<OptionsResponse> {
    Json(OptionsResponse {
        levels: Level::ALL,
        positions: Position::ALL,
        companies: Company::ALL,
        defaults: ProfileDefaults {
            level: Level::default(),
            position: Position::default(),
            company: Company::default(),
        },
        limits: Limits {
            name_chars: MAX_NAME_CHARS,
            experience_chars: MAX_EXPERIENCE_CHARS,
            skills_chars: MAX_SKILLS_CHARS,
            answer_chars: MAX_ANSWER_CHARS,
            max_turns: MAX_TURNS,
        },
    })
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let (_, handle) = state.sessions.create();
    let session = handle.try_lock().map_err(|_| AppError::SessionBusy)?;
    Ok((StatusCode::CREATED, Json(SessionView::from(&*session))))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id)?;
    let session = handle.try_lock().map_err(|_| AppError::SessionBusy)?;
    Ok(Json(SessionView::from(&*session)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// POST /api/v1/sessions/:id/setup
///
/// Validates the profile form and starts the interview.
pub async fn handle_complete_setup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.try_lock().map_err(|_| AppError::SessionBusy)?;

    session.require_phase(Phase::Setup, "complete setup")?;
    let profile = Profile::try_from(form)?;
    conductor::complete_setup(&mut session, profile)?;

    Ok(Json(SessionView::from(&*session)))
}

/// POST /api/v1/sessions/:id/turns
///
/// Submits one answer and returns the interviewer's reply.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<TurnOutcome>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.try_lock().map_err(|_| AppError::SessionBusy)?;

    let outcome =
        conductor::submit_answer(&mut session, &request.content, state.gateway.as_ref()).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/sessions/:id/feedback
pub async fn handle_request_feedback(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.try_lock().map_err(|_| AppError::SessionBusy)?;

    let feedback = feedback::request_feedback(&mut session, state.gateway.as_ref()).await?;
    Ok(Json(FeedbackResponse { feedback }))
}

/// POST /api/v1/sessions/:id/restart
pub async fn handle_restart(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.try_lock().map_err(|_| AppError::SessionBusy)?;

    conductor::reset(&mut session);
    Ok(Json(SessionView::from(&*session)))
}

fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state.sessions.get(id).ok_or_else(|| not_found(id))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

//! Interview Conductor — the Setup → Interviewing → Complete state machine.
//!
//! Turn policy:
//! - Each accepted answer gets exactly one model reply and counts as one turn.
//! - The session becomes `Complete` immediately after turn `MAX_TURNS`; any
//!   further answer is rejected with `InvalidState`.
//! - A failed model call consumes nothing. The session is only mutated after
//!   the gateway returns successfully, so the candidate can resubmit the same
//!   answer and a dropped request never leaves an unanswered user message.

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::prompts::{build_system_prompt, render_pending_turn};
use crate::llm_client::ModelGateway;
use crate::models::message::{Message, Transcript};
use crate::models::profile::{bounded_text, Profile};
use crate::session::{Phase, Session, MAX_TURNS};

pub const MAX_ANSWER_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub turn_count: u32,
    pub turns_remaining: u32,
    pub phase: Phase,
}

/// Stores the profile and opens the interview with the interviewer persona.
pub fn complete_setup(session: &mut Session, profile: Profile) -> Result<(), AppError> {
    session.require_phase(Phase::Setup, "complete setup")?;

    session.transcript = Transcript::seeded(build_system_prompt(&profile));
    session.profile = Some(profile);
    session.turn_count = 0;
    session.started_at = Some(Utc::now());
    session.phase = Phase::Interviewing;

    info!("Session {} entered interview", session.id);
    Ok(())
}

/// Runs one interview turn: validate the answer, ask the model, commit the pair.
pub async fn submit_answer(
    session: &mut Session,
    input: &str,
    gateway: &dyn ModelGateway,
) -> Result<TurnOutcome, AppError> {
    session.require_phase(Phase::Interviewing, "submit an answer")?;
    let answer = bounded_text("answer", input, MAX_ANSWER_CHARS)?;

    // Interviewing always has turns left; Complete is entered on the last one.
    debug_assert!(session.turn_count < MAX_TURNS);

    let prompt = render_pending_turn(&session.transcript, &Message::user(answer.as_str()));
    let reply = gateway
        .generate(&session.model_id, &prompt)
        .await
        .map_err(|e| {
            warn!(
                "Session {} turn {} failed, not consumed: {e}",
                session.id,
                session.turn_count + 1
            );
            AppError::Gateway(e)
        })?;

    session.transcript.push_exchange(answer, reply.as_str());
    session.turn_count += 1;
    if session.turn_count >= MAX_TURNS {
        session.phase = Phase::Complete;
        info!("Session {} completed {} turns", session.id, session.turn_count);
    }

    Ok(TurnOutcome {
        reply,
        turn_count: session.turn_count,
        turns_remaining: session.turns_remaining(),
        phase: session.phase,
    })
}

/// Returns the session to a fresh Setup state from any phase.
pub fn reset(session: &mut Session) {
    info!("Session {} reset from {}", session.id, session.phase);
    session.reset();
}

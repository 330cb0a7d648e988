//! Feedback Generator — one scored critique per finished interview.

use tracing::{error, info};

use crate::errors::AppError;
use crate::interview::prompts::{fill_template, render_transcript, FEEDBACK_PROMPT_TEMPLATE};
use crate::llm_client::{GatewayError, ModelGateway};
use crate::models::message::Transcript;
use crate::session::{Phase, Session};

/// Evaluator instructions followed by the full rendered transcript.
pub fn build_feedback_prompt(transcript: &Transcript) -> String {
    let conversation = render_transcript(transcript);
    fill_template(
        FEEDBACK_PROMPT_TEMPLATE,
        &[("conversation", conversation.as_str())],
    )
}

/// Single model call, no retry. The raw text is meant for direct display.
pub async fn generate_feedback(
    gateway: &dyn ModelGateway,
    model_id: &str,
    prompt: &str,
) -> Result<String, GatewayError> {
    gateway.generate(model_id, prompt).await
}

/// Complete → FeedbackShown, or Complete → FeedbackPending when the call fails.
///
/// `FeedbackPending` is terminal; from there only a reset is accepted. The
/// phase is written only once the call has returned, so a dropped request
/// leaves the session in `Complete`.
pub async fn request_feedback(
    session: &mut Session,
    gateway: &dyn ModelGateway,
) -> Result<String, AppError> {
    session.require_phase(Phase::Complete, "request feedback")?;

    let prompt = build_feedback_prompt(&session.transcript);
    let feedback = match generate_feedback(gateway, &session.model_id, &prompt).await {
        Ok(feedback) => feedback,
        Err(e) => {
            error!("Session {} feedback generation failed: {e}", session.id);
            session.phase = Phase::FeedbackPending;
            return Err(AppError::FeedbackFailed(e));
        }
    };

    session.feedback = Some(feedback.clone());
    session.phase = Phase::FeedbackShown;
    info!("Session {} feedback shown", session.id);
    Ok(feedback)
}

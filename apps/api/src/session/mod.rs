//! Session state — the one aggregate every interview action reads and writes.

pub mod store;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::message::Transcript;
use crate::models::profile::Profile;

/// Number of answered turns after which the interview is complete.
pub const MAX_TURNS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Setup,
    Interviewing,
    /// Interview finished, waiting for the candidate to ask for feedback.
    Complete,
    /// The feedback call failed. Only a reset leaves this phase.
    FeedbackPending,
    FeedbackShown,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Setup => "setup",
            Phase::Interviewing => "interviewing",
            Phase::Complete => "complete",
            Phase::FeedbackPending => "feedback_pending",
            Phase::FeedbackShown => "feedback_shown",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub profile: Option<Profile>,
    pub transcript: Transcript,
    pub turn_count: u32,
    pub phase: Phase,
    pub model_id: String,
    pub feedback: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: Uuid, model_id: impl Into<String>) -> Self {
        Self {
            id,
            profile: None,
            transcript: Transcript::default(),
            turn_count: 0,
            phase: Phase::Setup,
            model_id: model_id.into(),
            feedback: None,
            started_at: None,
        }
    }

    /// True once the interview has ended, whatever happened to the feedback.
    pub fn chat_complete(&self) -> bool {
        matches!(
            self.phase,
            Phase::Complete | Phase::FeedbackPending | Phase::FeedbackShown
        )
    }

    pub fn feedback_shown(&self) -> bool {
        self.phase == Phase::FeedbackShown
    }

    pub fn turns_remaining(&self) -> u32 {
        MAX_TURNS.saturating_sub(self.turn_count)
    }

    /// Rejects `action` unless the session is in `expected`.
    pub fn require_phase(&self, expected: Phase, action: &'static str) -> Result<(), AppError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(AppError::InvalidState {
                phase: self.phase,
                action,
            })
        }
    }

    /// Hard wipe back to a fresh Setup session. Keeps only the id and model.
    pub fn reset(&mut self) {
        *self = Session::new(self.id, std::mem::take(&mut self.model_id));
    }
}

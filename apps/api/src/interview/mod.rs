// Mock interview: prompt composition, the turn state machine, and scored feedback.
// All model calls go through the ModelGateway trait — no direct HTTP calls here.

pub mod conductor;
pub mod feedback;
pub mod handlers;
pub mod prompts;

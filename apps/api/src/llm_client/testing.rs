//! Scripted `ModelGateway` doubles for unit and router tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GatewayError, ModelGateway};

/// Replies "ack {n}" to the n-th call (1-based). Calls listed in `fail_on`
/// return a quota error instead; failed calls still advance the counter.
#[derive(Default)]
pub struct EchoGateway {
    calls: AtomicUsize,
    fail_on: Vec<usize>,
    prompts: Mutex<Vec<String>>,
}

impl EchoGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(calls: &[usize]) -> Self {
        Self {
            fail_on: calls.to_vec(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for EchoGateway {
    async fn generate(&self, _model_id: &str, prompt: &str) -> Result<String, GatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail_on.contains(&n) {
            return Err(GatewayError::QuotaExhausted(format!("call {n} rejected")));
        }
        Ok(format!("ack {n}"))
    }
}

/// Returns queued results in order; panics when the script runs out.
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    models: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            models: Mutex::new(Vec::new()),
        }
    }

    pub fn models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn generate(&self, model_id: &str, _prompt: &str) -> Result<String, GatewayError> {
        self.models.lock().unwrap().push(model_id.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedGateway ran out of replies")
    }
}

/// Never answers. Used to drop a request while the call is in flight.
pub struct StalledGateway;

#[async_trait]
impl ModelGateway for StalledGateway {
    async fn generate(&self, _model_id: &str, _prompt: &str) -> Result<String, GatewayError> {
        std::future::pending().await
    }
}

use std::collections::VecDeque;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::backend::TextGenerator;
use super::error::LlmError;

/// Scripted [`TextGenerator`].
///
/// Replies are served in order; once the script runs out, the last reply repeats.
#[derive(Default)]
pub struct MockGenerator {
    replies: RwLock<VecDeque<String>>,
    last_reply: RwLock<Option<String>>,
    prompts: RwLock<Vec<(String, String)>>,
    calls: AtomicUsize,
    fail: AtomicBool,
    delay: RwLock<Option<Duration>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_replies(vec![reply.into()])
    }

    pub fn with_replies(replies: Vec<String>) -> Self {
        Self {
            replies: RwLock::new(replies.into()),
            ..Self::default()
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        if let Ok(mut d) = self.delay.write() {
            *d = delay;
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(system, user)` prompts in call order.
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.read().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn generate(&self, system: &str, user: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.write() {
            prompts.push((system.to_string(), user.to_string()));
        }

        let delay = self.delay.read().ok().and_then(|d| *d);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(LlmError::Status {
                provider: "mock",
                status: 500,
                body: "injected failure".to_string(),
            });
        }

        let poisoned = || LlmError::Request {
            provider: "mock",
            message: "lock poisoned".to_string(),
        };

        let next = self.replies.write().map_err(|_| poisoned())?.pop_front();
        let mut last = self.last_reply.write().map_err(|_| poisoned())?;
        if let Some(reply) = next {
            *last = Some(reply);
        }
        last.clone().ok_or(LlmError::EmptyResponse { provider: "mock" })
    }
}

use std::sync::Arc;

use tracing::debug;

use crate::pipeline::{CheckError, FactChecker};

/// Builds a checker for per-request credentials `(core_api_key, ai_api_key)`.
pub type CheckerFactory =
    dyn Fn(Option<&str>, Option<&str>) -> Result<FactChecker, CheckError> + Send + Sync;

#[derive(Clone)]
pub struct AppState {
    pub checker: Arc<FactChecker>,

    pub overrides: Option<Arc<CheckerFactory>>,
}

impl AppState {
    pub fn new(checker: Arc<FactChecker>) -> Self {
        Self {
            checker,
            overrides: None,
        }
    }

    pub fn with_overrides(mut self, factory: Arc<CheckerFactory>) -> Self {
        self.overrides = Some(factory);
        self
    }

    /// The shared checker, or a fresh one when the request carries its own keys.
    pub fn checker_for(
        &self,
        core_api_key: Option<&str>,
        ai_api_key: Option<&str>,
    ) -> Result<Arc<FactChecker>, CheckError> {
        let core_api_key = core_api_key.filter(|k| !k.trim().is_empty());
        let ai_api_key = ai_api_key.filter(|k| !k.trim().is_empty());

        if core_api_key.is_none() && ai_api_key.is_none() {
            return Ok(Arc::clone(&self.checker));
        }

        match &self.overrides {
            Some(factory) => {
                debug!(
                    core_override = core_api_key.is_some(),
                    ai_override = ai_api_key.is_some(),
                    "Building per-request checker"
                );
                factory(core_api_key, ai_api_key).map(Arc::new)
            }
            None => {
                debug!("Credential overrides not enabled, using shared checker");
                Ok(Arc::clone(&self.checker))
            }
        }
    }
}

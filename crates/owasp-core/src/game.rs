use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use textgen::{OfflineProvider, OpenAiProvider, TextGenerator};
use tracing::warn;

use crate::catalog;
use crate::config::Config;
use crate::console;
use crate::generator::{self, LevelOrigin};
use crate::level::Level;
use crate::validator::{self, Verdict};

/// What a submission produces for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionResult {
    pub outcome: bool,
    pub lines: Vec<String>,
}

/// Entry point for front ends: level lookup, dynamic level authoring, and
/// command submission. Every operation resolves to a value; collaborator
/// failures are absorbed by the fallbacks.
#[derive(Clone)]
pub struct Game {
    generator: Arc<dyn TextGenerator>,
    config: Config,
}

impl Game {
    pub fn new(generator: Arc<dyn TextGenerator>, config: Config) -> Self {
        Self { generator, config }
    }

    /// Build a game backed by the configured provider. Without an API key
    /// (or with `offline`) every collaborator call takes the fallback path.
    pub fn connect(config: Config, offline: bool) -> Self {
        if offline {
            return Self::new(Arc::new(OfflineProvider), config);
        }
        let provider = &config.provider;
        match OpenAiProvider::from_env(
            provider.base_url.clone(),
            &provider.api_key_env,
            Duration::from_secs(provider.timeout_secs),
        ) {
            Ok(p) => Self::new(Arc::new(p), config),
            Err(e) => {
                warn!(error = %e, "text generation unavailable; running offline");
                Self::new(Arc::new(OfflineProvider), config)
            }
        }
    }

    pub fn backend(&self) -> &str {
        self.generator.name()
    }

    pub async fn request_dynamic_level(&self) -> Level {
        generator::generate_dynamic_level(self.generator.as_ref(), &self.config.generation).await
    }

    pub async fn author_dynamic_level(&self) -> (Level, LevelOrigin) {
        generator::author_dynamic_level(self.generator.as_ref(), &self.config.generation).await
    }

    /// Static lookup for 1-10, a freshly generated level for 11.
    pub async fn level(&self, id: u32) -> Option<Level> {
        if !catalog::is_known(id) {
            return None;
        }
        if catalog::is_static(id) {
            catalog::static_level(id)
        } else {
            Some(self.request_dynamic_level().await)
        }
    }

    pub async fn validate(&self, command: &str, level: &Level) -> Verdict {
        validator::validate(self.generator.as_ref(), command, level, &self.config.judge).await
    }

    pub async fn submit_command_with_rng<R: Rng + ?Sized>(
        &self,
        command: &str,
        level: &Level,
        rng: &mut R,
    ) -> SubmissionResult {
        let verdict = self.validate(command, level).await;
        SubmissionResult {
            outcome: verdict.correct,
            lines: console::format_output(command, verdict.correct, level, rng),
        }
    }

    pub async fn submit_command(&self, command: &str, level: &Level) -> SubmissionResult {
        let verdict = self.validate(command, level).await;
        SubmissionResult {
            outcome: verdict.correct,
            lines: console::format_output(command, verdict.correct, level, &mut rand::thread_rng()),
        }
    }
}

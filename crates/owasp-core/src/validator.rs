use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use textgen::{GenerationRequest, TextGenerator};
use tracing::{debug, warn};

use crate::config::JudgeConfig;
use crate::level::Level;

/// The only reply the judge may give for a pass.
pub const CORRECT_TOKEN: &str = "CORRECT";

// ---------------------------------------------------------------------------
// Deterministic comparison
// ---------------------------------------------------------------------------

static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();

fn whitespace_runs() -> &'static Regex {
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Trim, lower-case, and collapse internal whitespace runs to one space.
pub fn normalize(command: &str) -> String {
    whitespace_runs()
        .replace_all(command.trim(), " ")
        .to_lowercase()
}

/// Literal match of normalized forms. An empty command never matches
/// because expected commands are never empty.
pub fn matches_expected(command: &str, expected: &str) -> bool {
    let command = normalize(command);
    !command.is_empty() && command == normalize(expected)
}

// ---------------------------------------------------------------------------
// Judge
// ---------------------------------------------------------------------------

/// Outcome of asking the judge. `Unavailable` means the judge could not be
/// consulted at all; a negative verdict is `Judged(false)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgment {
    Judged(bool),
    Unavailable,
}

pub fn judge_prompt(command: &str, level: &Level) -> String {
    format!(
        r#"You are a cybersecurity challenge validator. The player is attempting to exploit a vulnerability.

Expected command pattern: {expected}
User's command: {command}

Evaluate if the user's command is attempting to exploit the "{title}" vulnerability correctly.
Be lenient with syntax variations, parameter ordering, and minor differences, but the core exploit technique must be correct.

Respond with ONLY "{CORRECT_TOKEN}" or "INCORRECT" (nothing else)."#,
        expected = level.expected_command,
        title = level.title,
    )
}

pub fn judge_request(command: &str, level: &Level, config: &JudgeConfig) -> GenerationRequest {
    GenerationRequest::new(judge_prompt(command, level), config.model.clone())
        .temperature(config.temperature)
        .max_tokens(config.max_tokens)
}

/// `true` only for a reply that is exactly `CORRECT` after trimming and
/// upper-casing. Punctuation, quotes, or extra words are a fail.
pub fn interpret_reply(reply: &str) -> bool {
    reply.trim().to_uppercase() == CORRECT_TOKEN
}

pub async fn judge(
    generator: &dyn TextGenerator,
    command: &str,
    level: &Level,
    config: &JudgeConfig,
) -> Judgment {
    let request = judge_request(command, level, config);
    match generator.generate(&request).await {
        Ok(reply) => {
            let verdict = interpret_reply(&reply);
            debug!(level = level.id, reply = %reply.trim(), verdict, "judge replied");
            Judgment::Judged(verdict)
        }
        Err(e) => {
            warn!(backend = generator.name(), error = %e, "judge unavailable; falling back to literal match");
            Judgment::Unavailable
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecidedBy {
    Judge,
    LiteralMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub correct: bool,
    pub decided_by: DecidedBy,
}

/// Resolve a judgment into a verdict, running the literal comparison only
/// when the judge was unavailable.
pub fn resolve(judgment: Judgment, command: &str, level: &Level) -> Verdict {
    match judgment {
        Judgment::Judged(correct) => Verdict {
            correct,
            decided_by: DecidedBy::Judge,
        },
        Judgment::Unavailable => Verdict {
            correct: matches_expected(command, &level.expected_command),
            decided_by: DecidedBy::LiteralMatch,
        },
    }
}

/// Decide whether `command` exploits `level`. Never fails.
pub async fn validate(
    generator: &dyn TextGenerator,
    command: &str,
    level: &Level,
    config: &JudgeConfig,
) -> Verdict {
    let judgment = judge(generator, command, level, config).await;
    resolve(judgment, command, level)
}

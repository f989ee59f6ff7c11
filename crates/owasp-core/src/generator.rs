use serde::Deserialize;
use textgen::{GenerationRequest, TextGenerator};
use tracing::{debug, warn};

use crate::catalog::DYNAMIC_LEVEL_ID;
use crate::config::GenerationConfig;
use crate::level::Level;

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Short names of the static classes the generated level must differ from.
const STATIC_CLASSES: &str = "SQL Injection, XSS, CSRF, IDOR, SSRF, RCE, Path Traversal, \
Broken Authentication, Security Misconfiguration, and Sensitive Data Exposure";

pub fn dynamic_level_prompt() -> String {
    format!(
        r#"Generate a cybersecurity OWASP Top 10 vulnerability level for an 80s retro terminal hacker game. Create level {DYNAMIC_LEVEL_ID} which is unique and different from: {STATIC_CLASSES}.

Return ONLY valid JSON in this exact format, no markdown, no extra text:
{{
  "title": "Vulnerability Name",
  "vulnerability": "One sentence description of what this vulnerability is",
  "tool": "tool-name-here",
  "description": "Detailed explanation with examples of how this vulnerability works",
  "expectedCommand": "correct command to execute the attack"
}}

Make sure the expectedCommand is a realistic single-line tool command that would exploit this vulnerability. Be creative with OWASP vulnerabilities like Broken Access Control, Injection variants, Deserialization, XXE, etc."#
    )
}

pub fn generation_request(config: &GenerationConfig) -> GenerationRequest {
    GenerationRequest::new(dynamic_level_prompt(), config.model.clone())
        .temperature(config.temperature)
        .max_tokens(config.max_tokens)
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// The schema the generator is asked to fill. `id` is assigned by the
/// caller; `hint` is optional because the prompt does not ask for one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedLevel {
    pub title: String,
    pub vulnerability: String,
    pub tool: String,
    pub description: String,
    pub expected_command: String,
    #[serde(default)]
    pub hint: Option<String>,
}

impl GeneratedLevel {
    pub fn into_level(self, id: u32) -> Level {
        let hint = match self.hint {
            Some(h) if !h.trim().is_empty() => h,
            _ => format!(
                "Read the briefing again and point {} at the weak component it describes",
                self.tool.trim()
            ),
        };
        Level {
            id,
            title: self.title,
            vulnerability: self.vulnerability,
            tool: self.tool,
            description: self.description,
            expected_command: self.expected_command,
            hint,
        }
    }
}

/// Every balanced `{...}` substring of `text`, in order of its opening brace.
///
/// Braces inside JSON string literals do not count toward balance. Nested
/// objects are yielded as well, after their enclosing object.
pub fn json_object_candidates(text: &str) -> impl Iterator<Item = &str> + '_ {
    text.char_indices()
        .filter(|&(_, c)| c == '{')
        .filter_map(move |(start, _)| balanced_end(text, start).map(|end| &text[start..end]))
}

/// Byte offset one past the `}` that closes the `{` at `start`.
fn balanced_end(text: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// First JSON object in `text` that decodes into the generated-level schema
/// and yields a well-formed level. Prose and markdown fences around it are
/// ignored, as are earlier unrelated objects.
pub fn parse_generated_level(text: &str, id: u32) -> Option<Level> {
    json_object_candidates(text).find_map(|candidate| {
        let generated: GeneratedLevel = serde_json::from_str(candidate).ok()?;
        let level = generated.into_level(id);
        level.is_well_formed().then_some(level)
    })
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

/// Substituted whenever generation fails, so the dynamic slot is always
/// playable.
pub fn fallback_level() -> Level {
    Level {
        id: DYNAMIC_LEVEL_ID,
        title: "API Security - Rate Limiting Bypass".to_string(),
        vulnerability: "Improper rate limiting allows attackers to bypass API protections through request manipulation.".to_string(),
        tool: "rate-limit-bypass".to_string(),
        description: "API endpoints without proper rate limiting can be exploited for credential stuffing, DDoS amplification, or resource exhaustion.".to_string(),
        expected_command: "rate-limit-bypass --endpoint=/api/auth --threads=1000 --delay=0ms --header-rotation".to_string(),
        hint: "Try removing rate limit headers or using different IP addresses".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelOrigin {
    Generated,
    Fallback,
}

/// Ask the generator for a new dynamic level. Never fails: any transport
/// error or unusable reply produces [`fallback_level`].
pub async fn author_dynamic_level(
    generator: &dyn TextGenerator,
    config: &GenerationConfig,
) -> (Level, LevelOrigin) {
    let request = generation_request(config);
    let reply = match generator.generate(&request).await {
        Ok(reply) => reply,
        Err(e) => {
            warn!(backend = generator.name(), error = %e, "level generation failed; using fallback level");
            return (fallback_level(), LevelOrigin::Fallback);
        }
    };

    match parse_generated_level(&reply, DYNAMIC_LEVEL_ID) {
        Some(level) => {
            debug!(title = %level.title, tool = %level.tool, "generated dynamic level");
            (level, LevelOrigin::Generated)
        }
        None => {
            warn!(reply_len = reply.len(), "generated level reply was not usable; using fallback level");
            (fallback_level(), LevelOrigin::Fallback)
        }
    }
}

/// [`author_dynamic_level`] without the origin tag.
pub async fn generate_dynamic_level(
    generator: &dyn TextGenerator,
    config: &GenerationConfig,
) -> Level {
    author_dynamic_level(generator, config).await.0
}

use crate::error::Result;
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ProviderConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Name of the environment variable that holds the API key. The key
    /// itself never lives in the config file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    textgen::DEFAULT_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// Sampling for dynamic level authoring: varied but on-schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_generation_temperature")]
    pub temperature: f32,
    #[serde(default = "default_generation_max_tokens")]
    pub max_tokens: u32,
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_generation_temperature() -> f32 {
    0.8
}

fn default_generation_max_tokens() -> u32 {
    500
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_generation_temperature(),
            max_tokens: default_generation_max_tokens(),
        }
    }
}

// ---------------------------------------------------------------------------
// JudgeConfig
// ---------------------------------------------------------------------------

/// Sampling for command judging: near-deterministic, one word of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_judge_temperature")]
    pub temperature: f32,
    #[serde(default = "default_judge_max_tokens")]
    pub max_tokens: u32,
}

fn default_judge_temperature() -> f32 {
    0.3
}

fn default_judge_max_tokens() -> u32 {
    10
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_judge_temperature(),
            max_tokens: default_judge_max_tokens(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub judge: JudgeConfig,
}

impl Config {
    /// Load `owasp-terminal.yaml` from `root`, or defaults if it is absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&data)?;
        Ok(config)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::config_path(root), data.as_bytes())
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        for (name, model, temperature, max_tokens) in [
            (
                "generation",
                &self.generation.model,
                self.generation.temperature,
                self.generation.max_tokens,
            ),
            (
                "judge",
                &self.judge.model,
                self.judge.temperature,
                self.judge.max_tokens,
            ),
        ] {
            if model.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{name}.model is empty"),
                });
            }
            if !(0.0..=2.0).contains(&temperature) {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("{name}.temperature {temperature} is outside 0.0..=2.0"),
                });
            }
            if max_tokens == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("{name}.max_tokens must be greater than zero"),
                });
            }
        }

        if self.judge.max_tokens > 50 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "judge.max_tokens is large: the judge only needs one word".to_string(),
            });
        }

        if self.provider.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "provider.timeout_secs is 0: requests will fail immediately".to_string(),
            });
        }

        warnings
    }
}

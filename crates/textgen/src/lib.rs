//! `textgen`: client for the text-generation service.
//!
//! Two consumers sit on top of this crate: the level generator (asks for a
//! JSON level description) and the command judge (asks for a one-word
//! verdict). Neither trusts the reply's shape; this crate only moves text.
//!
//! # Architecture
//!
//! ```text
//! GenerationRequest   ← prompt, model, temperature, max_tokens
//!     │
//!     ▼
//! dyn TextGenerator   ← OpenAiProvider (HTTP /chat/completions)
//!     │                  OfflineProvider (always unreachable)
//!     ▼
//! Result<String>      ← raw reply text, or TextGenError
//! ```

pub mod error;
pub mod provider;
pub mod types;


pub use error::TextGenError;
pub use provider::{OfflineProvider, OpenAiProvider, TextGenerator, DEFAULT_BASE_URL};
pub use types::{ChatCompletionResponse, GenerationRequest, TokenUsage};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, TextGenError>;

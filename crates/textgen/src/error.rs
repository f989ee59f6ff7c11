use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextGenError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider returned an empty body")]
    EmptyBody,

    #[error("failed to decode provider response: {source}\n  body: {body}")]
    Parse {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("provider response contained no choices")]
    NoChoices,

    #[error("API key not set: export {0}")]
    MissingApiKey(String),

    #[error("text generation is disabled (offline mode)")]
    Offline,
}

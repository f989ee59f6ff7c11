use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("level not found: {0}")]
    LevelNotFound(u32),

    #[error("no level is active: enter a level first")]
    NoActiveLevel,

    #[error("level {expected} is active, not level {got}")]
    LevelMismatch { expected: u32, got: u32 },

    #[error("a command is already being validated for level {0}")]
    Busy(u32),

    #[error("level {0} is already solved in this visit: reset to replay it")]
    AlreadySolved(u32),

    #[error("command is empty")]
    EmptyCommand,

    #[error("home directory not found: set HOME or pass --root")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;

//! Core of the OWASP terminal game.
//!
//! A player reads a level briefing, types a command for the level's fictional
//! tool, and the [`validator`] decides whether it exploits the vulnerability.
//! The judge is a text-generation service; when it is unreachable the
//! validator falls back to a literal comparison. Level 11 is authored by the
//! same service through the [`generator`], with a built-in fallback level.

pub mod catalog;
pub mod config;
pub mod console;
pub mod error;
pub mod game;
pub mod generator;
pub mod io;
pub mod level;
pub mod paths;
pub mod progress;
pub mod session;
pub mod validator;

#[cfg(test)]
mod testing;

pub use error::{GameError, Result};
pub use game::{Game, SubmissionResult};
pub use level::Level;
pub use progress::GameState;
pub use session::{Session, Ticket};

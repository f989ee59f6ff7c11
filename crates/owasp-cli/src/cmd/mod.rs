pub mod levels;
pub mod play;
pub mod reset;
pub mod serve;
pub mod show;
pub mod status;
pub mod submit;

use anyhow::Context;
use owasp_core::config::{Config, WarnLevel};
use owasp_core::{Game, GameError, Level};
use std::path::Path;

/// Load the config under `root` and connect to the configured backend.
pub(crate) fn connect(root: &Path, offline: bool) -> anyhow::Result<Game> {
    let config = Config::load(root).context("failed to load config")?;
    for warning in config.validate() {
        match warning.level {
            WarnLevel::Error => tracing::error!("config: {}", warning.message),
            WarnLevel::Warning => tracing::warn!("config: {}", warning.message),
        }
    }
    Ok(Game::connect(config, offline))
}

/// Resolve a level id, authoring level 11 on demand.
pub(crate) fn load_level(
    rt: &tokio::runtime::Runtime,
    game: &Game,
    id: u32,
) -> anyhow::Result<Level> {
    let level = rt.block_on(game.level(id)).ok_or(GameError::LevelNotFound(id))?;
    Ok(level)
}

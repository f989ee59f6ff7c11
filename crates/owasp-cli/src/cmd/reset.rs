use crate::output::print_json;
use anyhow::Context;
use owasp_core::GameState;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = GameState::default();
    state.save(root).context("failed to write game state")?;
    tracing::info!("game state reset");

    if json {
        print_json(&state)
    } else {
        println!("Progress reset.");
        Ok(())
    }
}

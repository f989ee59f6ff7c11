use crate::output::{print_json, print_lines};
use anyhow::Context;
use owasp_core::{GameState, Session};
use std::path::Path;

/// Enter level `id`, submit `command` once and record the outcome.
/// A rejected command is not an error.
pub fn run(root: &Path, id: u32, command: &str, offline: bool, json: bool) -> anyhow::Result<()> {
    let game = super::connect(root, offline)?;
    let rt = tokio::runtime::Runtime::new()?;
    let level = super::load_level(&rt, &game, id)?;

    let state = GameState::load(root).context("failed to load game state")?;
    let mut session = Session::new(state);
    session.enter_level(level);

    let ticket = session.begin_submission(id, command)?;
    let result = rt.block_on(game.submit_command(command, &ticket.level));
    let awarded = session.finish_submission(&ticket, &result);
    session
        .state
        .save(root)
        .context("failed to write game state")?;

    if json {
        return print_json(&serde_json::json!({
            "outcome": result.outcome,
            "lines": result.lines,
            "awarded": awarded,
            "score": session.state.score,
        }));
    }

    print_lines(&result.lines);
    if let Some(points) = awarded {
        println!("+{points} points (score {})", session.state.score);
    }
    Ok(())
}

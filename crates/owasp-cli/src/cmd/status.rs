use crate::output::print_json;
use anyhow::Context;
use owasp_core::catalog::TOTAL_LEVELS;
use owasp_core::GameState;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = GameState::load(root).context("failed to load game state")?;

    if json {
        return print_json(&serde_json::json!({
            "currentLevel": state.current_level,
            "completedLevels": state.completed_levels,
            "score": state.score,
            "completed": state.completed_count(),
            "total": TOTAL_LEVELS,
            "percent": state.progress_percent(),
        }));
    }

    let completed: Vec<String> = state.completed_levels.iter().map(u32::to_string).collect();
    println!("Score:     {}", state.score);
    println!("Level:     {}", state.current_level);
    println!(
        "Progress:  {}/{} ({}%)",
        state.completed_count(),
        TOTAL_LEVELS,
        state.progress_percent()
    );
    println!(
        "Completed: {}",
        if completed.is_empty() { "none".to_string() } else { completed.join(", ") }
    );
    Ok(())
}

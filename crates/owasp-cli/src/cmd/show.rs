use crate::output::print_json;
use owasp_core::GameState;
use std::path::Path;

pub fn run(root: &Path, id: u32, offline: bool, json: bool) -> anyhow::Result<()> {
    let game = super::connect(root, offline)?;
    let rt = tokio::runtime::Runtime::new()?;
    let level = super::load_level(&rt, &game, id)?;
    let completed = GameState::load(root)?.is_completed(id);

    if json {
        return print_json(&serde_json::json!({
            "id": level.id,
            "title": level.title,
            "vulnerabilityClass": level.vulnerability_class().to_uppercase(),
            "vulnerability": level.vulnerability,
            "description": level.description,
            "tool": level.tool,
            "prompt": level.console_prompt(),
            "completed": completed,
        }));
    }

    println!("LEVEL {}: {}", level.id, level.title);
    println!(
        "[{}]{}",
        level.vulnerability_class().to_uppercase(),
        if completed { "  ✓ completed" } else { "" }
    );
    println!();
    println!("{}", level.vulnerability);
    println!();
    println!("{}", level.description);
    println!();
    println!("Tool: {}", level.tool);
    println!("Prompt: {}", level.console_prompt());
    Ok(())
}

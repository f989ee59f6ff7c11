use crate::output::{print_json, print_table};
use anyhow::Context;
use owasp_core::catalog::{self, DYNAMIC_LEVEL_ID};
use owasp_core::GameState;
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let state = GameState::load(root).context("failed to load game state")?;

    #[derive(serde::Serialize)]
    struct Row {
        id: u32,
        title: String,
        tool: Option<String>,
        completed: bool,
    }

    let mut rows: Vec<Row> = catalog::static_levels()
        .map(|l| Row {
            id: l.id,
            completed: state.is_completed(l.id),
            title: l.title,
            tool: Some(l.tool),
        })
        .collect();
    rows.push(Row {
        id: DYNAMIC_LEVEL_ID,
        title: "DYNAMIC CHALLENGE".to_string(),
        tool: None,
        completed: state.is_completed(DYNAMIC_LEVEL_ID),
    });

    if json {
        return print_json(&rows);
    }

    let table = rows
        .into_iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.title,
                r.tool.unwrap_or_else(|| "?".to_string()),
                if r.completed { "✓".into() } else { String::new() },
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "TOOL", "DONE"], table);
    Ok(())
}

use axum::extract::{Path, State};
use axum::Json;
use owasp_core::console::classify_line;
use owasp_core::progress::{HINT_PENALTY, SOLUTION_PENALTY};
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommandBody {
    pub command: String,
}

/// POST /api/levels/{id}/commands: validate a command for the active level.
///
/// Validation runs on its own task so an abandoned request still releases
/// the level's submission slot when the judge answers.
pub async fn submit_command(
    State(app): State<AppState>,
    Path(id): Path<u32>,
    Json(body): Json<CommandBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let ticket = app.session.lock().await.begin_submission(id, &body.command)?;

    let task_app = app.clone();
    let task_ticket = ticket.clone();
    let handle = tokio::spawn(async move {
        let result = task_app
            .game
            .submit_command(&body.command, &task_ticket.level)
            .await;
        let (awarded, snapshot, completed) = {
            let mut session = task_app.session.lock().await;
            let awarded = session.finish_submission(&task_ticket, &result);
            let completed = session.state.is_completed(id);
            (awarded, session.state.clone(), completed)
        };
        if awarded.is_some() {
            task_app.persist(snapshot.clone()).await?;
        }
        Ok::<_, anyhow::Error>((result, awarded, snapshot.score, completed))
    });

    let joined = match handle.await {
        Ok(joined) => joined,
        Err(e) => {
            app.session.lock().await.abort_submission(&ticket);
            return Err(AppError(anyhow::anyhow!("task join error: {e}")));
        }
    };
    let (result, awarded, score, completed) = joined?;

    let kinds: Vec<_> = result.lines.iter().map(|l| classify_line(l)).collect();
    Ok(Json(serde_json::json!({
        "outcome": result.outcome,
        "lines": result.lines,
        "kinds": kinds,
        "awarded": awarded,
        "score": score,
        "completed": completed,
    })))
}

/// POST /api/levels/{id}/hint
pub async fn reveal_hint(
    State(app): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let hint = app.session.lock().await.reveal_hint(id)?;
    Ok(Json(serde_json::json!({
        "hint": hint,
        "penalty": HINT_PENALTY,
    })))
}

/// POST /api/levels/{id}/solution
pub async fn reveal_solution(
    State(app): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let solution = app.session.lock().await.reveal_solution(id)?;
    Ok(Json(serde_json::json!({
        "solution": solution,
        "penalty": SOLUTION_PENALTY,
    })))
}

/// POST /api/levels/{id}/reset: clear the console and reveals.
pub async fn reset_level(
    State(app): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.session.lock().await.reset_attempt(id)?;
    Ok(Json(serde_json::json!({ "reset": id })))
}

use axum::extract::State;
use axum::Json;
use owasp_core::GameState;

use crate::error::AppError;
use crate::state::AppState;

fn state_json(state: &GameState) -> serde_json::Value {
    serde_json::json!({
        "currentLevel": state.current_level,
        "completedLevels": state.completed_levels,
        "score": state.score,
        "completed": state.completed_count(),
        "total": owasp_core::catalog::TOTAL_LEVELS,
        "percent": state.progress_percent(),
    })
}

/// GET /api/state: score and progress.
pub async fn get_state(State(app): State<AppState>) -> Json<serde_json::Value> {
    let session = app.session.lock().await;
    Json(state_json(&session.state))
}

/// POST /api/state/reset: forget all progress and restart the active visit.
pub async fn reset_state(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let snapshot = {
        let mut session = app.session.lock().await;
        session.reset_progress()?;
        session.state.clone()
    };
    app.persist(snapshot.clone()).await?;
    tracing::info!("game state reset");
    Ok(Json(state_json(&snapshot)))
}

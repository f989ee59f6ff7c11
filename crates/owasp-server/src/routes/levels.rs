use axum::extract::{Path, State};
use axum::Json;
use owasp_core::catalog::{self, DYNAMIC_LEVEL_ID};
use owasp_core::Level;

use crate::error::AppError;
use crate::state::AppState;

/// Briefing for one level, as the level page renders it.
pub(crate) fn level_json(level: &Level, completed: bool) -> serde_json::Value {
    serde_json::json!({
        "id": level.id,
        "title": level.title,
        "vulnerability": level.vulnerability,
        "vulnerabilityClass": level.vulnerability_class().to_uppercase(),
        "tool": level.tool,
        "prompt": level.console_prompt(),
        "description": level.description,
        "completed": completed,
    })
}

/// GET /api/levels: catalog with completion marks.
pub async fn list_levels(State(app): State<AppState>) -> Json<serde_json::Value> {
    let session = app.session.lock().await;
    let mut list: Vec<serde_json::Value> = catalog::static_levels()
        .map(|l| {
            serde_json::json!({
                "id": l.id,
                "title": l.title,
                "tool": l.tool,
                "dynamic": false,
                "completed": session.state.is_completed(l.id),
            })
        })
        .collect();
    list.push(serde_json::json!({
        "id": DYNAMIC_LEVEL_ID,
        "title": "DYNAMIC CHALLENGE",
        "tool": serde_json::Value::Null,
        "dynamic": true,
        "completed": session.state.is_completed(DYNAMIC_LEVEL_ID),
    }));
    Json(serde_json::json!(list))
}

/// The dynamic level, authoring it on first use.
async fn cached_dynamic_level(app: &AppState) -> Level {
    if let Some(level) = app.dynamic_level.lock().await.clone() {
        return level;
    }
    let level = app.game.request_dynamic_level().await;
    app.dynamic_level
        .lock()
        .await
        .get_or_insert(level)
        .clone()
}

/// GET /api/levels/{id}: enter a level and return its briefing.
pub async fn get_level(
    State(app): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let level = if id == DYNAMIC_LEVEL_ID {
        cached_dynamic_level(&app).await
    } else {
        catalog::static_level(id).ok_or_else(|| AppError::not_found(id))?
    };

    let (body, snapshot) = {
        let mut session = app.session.lock().await;
        let body = level_json(&level, session.state.is_completed(level.id));
        session.enter_level(level);
        (body, session.state.clone())
    };
    app.persist(snapshot).await?;
    Ok(Json(body))
}

/// POST /api/levels/dynamic: author a new level 11.
///
/// If level 11 is the active level the visit restarts on the new definition;
/// a submission still in flight for it is a conflict.
pub async fn regenerate_dynamic_level(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let (level, origin) = app.game.author_dynamic_level().await;

    let (completed, refreshed) = {
        let mut session = app.session.lock().await;
        let refreshed = session.refresh_level(level.clone())?;
        *app.dynamic_level.lock().await = Some(level.clone());
        let snapshot = refreshed.then(|| session.state.clone());
        (session.state.is_completed(level.id), snapshot)
    };
    if let Some(snapshot) = refreshed {
        app.persist(snapshot).await?;
    }

    let mut body = level_json(&level, completed);
    body["origin"] = serde_json::json!(origin);
    Ok(Json(body))
}

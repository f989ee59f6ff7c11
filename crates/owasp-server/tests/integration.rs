use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use owasp_core::config::Config;
use owasp_core::{Game, GameState};
use tempfile::TempDir;
use textgen::{GenerationRequest, TextGenError, TextGenerator};
use tokio::sync::Notify;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test doubles
// ---------------------------------------------------------------------------

/// Replays canned replies; `None` (or running out) means unreachable.
struct Scripted(Mutex<VecDeque<Option<String>>>);

impl Scripted {
    fn new(replies: &[Option<&str>]) -> Self {
        Self(Mutex::new(
            replies.iter().map(|r| r.map(str::to_string)).collect(),
        ))
    }
}

#[async_trait]
impl TextGenerator for Scripted {
    async fn generate(&self, _request: &GenerationRequest) -> textgen::Result<String> {
        match self.0.lock().unwrap().pop_front() {
            Some(Some(text)) => Ok(text),
            _ => Err(TextGenError::Offline),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Answers from `script` in order; a `None` entry (or running out) holds the
/// request until released, so tests can observe the busy window.
struct Gated {
    script: Mutex<VecDeque<Option<String>>>,
    entered: Notify,
    release: Notify,
}

impl Gated {
    fn new(script: &[Option<&str>]) -> Self {
        Self {
            script: Mutex::new(script.iter().map(|r| r.map(str::to_string)).collect()),
            entered: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl TextGenerator for Gated {
    async fn generate(&self, _request: &GenerationRequest) -> textgen::Result<String> {
        let next = self.script.lock().unwrap().pop_front();
        if let Some(Some(reply)) = next {
            return Ok(reply);
        }
        self.entered.notify_one();
        self.release.notified().await;
        Ok("CORRECT".to_string())
    }

    fn name(&self) -> &str {
        "gated"
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn router(dir: &TempDir, generator: Arc<dyn TextGenerator>) -> axum::Router {
    let game = Game::new(generator, Config::default());
    owasp_server::build_router(dir.path().to_path_buf(), game, GameState::default())
}

fn offline_router(dir: &TempDir) -> axum::Router {
    router(dir, Arc::new(Scripted::new(&[])))
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a POST request with a JSON body via `oneshot` and return (status, parsed JSON body).
async fn post_json(
    app: axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn post(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    post_json(app, uri, serde_json::json!({})).await
}

async fn submit(app: axum::Router, id: u32, command: &str) -> (StatusCode, serde_json::Value) {
    post_json(
        app,
        &format!("/api/levels/{id}/commands"),
        serde_json::json!({ "command": command }),
    )
    .await
}

fn generated(title: &str, tool: &str) -> String {
    serde_json::json!({
        "title": title,
        "vulnerability": format!("{title} lets attackers in."),
        "tool": tool,
        "description": format!("Use {tool} against the weak endpoint."),
        "expectedCommand": format!("{tool} --go"),
    })
    .to_string()
}

const SQLI: &str = "sqlmap-lite --target=login.form --inject=username --dump-tables";

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_levels_includes_dynamic_slot() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(offline_router(&dir), "/api/levels").await;

    assert_eq!(status, StatusCode::OK);
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 11);
    assert_eq!(list[0]["tool"], "sqlmap-lite");
    assert_eq!(list[10]["id"], 11);
    assert_eq!(list[10]["dynamic"], true);
    assert!(list.iter().all(|l| l["completed"] == false));
}

#[tokio::test]
async fn get_level_returns_briefing_without_answer() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(offline_router(&dir), "/api/levels/2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["title"], "Cross-Site Scripting (XSS)");
    assert_eq!(json["vulnerabilityClass"], "XSS");
    assert_eq!(json["prompt"], "xss-probe> ");
    assert!(json.get("expectedCommand").is_none());
    assert!(json.get("hint").is_none());
}

#[tokio::test]
async fn entering_a_level_persists_current_level() {
    let dir = TempDir::new().unwrap();
    let (status, _) = get(offline_router(&dir), "/api/levels/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(GameState::load(dir.path()).unwrap().current_level, 4);
}

#[tokio::test]
async fn unknown_level_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(offline_router(&dir), "/api/levels/12").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("12"));
}

#[tokio::test]
async fn dynamic_level_falls_back_when_generator_is_down() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(offline_router(&dir), "/api/levels/11").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 11);
    assert_eq!(json["tool"], "rate-limit-bypass");
}

#[tokio::test]
async fn dynamic_level_is_generated_once_and_cached() {
    let dir = TempDir::new().unwrap();
    let reply = r#"Here: {"title":"XML External Entities","vulnerability":"XXE lets XML parsers read local files.","tool":"xxe-blaster","description":"Parsers resolving external entities leak files.","expectedCommand":"xxe-blaster --target=/upload --entity=file:///etc/passwd"}"#;
    let app = router(&dir, Arc::new(Scripted::new(&[Some(reply)])));

    let (_, first) = get(app.clone(), "/api/levels/11").await;
    let (_, second) = get(app.clone(), "/api/levels/11").await;
    assert_eq!(first["tool"], "xxe-blaster");
    assert_eq!(second["tool"], "xxe-blaster");
    assert_eq!(first["vulnerabilityClass"], "XXE");

    // The script is exhausted, so regeneration falls back.
    let (status, regenerated) = post(app, "/api/levels/dynamic").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(regenerated["tool"], "rate-limit-bypass");
    assert_eq!(regenerated["origin"], "fallback");
}

#[tokio::test]
async fn regenerating_the_active_dynamic_level_restarts_the_visit() {
    let dir = TempDir::new().unwrap();
    let first = generated("Level A", "tool-a");
    let second = generated("Level B", "tool-b");
    let app = router(
        &dir,
        Arc::new(Scripted::new(&[Some(first.as_str()), Some(second.as_str())])),
    );

    let (_, entered) = get(app.clone(), "/api/levels/11").await;
    assert_eq!(entered["tool"], "tool-a");
    post(app.clone(), "/api/levels/11/hint").await;

    let (status, regenerated) = post(app.clone(), "/api/levels/dynamic").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(regenerated["prompt"], "tool-b> ");
    assert_eq!(regenerated["origin"], "generated");

    // Judge is exhausted from here on, so the literal match decides.
    let (_, old) = submit(app.clone(), 11, "tool-a --go").await;
    assert_eq!(old["outcome"], false);
    let (_, new) = submit(app.clone(), 11, "tool-b --go").await;
    assert_eq!(new["outcome"], true);
    // The hint was revealed on the replaced visit.
    assert_eq!(new["score"], 100);
}

#[tokio::test]
async fn regenerating_during_a_pending_submission_conflicts() {
    let dir = TempDir::new().unwrap();
    let first = generated("Level A", "tool-a");
    let second = generated("Level B", "tool-b");
    let gate = Arc::new(Gated::new(&[
        Some(first.as_str()),
        None,
        Some(second.as_str()),
    ]));
    let app = router(&dir, gate.clone());
    get(app.clone(), "/api/levels/11").await;

    let pending = tokio::spawn(submit(app.clone(), 11, "tool-a --go"));
    gate.entered.notified().await;

    let (status, _) = post(app.clone(), "/api/levels/dynamic").await;
    assert_eq!(status, StatusCode::CONFLICT);

    gate.release.notify_one();
    let (_, json) = pending.await.unwrap();
    assert_eq!(json["outcome"], true);
    let (_, level) = get(app, "/api/levels/11").await;
    assert_eq!(level["tool"], "tool-a");
}

// ---------------------------------------------------------------------------
// Console
// ---------------------------------------------------------------------------

#[tokio::test]
async fn submit_requires_entering_the_level() {
    let dir = TempDir::new().unwrap();
    let (status, _) = submit(offline_router(&dir), 1, SQLI).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn offline_exact_command_completes_level_once() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);
    get(app.clone(), "/api/levels/1").await;

    let shouty = "  SQLMAP-LITE --target=login.form   --inject=username --dump-tables";
    let (status, json) = submit(app.clone(), 1, shouty).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], true);
    assert_eq!(json["score"], 100);
    assert_eq!(json["awarded"], 100);
    assert_eq!(json["lines"][2], "✓ EXPLOIT SUCCESSFUL!");
    assert_eq!(json["kinds"][2], "success");
    assert_eq!(GameState::load(dir.path()).unwrap().score, 100);

    // Solved in this visit.
    let (status, _) = submit(app.clone(), 1, SQLI).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    // Replaying after a reset does not score again.
    post(app.clone(), "/api/levels/1/reset").await;
    let (_, json) = submit(app.clone(), 1, SQLI).await;
    assert_eq!(json["outcome"], true);
    assert_eq!(json["awarded"], serde_json::Value::Null);
    assert_eq!(json["score"], 100);
}

#[tokio::test]
async fn wrong_command_gets_failure_shape() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);
    get(app.clone(), "/api/levels/3").await;

    let (status, json) = submit(app, 3, "csrf-forge --help").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], false);
    let lines = json["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "> csrf-forge --help");
    assert_eq!(lines[2], "Hint: Try the hint button for guidance");
    assert_eq!(json["score"], 0);
}

#[tokio::test]
async fn judge_verdict_wins_over_literal_match() {
    let dir = TempDir::new().unwrap();
    let app = router(&dir, Arc::new(Scripted::new(&[Some("INCORRECT")])));
    get(app.clone(), "/api/levels/1").await;
    let (_, json) = submit(app, 1, SQLI).await;
    assert_eq!(json["outcome"], false);
}

#[tokio::test]
async fn judge_accepts_paraphrase() {
    let dir = TempDir::new().unwrap();
    let app = router(&dir, Arc::new(Scripted::new(&[Some("correct\n")])));
    get(app.clone(), "/api/levels/1").await;
    let reordered = "sqlmap-lite --dump-tables --inject=username --target=login.form";
    let (_, json) = submit(app, 1, reordered).await;
    assert_eq!(json["outcome"], true);
}

#[tokio::test]
async fn empty_command_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);
    get(app.clone(), "/api/levels/1").await;
    let (status, _) = submit(app, 1, "   ").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn hint_and_solution_penalties_apply() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);
    get(app.clone(), "/api/levels/5").await;

    let (status, hint) = post(app.clone(), "/api/levels/5/hint").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hint["penalty"], 15);
    let (_, solution) = post(app.clone(), "/api/levels/5/solution").await;
    assert_eq!(solution["penalty"], 40);
    let command = solution["solution"].as_str().unwrap().to_string();

    let (_, json) = submit(app, 5, &command).await;
    assert_eq!(json["outcome"], true);
    assert_eq!(json["score"], 45);
}

#[tokio::test]
async fn concurrent_submission_is_rejected_while_busy() {
    let dir = TempDir::new().unwrap();
    let gate = Arc::new(Gated::new(&[]));
    let app = router(&dir, gate.clone());
    get(app.clone(), "/api/levels/1").await;

    let first = tokio::spawn(submit(app.clone(), 1, "sqlmap-lite --inject"));
    gate.entered.notified().await;

    let (status, _) = submit(app.clone(), 1, "sqlmap-lite --again").await;
    assert_eq!(status, StatusCode::CONFLICT);

    gate.release.notify_one();
    let (status, json) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["outcome"], true);
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[tokio::test]
async fn state_reports_progress_and_resets() {
    let dir = TempDir::new().unwrap();
    let app = offline_router(&dir);
    get(app.clone(), "/api/levels/1").await;
    submit(app.clone(), 1, SQLI).await;

    let (status, json) = get(app.clone(), "/api/state").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 100);
    assert_eq!(json["completedLevels"], serde_json::json!([1]));
    assert_eq!(json["total"], 11);
    assert_eq!(json["percent"], 9);

    let (status, json) = post(app.clone(), "/api/state/reset").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["score"], 0);
    assert_eq!(GameState::load(dir.path()).unwrap(), GameState::default());

    // The solved visit is open again and scores afresh.
    let (status, json) = submit(app, 1, SQLI).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["awarded"], 100);
}

pub mod error;
pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use owasp_core::{Game, GameState};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf, game: Game, state: GameState) -> Router {
    let app_state = state::AppState::new(root, game, state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Levels
        .route("/api/levels", get(routes::levels::list_levels))
        .route(
            "/api/levels/dynamic",
            post(routes::levels::regenerate_dynamic_level),
        )
        .route("/api/levels/{id}", get(routes::levels::get_level))
        // Console
        .route(
            "/api/levels/{id}/commands",
            post(routes::console::submit_command),
        )
        .route("/api/levels/{id}/hint", post(routes::console::reveal_hint))
        .route(
            "/api/levels/{id}/solution",
            post(routes::console::reveal_solution),
        )
        .route("/api/levels/{id}/reset", post(routes::console::reset_level))
        // Progress
        .route("/api/state", get(routes::state::get_state))
        .route("/api/state/reset", post(routes::state::reset_state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the game server on a pre-bound listener.
///
/// Accepts a `TcpListener` that was already bound so the caller can read the
/// actual port before starting (useful when `port = 0` and the OS picks a
/// free port).
pub async fn serve_on(
    root: PathBuf,
    game: Game,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let state = GameState::load(&root)?;
    tracing::info!(
        backend = game.backend(),
        score = state.score,
        "loaded game state from {}",
        root.display()
    );
    let app = build_router(root, game, state);

    tracing::info!("OWASP terminal listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/api/levels");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// Bind `0.0.0.0:{port}` and serve.
pub async fn serve(root: PathBuf, game: Game, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    serve_on(root, game, listener, open_browser).await
}

use std::path::PathBuf;
use std::sync::Arc;

use owasp_core::{Game, GameState, Level, Session};
use tokio::sync::Mutex;

/// Shared application state passed to all route handlers.
///
/// The server hosts one player session. Locks are held only for the
/// synchronous bookkeeping around a request, never across a call to the
/// text-generation service.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub game: Game,
    pub session: Arc<Mutex<Session>>,
    /// Level 11 as last authored; regenerated on demand.
    pub dynamic_level: Arc<Mutex<Option<Level>>>,
}

impl AppState {
    pub fn new(root: PathBuf, game: Game, state: GameState) -> Self {
        Self {
            root,
            game,
            session: Arc::new(Mutex::new(Session::new(state))),
            dynamic_level: Arc::new(Mutex::new(None)),
        }
    }

    /// Write `state` to `<root>/state.json` off the async runtime.
    pub async fn persist(&self, state: GameState) -> anyhow::Result<()> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || state.save(&root))
            .await
            .map_err(|e| anyhow::anyhow!("task join error: {e}"))??;
        Ok(())
    }
}

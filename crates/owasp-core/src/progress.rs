use crate::catalog::TOTAL_LEVELS;
use crate::error::Result;
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::warn;

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

pub const COMPLETION_POINTS: i64 = 100;
pub const HINT_PENALTY: i64 = 15;
pub const SOLUTION_PENALTY: i64 = 40;

/// Net score change for completing a level.
pub fn completion_delta(used_hint: bool, used_solution: bool) -> i64 {
    let mut delta = COMPLETION_POINTS;
    if used_hint {
        delta -= HINT_PENALTY;
    }
    if used_solution {
        delta -= SOLUTION_PENALTY;
    }
    delta
}

// ---------------------------------------------------------------------------
// GameState
// ---------------------------------------------------------------------------

/// Persisted progress. Field names on the wire are camelCase so the record
/// stays interchangeable with browser front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub current_level: u32,
    pub completed_levels: BTreeSet<u32>,
    /// May go negative; there is no floor.
    pub score: i64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_level: 1,
            completed_levels: BTreeSet::new(),
            score: 0,
        }
    }
}

impl GameState {
    pub fn is_completed(&self, level_id: u32) -> bool {
        self.completed_levels.contains(&level_id)
    }

    pub fn completed_count(&self) -> usize {
        self.completed_levels.len()
    }

    /// Completed share of all levels, rounded to a whole percent.
    pub fn progress_percent(&self) -> u32 {
        let pct = self.completed_count() as f64 / TOTAL_LEVELS as f64 * 100.0;
        pct.round() as u32
    }

    /// Record completion of `level_id`. Returns the points awarded, or
    /// `None` if the level was already completed (state unchanged).
    pub fn record_completion(
        &mut self,
        level_id: u32,
        used_hint: bool,
        used_solution: bool,
    ) -> Option<i64> {
        if !self.completed_levels.insert(level_id) {
            return None;
        }
        let delta = completion_delta(used_hint, used_solution);
        self.score += delta;
        Some(delta)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Parse a persisted record. Anything unreadable yields the zero state.
    pub fn from_json(data: &str) -> Self {
        serde_json::from_str(data).unwrap_or_else(|e| {
            warn!(error = %e, "saved game state is corrupt; starting fresh");
            Self::default()
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Load from `<root>/state.json`. A missing or corrupt file yields the
    /// zero state; only I/O failures other than "not found" are errors.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::state_path(root);
        match std::fs::read_to_string(&path) {
            Ok(data) => Ok(Self::from_json(&data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = self.to_json()?;
        io::atomic_write(&paths::state_path(root), data.as_bytes())
    }
}

/// Functional form of [`GameState::record_completion`].
pub fn apply_completion(
    state: &GameState,
    level_id: u32,
    used_hint: bool,
    used_solution: bool,
) -> GameState {
    let mut next = state.clone();
    next.record_completion(level_id, used_hint, used_solution);
    next
}

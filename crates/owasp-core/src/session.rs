use serde::Serialize;
use tracing::{debug, info};

use crate::error::{GameError, Result};
use crate::game::SubmissionResult;
use crate::level::Level;
use crate::progress::GameState;

// ---------------------------------------------------------------------------
// Visit
// ---------------------------------------------------------------------------

/// Ephemeral state for one visit to one level. Never persisted; replaced
/// whenever the active level changes.
#[derive(Debug, Clone, Serialize)]
pub struct Visit {
    pub level: Level,
    pub console: Vec<String>,
    pub hint_revealed: bool,
    pub solution_revealed: bool,
    pub completed: bool,
    /// A command for this level is out for validation.
    pub busy: bool,
    /// Distinguishes repeat visits to the same level.
    #[serde(skip)]
    number: u64,
}

impl Visit {
    fn new(level: Level, number: u64) -> Self {
        Self {
            number,
            level,
            console: Vec::new(),
            hint_revealed: false,
            solution_revealed: false,
            completed: false,
            busy: false,
        }
    }
}

/// A claimed submission slot. Its result only lands on the visit that
/// issued it.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub level: Level,
    visit: u64,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Everything one player session owns: the persisted [`GameState`] and the
/// current level visit. Callers persist `state` after any method that
/// reports a change.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub state: GameState,
    visit: Option<Visit>,
    visits: u64,
}

impl Session {
    pub fn new(state: GameState) -> Self {
        Self {
            state,
            visit: None,
            visits: 0,
        }
    }

    pub fn visit(&self) -> Option<&Visit> {
        self.visit.as_ref()
    }

    pub fn active_level(&self) -> Option<&Level> {
        self.visit.as_ref().map(|v| &v.level)
    }

    /// Start a fresh visit to `level` and record it as the current level.
    pub fn enter_level(&mut self, level: Level) {
        self.state.current_level = level.id;
        self.start_visit(level);
    }

    fn start_visit(&mut self, level: Level) {
        self.visits += 1;
        self.visit = Some(Visit::new(level, self.visits));
    }

    /// Swap in a new definition for the active level if `level` has its id,
    /// starting a fresh visit. Returns whether the active visit was replaced.
    pub fn refresh_level(&mut self, level: Level) -> Result<bool> {
        let active = self.visit.as_ref().filter(|v| v.level.id == level.id);
        match active.map(|v| v.busy) {
            Some(true) => Err(GameError::Busy(level.id)),
            Some(false) => {
                self.enter_level(level);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Forget all progress and restart the active visit, if any.
    pub fn reset_progress(&mut self) -> Result<()> {
        if let Some(visit) = self.visit.clone() {
            if visit.busy {
                return Err(GameError::Busy(visit.level.id));
            }
            self.start_visit(visit.level);
        }
        self.state = GameState::default();
        Ok(())
    }

    fn visit_mut(&mut self, level_id: u32) -> Result<&mut Visit> {
        let visit = self.visit.as_mut().ok_or(GameError::NoActiveLevel)?;
        if visit.level.id != level_id {
            return Err(GameError::LevelMismatch {
                expected: visit.level.id,
                got: level_id,
            });
        }
        Ok(visit)
    }

    /// Reveal the hint, charging the hint penalty on completion.
    pub fn reveal_hint(&mut self, level_id: u32) -> Result<String> {
        let visit = self.visit_mut(level_id)?;
        if visit.completed {
            return Err(GameError::AlreadySolved(level_id));
        }
        visit.hint_revealed = true;
        Ok(visit.level.hint.clone())
    }

    /// Reveal the expected command, charging the solution penalty on
    /// completion.
    pub fn reveal_solution(&mut self, level_id: u32) -> Result<String> {
        let visit = self.visit_mut(level_id)?;
        if visit.completed {
            return Err(GameError::AlreadySolved(level_id));
        }
        visit.solution_revealed = true;
        Ok(visit.level.expected_command.clone())
    }

    /// Clear console, reveals and completion for the active level.
    pub fn reset_attempt(&mut self, level_id: u32) -> Result<()> {
        let visit = self.visit_mut(level_id)?;
        if visit.busy {
            return Err(GameError::Busy(level_id));
        }
        let level = visit.level.clone();
        self.start_visit(level);
        Ok(())
    }

    /// Claim the single submission slot for `level_id`. The ticket carries
    /// the level to validate against.
    pub fn begin_submission(&mut self, level_id: u32, command: &str) -> Result<Ticket> {
        let visit = self.visit_mut(level_id)?;
        if visit.busy {
            return Err(GameError::Busy(level_id));
        }
        if visit.completed {
            return Err(GameError::AlreadySolved(level_id));
        }
        if command.trim().is_empty() {
            return Err(GameError::EmptyCommand);
        }
        visit.busy = true;
        Ok(Ticket {
            level: visit.level.clone(),
            visit: visit.number,
        })
    }

    /// The visit that issued `ticket`, if it is still the active one.
    fn ticket_visit(&mut self, ticket: &Ticket) -> Option<&mut Visit> {
        self.visit.as_mut().filter(|v| v.number == ticket.visit)
    }

    /// Release the submission slot without output.
    pub fn abort_submission(&mut self, ticket: &Ticket) {
        if let Some(visit) = self.ticket_visit(ticket) {
            visit.busy = false;
        }
    }

    /// Apply a validation result to the visit and, on success, to the game
    /// state. Returns the points awarded, if any.
    ///
    /// A result for a visit that has since been left, even for a later visit
    /// to the same level, is discarded.
    pub fn finish_submission(
        &mut self,
        ticket: &Ticket,
        result: &SubmissionResult,
    ) -> Option<i64> {
        let level_id = ticket.level.id;
        let Some(visit) = self.ticket_visit(ticket) else {
            debug!(level = level_id, "discarding result for a visit that has ended");
            return None;
        };
        visit.busy = false;
        visit.console.extend(result.lines.iter().cloned());
        if !result.outcome {
            return None;
        }
        visit.completed = true;
        let (hint, solution) = (visit.hint_revealed, visit.solution_revealed);
        let awarded = self.state.record_completion(level_id, hint, solution);
        if let Some(points) = awarded {
            info!(level = level_id, points, score = self.state.score, "level completed");
        }
        awarded
    }
}

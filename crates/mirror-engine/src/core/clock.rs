use log::info;
use serde::Serialize;

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    Playing,
    Ended,
}

/// Score and timing snapshot for one session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GameState {
    pub elapsed_ms: f64,
    pub total_score: u32,
    pub phase: GamePhase,
    pub final_score: u32,
}

impl GameState {
    pub const fn fresh() -> Self {
        Self {
            elapsed_ms: 0.0,
            total_score: 0,
            phase: GamePhase::Playing,
            final_score: 0,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::fresh()
    }
}

/// Wall-clock game timer driving the Playing → Ended transition.
///
/// Time is measured from the first `tick` after construction or restart,
/// so a session does not lose time to detector warm-up.
pub struct GameClock {
    duration_ms: f64,
    started_at_ms: Option<f64>,
    state: GameState,
}

impl GameClock {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms: duration_ms as f64,
            started_at_ms: None,
            state: GameState::fresh(),
        }
    }

    /// Advance to `now_ms`. Returns true only on the frame the game ends.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let start = *self.started_at_ms.get_or_insert(now_ms);
        // Host timestamps can jitter backwards; elapsed never shrinks.
        self.state.elapsed_ms = self.state.elapsed_ms.max(now_ms - start);

        if self.state.is_playing() && self.state.elapsed_ms >= self.duration_ms {
            self.state.phase = GamePhase::Ended;
            self.state.final_score = self.state.total_score;
            info!("game ended, final score {}", self.state.final_score);
            return true;
        }
        false
    }

    /// Credit points. Ignored once the game has ended.
    pub fn add_score(&mut self, points: u32) -> bool {
        if !self.state.is_playing() || points == 0 {
            return false;
        }
        self.state.total_score += points;
        true
    }

    /// Back to a fresh Playing state; the timer restarts at `now_ms`.
    pub fn restart(&mut self, now_ms: f64) {
        self.state = GameState::fresh();
        self.started_at_ms = Some(now_ms);
    }

    /// Seconds left, clamped at zero.
    pub fn remaining_secs(&self) -> f64 {
        ((self.duration_ms - self.state.elapsed_ms) / 1000.0).max(0.0)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }
}

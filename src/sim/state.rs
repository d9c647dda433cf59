//! Game state and core simulation types
//!
//! Everything the tick mutates is owned by `GameState`. The presentation
//! layer only ever sees a `Snapshot`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacles::ObstacleStream;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Idle title screen, body hovers
    Start,
    /// Simulation running
    Playing,
    /// Crashed into a pipe or left the playfield
    GameOver,
    /// Reached the win score
    Won,
}

impl GamePhase {
    /// GameOver and Won freeze the simulation until an explicit restart
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Won)
    }

    /// Whether the score HUD is shown
    pub fn shows_score(self) -> bool {
        self != GamePhase::Start
    }
}

/// Logical size of the drawable area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Fixed horizontal column the body lives in
    #[inline]
    pub fn body_x(&self) -> f32 {
        self.width / BODY_COLUMN_DIVISOR
    }

    /// Height the body is placed at when a session (re)starts
    #[inline]
    pub fn start_height(&self) -> f32 {
        self.height / START_HEIGHT_DIVISOR
    }

    /// Centre of the idle hover on the title screen
    #[inline]
    pub fn idle_center(&self) -> f32 {
        self.height / 2.0
    }
}

/// The player-controlled falling object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallingBody {
    /// Pixels from the top of the playfield (centre of the body)
    pub y: f32,
    /// Pixels per tick, negative is upward
    pub velocity: f32,
}

/// A pipe pair with a passable gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge
    pub x: f32,
    /// Top edge of the gap (bottom of the upper pipe)
    pub gap_top: f32,
    /// Set once the body has cleared this obstacle and it has been scored
    pub passed: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32) -> Self {
        Self {
            x,
            gap_top,
            passed: false,
        }
    }

    /// Trailing (right) edge
    #[inline]
    pub fn right(&self, width: f32) -> f32 {
        self.x + width
    }

    /// Bottom edge of the gap (top of the lower pipe)
    #[inline]
    pub fn gap_bottom(&self, gap: f32) -> f32 {
        self.gap_top + gap
    }
}

/// Things that happened during the last tick, for audio cues and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// START -> PLAYING
    SessionStarted,
    /// Impulse applied
    Flap,
    /// New obstacle appended at the right edge
    ObstacleSpawned,
    /// An obstacle was passed
    Scored { score: u32 },
    /// PLAYING -> GAME_OVER
    Crashed { score: u32 },
    /// PLAYING -> WON
    Won { score: u32 },
    /// GAME_OVER/WON -> START
    Reset,
}

/// Read-only view handed to the presentation layer each frame
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub score: u32,
    pub body: FallingBody,
    pub body_x: f32,
    pub playfield: Playfield,
    pub pipe_width: f32,
    pub pipe_gap: f32,
    pub obstacles: &'a [Obstacle],
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the gap RNG was created from
    pub seed: u64,
    /// Gameplay constants in effect
    pub tuning: Tuning,
    /// Current drawable size
    pub playfield: Playfield,
    /// Current phase
    pub phase: GamePhase,
    /// The falling body
    pub body: FallingBody,
    /// Obstacles in spawn order
    pub obstacles: ObstacleStream,
    /// Obstacles passed this session
    pub score: u32,
    /// Playing ticks since the session started
    pub time_ticks: u64,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
    rng: Pcg32,
}

impl GameState {
    /// Create a state in the START phase
    pub fn new(seed: u64, playfield: Playfield, tuning: Tuning) -> Self {
        Self {
            seed,
            playfield,
            phase: GamePhase::Start,
            body: FallingBody {
                y: playfield.idle_center(),
                velocity: tuning.initial_velocity,
            },
            obstacles: ObstacleStream::new(),
            score: 0,
            time_ticks: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Clear score, obstacles, tick counter and put the body back at the start height
    pub fn reset_session(&mut self) {
        self.score = 0;
        self.time_ticks = 0;
        self.obstacles.clear();
        self.body.reset(self.playfield.start_height(), self.tuning.initial_velocity);
    }

    /// Apply a new drawable size. Never touches score or obstacles.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.playfield = Playfield::new(width, height);
        if self.phase == GamePhase::Start {
            self.body.y = self.playfield.idle_center();
        }
    }

    /// Split borrow used by the tick to spawn with the session RNG
    pub(crate) fn obstacles_and_rng(&mut self) -> (&mut ObstacleStream, &mut Pcg32) {
        (&mut self.obstacles, &mut self.rng)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            score: self.score,
            body: self.body,
            body_x: self.playfield.body_x(),
            playfield: self.playfield,
            pipe_width: self.tuning.pipe_width,
            pipe_gap: self.tuning.pipe_gap,
            obstacles: self.obstacles.as_slice(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Playfield {
        Playfield::new(440.0, 900.0)
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = GameState::new(7, field(), Tuning::default());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.body.y, 450.0);
        assert_eq!(state.body.velocity, 0.0);
    }

    #[test]
    fn test_reset_session_clears_everything() {
        let mut state = GameState::new(7, field(), Tuning::default());
        state.score = 4;
        state.time_ticks = 900;
        state.obstacles.push(Obstacle::new(100.0, 200.0));
        state.body.velocity = 3.3;
        state.body.y = 12.0;

        state.reset_session();

        assert_eq!(state.score, 0);
        assert_eq!(state.time_ticks, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.body.velocity, 0.0);
        assert_eq!(state.body.y, 300.0);
    }

    #[test]
    fn test_resize_keeps_session_while_playing() {
        let mut state = GameState::new(7, field(), Tuning::default());
        state.phase = GamePhase::Playing;
        state.score = 2;
        state.obstacles.push(Obstacle::new(100.0, 200.0));
        state.body.y = 123.0;

        state.resize(300.0, 600.0);

        assert_eq!(state.playfield, Playfield::new(300.0, 600.0));
        assert_eq!(state.score, 2);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.body.y, 123.0);
    }

    #[test]
    fn test_resize_recentres_idle_body() {
        let mut state = GameState::new(7, field(), Tuning::default());
        state.resize(300.0, 600.0);
        assert_eq!(state.body.y, 300.0);
    }

    #[test]
    fn test_phase_helpers() {
        assert!(!GamePhase::Start.is_terminal());
        assert!(!GamePhase::Playing.is_terminal());
        assert!(GamePhase::GameOver.is_terminal());
        assert!(GamePhase::Won.is_terminal());
        assert!(!GamePhase::Start.shows_score());
        assert!(GamePhase::Won.shows_score());
    }
}

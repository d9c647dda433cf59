//! Vole - a single-screen falling-can arcade game
//!
//! Core modules:
//! - `sim`: Simulation (physics, obstacle stream, collisions, game phases)
//! - `tuning`: Adjustable gameplay constants
//! - `input`: Coalescing action queue between input callbacks and the tick
//! - `renderer`: WebGPU draw step
//! - `assets` / `audio`: Image and music collaborators (never block the sim)

pub mod assets;
pub mod audio;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use input::ActionQueue;
pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Fixed geometry that is not part of the tunable surface
pub mod consts {
    /// Side of the body's square hitbox
    pub const BODY_SIZE: f32 = 34.0;
    /// Sprite draw size (slightly larger than the hitbox)
    pub const BODY_DRAW_SIZE: f32 = 40.0;
    /// Radius of the fallback circle when no sprite is available
    pub const BODY_FALLBACK_RADIUS: f32 = 20.0;
    /// Body column is at `width / BODY_COLUMN_DIVISOR`
    pub const BODY_COLUMN_DIVISOR: f32 = 3.0;
    /// Sessions start with the body at `height / START_HEIGHT_DIVISOR`
    pub const START_HEIGHT_DIVISOR: f32 = 3.0;

    /// Minimum height of the top pipe stub (and bottom stub)
    pub const MIN_GAP_TOP: f32 = 100.0;
    /// Obstacles whose right edge falls to this x are discarded
    pub const PRUNE_MARGIN: f32 = -10.0;

    /// Idle hover amplitude in START (pixels)
    pub const IDLE_AMPLITUDE: f32 = 10.0;
    /// Idle hover time divisor (ms per radian)
    pub const IDLE_PERIOD_MS: f64 = 300.0;

    /// Maximum tilt of the drawn body (radians)
    pub const MAX_TILT: f32 = std::f32::consts::FRAC_PI_4;
    /// Tilt per unit of vertical velocity
    pub const TILT_PER_VELOCITY: f32 = 0.1;
}

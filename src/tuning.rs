//! Gameplay tuning
//!
//! Every physics and obstacle constant the simulation reads lives here so a
//! build can ship different balance without touching logic. Values default to
//! the shipped balance and may be overridden from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Adjustable gameplay constants (units are pixels and ticks)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Added to vertical velocity every playing tick
    pub gravity: f32,
    /// Velocity set by an activate impulse (negative = upward)
    pub lift: f32,
    /// Velocity after a reset
    pub initial_velocity: f32,
    /// Score that ends the session as won
    pub win_score: u32,
    /// Horizontal obstacle speed per tick
    pub pipe_speed: f32,
    /// Ticks between obstacle spawns
    pub pipe_spawn_rate: u64,
    /// Height of the passable gap
    pub pipe_gap: f32,
    /// Obstacle width
    pub pipe_width: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.12,
            lift: -4.0,
            initial_velocity: 0.0,
            win_score: 6,
            pipe_speed: 2.5,
            pipe_spawn_rate: 180,
            pipe_gap: 220.0,
            pipe_width: 60.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would stall or break the obstacle stream
    pub fn validate(&self) -> Result<(), TuningError> {
        let floats = [
            ("gravity", self.gravity),
            ("lift", self.lift),
            ("initial_velocity", self.initial_velocity),
            ("pipe_speed", self.pipe_speed),
            ("pipe_gap", self.pipe_gap),
            ("pipe_width", self.pipe_width),
        ];
        for (field, value) in floats {
            if !value.is_finite() {
                return Err(TuningError::Invalid {
                    field,
                    reason: "must be finite",
                });
            }
        }

        if self.pipe_spawn_rate == 0 {
            return Err(TuningError::Invalid {
                field: "pipe_spawn_rate",
                reason: "must be at least one tick",
            });
        }
        if self.win_score == 0 {
            return Err(TuningError::Invalid {
                field: "win_score",
                reason: "must be positive",
            });
        }
        if self.pipe_speed <= 0.0 {
            return Err(TuningError::Invalid {
                field: "pipe_speed",
                reason: "must be positive",
            });
        }
        if self.pipe_width <= 0.0 {
            return Err(TuningError::Invalid {
                field: "pipe_width",
                reason: "must be positive",
            });
        }
        if self.pipe_gap <= 0.0 {
            return Err(TuningError::Invalid {
                field: "pipe_gap",
                reason: "must be positive",
            });
        }
        Ok(())
    }
}

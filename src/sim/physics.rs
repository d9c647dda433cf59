//! Vertical motion of the falling body
//!
//! Units are pixels and ticks. Gravity accumulates into velocity, velocity
//! into position, in that order. There is no clamping here: leaving the
//! playfield is detected by the collision pass.

use super::state::FallingBody;
use crate::consts::{IDLE_AMPLITUDE, IDLE_PERIOD_MS, MAX_TILT, TILT_PER_VELOCITY};

impl FallingBody {
    pub fn new(y: f32, velocity: f32) -> Self {
        Self { y, velocity }
    }

    /// `velocity += gravity`
    #[inline]
    pub fn apply_gravity(&mut self, gravity: f32) {
        self.velocity += gravity;
    }

    /// `y += velocity`
    #[inline]
    pub fn integrate(&mut self) {
        self.y += self.velocity;
    }

    /// Override (not add to) the current velocity
    #[inline]
    pub fn apply_impulse(&mut self, lift: f32) {
        self.velocity = lift;
    }

    /// One playing tick: gravity, optional impulse, then integration
    pub fn step(&mut self, gravity: f32, impulse: Option<f32>) {
        self.apply_gravity(gravity);
        if let Some(lift) = impulse {
            self.apply_impulse(lift);
        }
        self.integrate();
    }

    pub fn reset(&mut self, y: f32, velocity: f32) {
        self.y = y;
        self.velocity = velocity;
    }

    /// Title-screen hover. Only writes the position; velocity is untouched.
    pub fn idle_hover(&mut self, center: f32, time_ms: f64) {
        self.y = center + idle_offset(time_ms);
    }

    /// Draw rotation in radians, nose-down when falling
    pub fn tilt(&self) -> f32 {
        (self.velocity * TILT_PER_VELOCITY).clamp(-MAX_TILT, MAX_TILT)
    }
}

/// Cosmetic hover offset as a pure function of wall-clock milliseconds
pub fn idle_offset(time_ms: f64) -> f32 {
    ((time_ms / IDLE_PERIOD_MS).sin() as f32) * IDLE_AMPLITUDE
}

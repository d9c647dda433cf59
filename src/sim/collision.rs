//! Collision and scoring for the falling body
//!
//! The body is an axis-aligned square centred on its position. Every
//! comparison here is strict: touching a pipe or the playfield edge exactly
//! is not a hit, and the body must be strictly past an obstacle to score it.

use super::obstacles::ObstacleStream;
use super::state::{FallingBody, Obstacle, Playfield};
use crate::consts::BODY_SIZE;

/// Axis-aligned bounding box in playfield pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Aabb {
    /// Square of side `size` centred on `(x, y)`
    pub fn centered(x: f32, y: f32, size: f32) -> Self {
        let half = size / 2.0;
        Self {
            left: x - half,
            right: x + half,
            top: y - half,
            bottom: y + half,
        }
    }

    /// Strict horizontal overlap with the span `[left, right]`
    #[inline]
    pub fn overlaps_x(&self, left: f32, right: f32) -> bool {
        self.right > left && self.left < right
    }
}

/// Hitbox of the body in its fixed column
pub fn body_aabb(body: &FallingBody, playfield: &Playfield) -> Aabb {
    Aabb::centered(playfield.body_x(), body.y, BODY_SIZE)
}

/// True if the box intersects the blocked part of an obstacle
pub fn hits_obstacle(aabb: &Aabb, obstacle: &Obstacle, pipe_width: f32, pipe_gap: f32) -> bool {
    if !aabb.overlaps_x(obstacle.x, obstacle.right(pipe_width)) {
        return false;
    }
    aabb.top < obstacle.gap_top || aabb.bottom > obstacle.gap_bottom(pipe_gap)
}

/// True if the box has crossed the floor or the ceiling
pub fn out_of_bounds(aabb: &Aabb, playfield: &Playfield) -> bool {
    aabb.bottom > playfield.height || aabb.top < 0.0
}

/// Outcome of one evaluation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Some obstacle's blocked region was hit
    pub hit_obstacle: bool,
    /// The body left the playfield vertically
    pub out_of_bounds: bool,
    /// Obstacles newly passed (and now marked) this tick
    pub newly_passed: u32,
}

impl Evaluation {
    /// Either failure condition
    pub fn crashed(&self) -> bool {
        self.hit_obstacle || self.out_of_bounds
    }
}

/// Test the body against every obstacle and the playfield edges, marking
/// obstacles the body has cleared. Every obstacle is visited even after a hit
/// so pass marks stay consistent.
pub fn evaluate(
    aabb: &Aabb,
    obstacles: &mut ObstacleStream,
    playfield: &Playfield,
    pipe_width: f32,
    pipe_gap: f32,
) -> Evaluation {
    let mut eval = Evaluation::default();

    for obstacle in obstacles.iter_mut() {
        if hits_obstacle(aabb, obstacle, pipe_width, pipe_gap) {
            eval.hit_obstacle = true;
        }

        if !obstacle.passed && aabb.left > obstacle.right(pipe_width) {
            obstacle.passed = true;
            eval.newly_passed += 1;
        }
    }

    eval.out_of_bounds = out_of_bounds(aabb, playfield);
    eval
}

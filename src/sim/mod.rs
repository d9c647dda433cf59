//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module renders, plays
//! audio or touches the platform:
//! - One step per display tick, units are pixels and ticks
//! - Seeded RNG only (gap heights)
//! - Obstacles kept in spawn order

pub mod collision;
pub mod obstacles;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Evaluation, body_aabb, evaluate, hits_obstacle, out_of_bounds};
pub use obstacles::{ObstacleStream, gap_top_range, random_gap_top};
pub use physics::idle_offset;
pub use state::{FallingBody, GameEvent, GamePhase, GameState, Obstacle, Playfield, Snapshot};
pub use tick::{TickInput, tick};

//! Scene assembly: snapshot in, vertex list out

use glam::Vec2;

use super::shapes::{circle, rect};
use super::vertex::Vertex;
use crate::consts::BODY_FALLBACK_RADIUS;
use crate::settings::Settings;
use crate::sim::Snapshot;

const BODY_SEGMENTS: u32 = 24;

/// Build the frame's vertices. Pipes are always primitives; the body is only
/// drawn here when no sprite is available.
pub fn build_scene(snapshot: &Snapshot<'_>, settings: &Settings, sprite_ready: bool) -> Vec<Vertex> {
    let height = snapshot.playfield.height;
    let mut vertices = Vec::with_capacity(snapshot.obstacles.len() * 12 + BODY_SEGMENTS as usize * 3);

    for obstacle in snapshot.obstacles {
        // Upper pipe
        vertices.extend(rect(
            obstacle.x,
            0.0,
            snapshot.pipe_width,
            obstacle.gap_top,
            settings.pipe_color,
        ));
        // Lower pipe
        let gap_bottom = obstacle.gap_bottom(snapshot.pipe_gap);
        vertices.extend(rect(
            obstacle.x,
            gap_bottom,
            snapshot.pipe_width,
            height - gap_bottom,
            settings.pipe_color,
        ));
    }

    if !sprite_ready {
        vertices.extend(circle(
            Vec2::new(snapshot.body_x, snapshot.body.y),
            BODY_FALLBACK_RADIUS,
            settings.body_color,
            BODY_SEGMENTS,
        ));
    }

    vertices
}

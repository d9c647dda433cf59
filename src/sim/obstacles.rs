//! Obstacle stream: spawn at the right edge, scroll left, discard off-screen
//!
//! All obstacles move at the same speed, so spawn order is also left-to-right
//! order and the collection never needs sorting.

use rand::Rng;

use super::state::{Obstacle, Playfield};
use crate::consts::{MIN_GAP_TOP, PRUNE_MARGIN};
use crate::tuning::Tuning;

/// Inclusive range the gap top is drawn from.
///
/// Normally `[MIN_GAP_TOP, height - gap - MIN_GAP_TOP]`. When the playfield
/// is too short for that, the range collapses to a single value: the gap
/// centred vertically, never above the top edge.
pub fn gap_top_range(height: f32, gap: f32) -> (f32, f32) {
    let lo = MIN_GAP_TOP;
    let hi = height - gap - MIN_GAP_TOP;
    if hi >= lo {
        (lo, hi)
    } else {
        let center = ((height - gap) / 2.0).max(0.0);
        (center, center)
    }
}

/// Uniform whole-pixel gap top within `gap_top_range`
pub fn random_gap_top<R: Rng + ?Sized>(rng: &mut R, height: f32, gap: f32) -> f32 {
    let (lo, hi) = gap_top_range(height, gap);
    let steps = (hi - lo).floor() as u32;
    if steps == 0 {
        return lo;
    }
    lo + rng.random_range(0..=steps) as f32
}

/// Ordered collection of live obstacles
#[derive(Debug, Clone, Default)]
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
}

impl ObstacleStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new obstacle at the right edge every `pipe_spawn_rate` ticks.
    /// Returns true if one was spawned. A rate of zero spawns every tick.
    pub fn spawn_if_due<R: Rng + ?Sized>(
        &mut self,
        tick: u64,
        playfield: &Playfield,
        tuning: &Tuning,
        rng: &mut R,
    ) -> bool {
        let rate = tuning.pipe_spawn_rate.max(1);
        if tick == 0 || tick % rate != 0 {
            return false;
        }
        let gap_top = random_gap_top(rng, playfield.height, tuning.pipe_gap);
        self.obstacles.push(Obstacle::new(playfield.width, gap_top));
        log::debug!("Obstacle spawned at tick {} (gap top {})", tick, gap_top);
        true
    }

    /// Scroll every obstacle left by `speed`
    pub fn advance(&mut self, speed: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= speed;
        }
    }

    /// Drop obstacles whose right edge has left the playfield past the margin
    pub fn prune(&mut self, pipe_width: f32) {
        self.obstacles
            .retain(|o| o.right(pipe_width) > PRUNE_MARGIN);
    }

    pub fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Obstacle> {
        self.obstacles.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_gap_range_normal() {
        assert_eq!(gap_top_range(956.0, 220.0), (100.0, 636.0));
    }

    #[test]
    fn test_gap_range_degenerate_collapses() {
        // 300 - 220 - 100 < 100
        assert_eq!(gap_top_range(300.0, 220.0), (40.0, 40.0));
        // Smaller than the gap itself
        assert_eq!(gap_top_range(0.0, 220.0), (0.0, 0.0));
        assert_eq!(gap_top_range(-5.0, 220.0), (0.0, 0.0));
    }

    #[test]
    fn test_random_gap_top_degenerate_does_not_panic() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(random_gap_top(&mut rng, 0.0, 220.0), 0.0);
        assert_eq!(random_gap_top(&mut rng, 420.0, 220.0), 100.0);
    }

    #[test]
    fn test_spawn_cadence() {
        let mut rng = Pcg32::seed_from_u64(3);
        let field = Playfield::new(440.0, 900.0);
        let tuning = Tuning::default();
        let mut stream = ObstacleStream::new();

        for tick in 1..=540 {
            let spawned = stream.spawn_if_due(tick, &field, &tuning, &mut rng);
            assert_eq!(spawned, tick % 180 == 0, "tick {tick}");
        }
        assert_eq!(stream.len(), 3);
        assert!(stream.iter().all(|o| o.x == 440.0 && !o.passed));
    }

    #[test]
    fn test_zero_spawn_rate_spawns_every_tick() {
        let mut rng = Pcg32::seed_from_u64(4);
        let field = Playfield::new(440.0, 956.0);
        let tuning = Tuning {
            pipe_spawn_rate: 0,
            ..Tuning::default()
        };
        let mut stream = ObstacleStream::new();

        assert!(!stream.spawn_if_due(0, &field, &tuning, &mut rng));
        for tick in 1..=5 {
            assert!(stream.spawn_if_due(tick, &field, &tuning, &mut rng));
        }
        assert_eq!(stream.len(), 5);
    }

    #[test]
    fn test_advance_and_prune() {
        let mut stream = ObstacleStream::new();
        stream.push(Obstacle::new(-69.0, 200.0)); // right edge -9
        stream.push(Obstacle::new(100.0, 200.0));

        stream.advance(2.5);
        assert_eq!(stream.as_slice()[0].x, -71.5);
        assert_eq!(stream.as_slice()[1].x, 97.5);

        stream.prune(60.0);
        assert_eq!(stream.len(), 1);
        assert_eq!(stream.as_slice()[0].x, 97.5);
    }

    proptest! {
        #[test]
        fn prop_gap_top_fits(height in 0.0f32..3000.0, seed: u64) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let (lo, hi) = gap_top_range(height, 220.0);
            let top = random_gap_top(&mut rng, height, 220.0);
            prop_assert!(lo <= hi);
            prop_assert!(top >= lo && top <= hi);
            prop_assert!(top >= 0.0);
            if height >= 420.0 {
                prop_assert!(top >= 100.0);
                prop_assert!(top + 220.0 + 100.0 <= height);
            }
        }

        #[test]
        fn prop_prune_removes_offscreen(xs in prop::collection::vec(-200.0f32..500.0, 0..20)) {
            let mut stream = ObstacleStream::new();
            for x in &xs {
                stream.push(Obstacle::new(*x, 150.0));
            }
            stream.prune(60.0);
            prop_assert!(stream.iter().all(|o| o.x + 60.0 >= -10.0));
            let kept = xs.iter().filter(|x| **x + 60.0 > -10.0).count();
            prop_assert_eq!(stream.len(), kept);
            // Idempotent
            stream.prune(60.0);
            prop_assert_eq!(stream.len(), kept);
        }
    }
}

//! Per-frame simulation tick
//!
//! One call per display refresh. Within a playing tick the order is fixed:
//! physics, obstacle spawn/scroll, collision and scoring, pruning, then the
//! phase transition.

use super::collision::{body_aabb, evaluate};
use super::state::{GameEvent, GamePhase, GameState};

/// Actions and clock for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Flap / start (click, tap, space)
    pub activate: bool,
    /// Restart control on the game-over and win screens
    pub restart: bool,
    /// Wall-clock milliseconds, only used for the idle hover
    pub time_ms: f64,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    let impulse = apply_actions(state, input);

    match state.phase {
        GamePhase::Start => {
            let center = state.playfield.idle_center();
            state.body.idle_hover(center, input.time_ms);
        }
        GamePhase::Playing => step_playing(state, impulse),
        GamePhase::GameOver | GamePhase::Won => {}
    }
}

/// Handle queued actions for the current phase. Returns whether an impulse
/// is due this tick. At most one impulse is applied per activate.
fn apply_actions(state: &mut GameState, input: &TickInput) -> bool {
    match state.phase {
        GamePhase::Start if input.activate => {
            state.reset_session();
            state.phase = GamePhase::Playing;
            state.events.push(GameEvent::SessionStarted);
            state.events.push(GameEvent::Flap);
            log::info!("Session started");
            true
        }
        GamePhase::Playing if input.activate => {
            state.events.push(GameEvent::Flap);
            true
        }
        // Restart wins over a same-tick activate: the press happened on the
        // terminal screen, where activate does nothing.
        GamePhase::GameOver | GamePhase::Won if input.restart => {
            state.reset_session();
            state.phase = GamePhase::Start;
            state.events.push(GameEvent::Reset);
            log::info!("Back to title screen");
            false
        }
        _ => false,
    }
}

fn step_playing(state: &mut GameState, impulse: bool) {
    let tuning = state.tuning;
    let playfield = state.playfield;

    // 1. Physics
    state
        .body
        .step(tuning.gravity, impulse.then_some(tuning.lift));

    // 2. Obstacles
    state.time_ticks += 1;
    let ticks = state.time_ticks;
    let (obstacles, rng) = state.obstacles_and_rng();
    if obstacles.spawn_if_due(ticks, &playfield, &tuning, rng) {
        state.events.push(GameEvent::ObstacleSpawned);
    }
    state.obstacles.advance(tuning.pipe_speed);

    // 3. Collision and scoring
    let aabb = body_aabb(&state.body, &playfield);
    let eval = evaluate(
        &aabb,
        &mut state.obstacles,
        &playfield,
        tuning.pipe_width,
        tuning.pipe_gap,
    );
    for _ in 0..eval.newly_passed {
        state.score += 1;
        state.events.push(GameEvent::Scored { score: state.score });
        log::debug!("Scored: {}", state.score);
    }

    // 4. Pruning
    state.obstacles.prune(tuning.pipe_width);

    // 5. Phase transition, a crash outranks a win on the same tick
    if eval.crashed() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::Crashed { score: state.score });
        log::info!(
            "Game over at score {} ({})",
            state.score,
            if eval.hit_obstacle { "pipe" } else { "out of bounds" }
        );
    } else if state.score >= tuning.win_score {
        state.phase = GamePhase::Won;
        state.events.push(GameEvent::Won { score: state.score });
        log::info!("Won with score {}", state.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, Playfield};
    use crate::tuning::Tuning;

    fn new_state() -> GameState {
        GameState::new(12345, Playfield::new(300.0, 900.0), Tuning::default())
    }

    fn activate() -> TickInput {
        TickInput {
            activate: true,
            ..Default::default()
        }
    }

    fn restart() -> TickInput {
        TickInput {
            restart: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_start_to_playing_applies_one_impulse() {
        let mut state = new_state();
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::Start);

        tick(&mut state, &activate());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.body.velocity, -4.0);
        assert_eq!(state.body.y, 300.0 - 4.0);
        assert_eq!(state.time_ticks, 1);
        assert_eq!(
            state.events,
            vec![GameEvent::SessionStarted, GameEvent::Flap]
        );
    }

    #[test]
    fn test_start_hovers_without_physics() {
        let mut state = new_state();
        for ms in [0.0, 471.0, 1000.0, 2500.0] {
            tick(
                &mut state,
                &TickInput {
                    time_ms: ms,
                    ..Default::default()
                },
            );
            assert!((state.body.y - 450.0).abs() <= 10.0);
            assert_eq!(state.body.velocity, 0.0);
            assert_eq!(state.time_ticks, 0);
        }
    }

    #[test]
    fn test_flap_overrides_velocity() {
        let mut state = new_state();
        tick(&mut state, &activate());
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.body.velocity > -4.0);

        tick(&mut state, &activate());
        assert_eq!(state.body.velocity, -4.0);
        assert_eq!(state.events, vec![GameEvent::Flap]);
    }

    #[test]
    fn test_crash_outranks_win_on_same_tick() {
        let mut state = new_state();
        tick(&mut state, &activate());
        state.score = 5;
        state.body.y = 450.0;
        state.body.velocity = 0.0;
        // Cleared obstacle (right edge 72 < body left 83 after scrolling)
        state.obstacles.push(Obstacle::new(14.5, 400.0));
        // Overlapping obstacle with the gap far below the body
        state.obstacles.push(Obstacle::new(100.0, 600.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 6);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::Crashed { score: 6 }));
        assert!(!state.events.iter().any(|e| matches!(e, GameEvent::Won { .. })));
    }

    #[test]
    fn test_sixth_pass_wins_same_tick() {
        let mut state = new_state();
        tick(&mut state, &activate());
        state.score = 5;
        state.body.y = 450.0;
        state.body.velocity = 0.0;
        state.obstacles.push(Obstacle::new(14.5, 400.0));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 6);
        assert_eq!(state.phase, GamePhase::Won);
        assert!(state.events.contains(&GameEvent::Won { score: 6 }));
    }

    #[test]
    fn test_terminal_phases_ignore_activate() {
        let mut state = new_state();
        tick(&mut state, &activate());
        state.phase = GamePhase::GameOver;
        state.score = 3;
        let before_body = state.body;
        let before_ticks = state.time_ticks;

        tick(&mut state, &activate());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.body, before_body);
        assert_eq!(state.time_ticks, before_ticks);
        assert_eq!(state.score, 3);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_restart_returns_to_start() {
        let mut state = new_state();
        tick(&mut state, &activate());
        state.obstacles.push(Obstacle::new(200.0, 300.0));
        state.phase = GamePhase::Won;
        state.score = 6;

        tick(&mut state, &restart());
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.body.velocity, 0.0);
        assert_eq!(state.events, vec![GameEvent::Reset]);
    }

    #[test]
    fn test_restart_ignored_outside_terminal_phases() {
        let mut state = new_state();
        tick(&mut state, &restart());
        assert_eq!(state.phase, GamePhase::Start);
        assert!(state.events.is_empty());

        tick(&mut state, &activate());
        tick(&mut state, &restart());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, 2);
    }

    #[test]
    fn test_restart_with_activate_stays_on_title() {
        let mut state = new_state();
        tick(&mut state, &activate());
        state.phase = GamePhase::GameOver;

        let both = TickInput {
            activate: true,
            restart: true,
            time_ms: 0.0,
        };
        tick(&mut state, &both);
        assert_eq!(state.phase, GamePhase::Start);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state();
        let mut b = new_state();
        let inputs: Vec<TickInput> = (0..600)
            .map(|i| TickInput {
                activate: i % 40 == 0,
                ..Default::default()
            })
            .collect();

        for input in &inputs {
            tick(&mut a, input);
            tick(&mut b, input);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.obstacles.as_slice(), b.obstacles.as_slice());
        assert_eq!(a.body, b.body);
    }

    #[test]
    fn test_unvalidated_zero_spawn_rate_keeps_ticking() {
        let tuning = Tuning {
            pipe_spawn_rate: 0,
            ..Tuning::default()
        };
        let mut state = GameState::new(1, Playfield::new(440.0, 956.0), tuning);

        tick(&mut state, &activate());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.obstacles.len(), 1);
        assert!(state.events.contains(&GameEvent::ObstacleSpawned));

        tick(&mut state, &TickInput::default());
        assert_eq!(state.obstacles.len(), 2);
    }
}

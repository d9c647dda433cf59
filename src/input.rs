//! Action queue between input callbacks and the tick
//!
//! Pointer, touch and key handlers only enqueue. The driver drains the queue
//! once at the start of every tick, so handlers never touch simulation state.
//! Each slot holds at most one pending action; repeated presses between two
//! ticks coalesce.

use crate::sim::TickInput;

/// Coalescing single-slot queue for the two abstract actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionQueue {
    activate: bool,
    restart: bool,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a flap/start press
    pub fn push_activate(&mut self) {
        self.activate = true;
    }

    /// Record a press of the restart control
    pub fn push_restart(&mut self) {
        self.restart = true;
    }

    /// True if nothing is waiting
    pub fn is_empty(&self) -> bool {
        !self.activate && !self.restart
    }

    /// Drain pending actions into the next tick's input
    pub fn take(&mut self, time_ms: f64) -> TickInput {
        let input = TickInput {
            activate: self.activate,
            restart: self.restart,
            time_ms,
        };
        *self = Self::default();
        input
    }
}

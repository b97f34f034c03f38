//! Tick Clock
//!
//! Discrete simulation time. Wall-clock pacing between ticks belongs to
//! whoever drives the simulation and never affects its outputs.

use bevy_ecs::prelude::*;

/// Resource: monotonically increasing tick counter with a pause switch
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct TickClock {
    current_tick: u64,
    paused: bool,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Advance by one tick, returning the new tick, or None while paused
    pub fn advance(&mut self) -> Option<u64> {
        if self.paused {
            return None;
        }
        self.current_tick += 1;
        Some(self.current_tick)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Back to tick zero, running
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

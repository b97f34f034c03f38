//! ECS Systems
//!
//! The per-step pipeline: advance the clock, evolve the graph, deliver
//! diffusion entries that are due. Systems run chained on one thread.

pub mod diffusion;
pub mod evolution;
pub mod interactions;

use bevy_ecs::prelude::*;

use crate::clock::TickClock;

pub use diffusion::{DiffusionConfig, DiffusionQueue, PendingDiffusion};
pub use evolution::{evolve_system, EvolutionConfig, EvolutionManager, EvolutionReport};
pub use interactions::{deliver_diffusion_system, DeliveryReport, InteractionsEngine, Participation};

/// Resource: what the most recent step did
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tick: u64,
    pub evolution: EvolutionReport,
    pub delivery: DeliveryReport,
}

/// System: move the clock forward one tick
pub fn advance_clock(mut clock: ResMut<TickClock>, mut report: ResMut<StepReport>) {
    if let Some(tick) = clock.advance() {
        *report = StepReport {
            tick,
            ..Default::default()
        };
    }
}

/// The step schedule: systems chained so that evolution always completes
/// before deliveries for the same tick
pub fn build_step_schedule() -> Schedule {
    use bevy_ecs::schedule::ExecutorKind;

    let mut schedule = Schedule::default();
    schedule.set_executor_kind(ExecutorKind::SingleThreaded);
    schedule.add_systems((advance_clock, evolve_system, deliver_diffusion_system).chain());
    schedule
}

//! Pheme Social Simulation Engine Library
//!
//! Characters with personalities and emotions, directed relationships that
//! drift on their own, and interactions whose news spreads along the graph
//! with per-edge delay.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;

pub mod clock;
pub mod components;
pub mod config;
pub mod error;
pub mod events;
pub mod graph;
pub mod setup;
pub mod simulation;
pub mod systems;
pub mod transform;

pub use components::*;

pub use clock::TickClock;
pub use config::{Tuning, DEFAULT_TUNING_PATH};
pub use error::{ConfigError, GraphError, InteractionError, SetupError};
pub use events::{EventLogger, PendingEvents};
pub use graph::SocialGraph;
pub use setup::{demo_scenario, Scenario};
pub use simulation::Simulation;
pub use systems::{
    DeliveryReport, DiffusionConfig, EvolutionConfig, EvolutionManager, EvolutionReport,
    InteractionsEngine, Participation, PendingDiffusion, StepReport,
};
pub use transform::TransformConfig;

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

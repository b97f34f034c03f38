//! Simulation
//!
//! The entry point for presentation layers and the headless runner. Owns an
//! ECS world holding the graph, the managers, the clock and the RNG, and a
//! chained schedule that runs one step.
//!
//! External triggers and graph edits happen between steps, never inside one.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemState;
use pheme_events::{
    generate_snapshot_id, CharacterSnapshot, EmotionSnapshot, PersonalitySnapshot,
    RelationshipSnapshot, WorldSnapshot,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::info;

use crate::clock::TickClock;
use crate::components::{
    Character, EmotionVector, InteractionId, InteractionKind, InteractionVector,
    PersonalityVector, Relationship, Scope, TriadVector,
};
use crate::config::{SimulationConfig, Tuning};
use crate::error::{GraphError, InteractionError};
use crate::events::{PendingEvents, SimEvent};
use crate::graph::SocialGraph;
use crate::systems::{
    build_step_schedule, DeliveryReport, EvolutionManager, EvolutionReport, InteractionsEngine,
    PendingDiffusion, StepReport,
};
use crate::SimRng;

pub struct Simulation {
    world: World,
    step_schedule: Schedule,
    snapshot_sequence: u64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl Simulation {
    pub fn new(tuning: &Tuning) -> Self {
        Self::with_parts(
            tuning.simulation.seed,
            EvolutionManager::new(tuning.evolution.clone()),
            InteractionsEngine::new(tuning.engine.transform.clone(), tuning.engine.diffusion()),
        )
    }

    /// Default tuning with the given seed
    pub fn with_seed(seed: u64) -> Self {
        let tuning = Tuning {
            simulation: SimulationConfig {
                seed,
                ..Default::default()
            },
            ..Default::default()
        };
        Self::new(&tuning)
    }

    pub fn with_parts(seed: u64, evolution: EvolutionManager, engine: InteractionsEngine) -> Self {
        let mut world = World::new();
        world.insert_resource(SocialGraph::new());
        world.insert_resource(evolution);
        world.insert_resource(engine);
        world.insert_resource(TickClock::new());
        world.insert_resource(SimRng(SmallRng::seed_from_u64(seed)));
        world.insert_resource(PendingEvents::new());
        world.insert_resource(StepReport::default());

        Self {
            world,
            step_schedule: build_step_schedule(),
            snapshot_sequence: 0,
        }
    }

    // === RESOURCE ACCESS ===

    pub fn graph(&self) -> &SocialGraph {
        self.world.resource::<SocialGraph>()
    }

    /// Direct graph access; edits made here are not recorded as events
    pub fn graph_mut(&mut self) -> &mut SocialGraph {
        self.world.resource_mut::<SocialGraph>().into_inner()
    }

    pub fn engine(&self) -> &InteractionsEngine {
        self.world.resource::<InteractionsEngine>()
    }

    pub fn clock(&self) -> &TickClock {
        self.world.resource::<TickClock>()
    }

    pub fn clock_mut(&mut self) -> &mut TickClock {
        self.world.resource_mut::<TickClock>().into_inner()
    }

    pub fn current_tick(&self) -> u64 {
        self.clock().current_tick()
    }

    pub fn rng_mut(&mut self) -> &mut SmallRng {
        &mut self.world.resource_mut::<SimRng>().into_inner().0
    }

    /// Diffusion entries still in transit
    pub fn pending_diffusions(&self) -> &[PendingDiffusion] {
        self.engine().pending()
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.world.resource_mut::<PendingEvents>().drain()
    }

    fn record(&mut self, event: SimEvent) {
        self.world.resource_mut::<PendingEvents>().push(event);
    }

    // === GRAPH EDITING ===

    pub fn add_character(&mut self, character: Character) -> Result<(), GraphError> {
        let name = character.name().to_string();
        self.graph_mut().add_character(character)?;
        let tick = self.current_tick();
        self.record(SimEvent::CharacterAdded { tick, name });
        Ok(())
    }

    /// Add a character whose unset personality traits are drawn from the
    /// simulation RNG
    pub fn add_character_with(
        &mut self,
        name: &str,
        personality: [Option<f64>; 5],
        emotions: EmotionVector,
    ) -> Result<(), GraphError> {
        if self.graph().contains(name) {
            return Err(GraphError::DuplicateCharacter(name.to_string()));
        }
        let personality = PersonalityVector::from_partial(personality, self.rng_mut());
        self.add_character(Character::new(name, personality, emotions))
    }

    /// Remove a character and its relationships. Diffusion entries already
    /// heading its way are dropped on arrival.
    pub fn remove_character(&mut self, name: &str) -> Result<Character, GraphError> {
        let (character, relationships_removed) = self.graph_mut().remove_character(name)?;
        let tick = self.current_tick();
        self.record(SimEvent::CharacterRemoved {
            tick,
            name: name.to_string(),
            relationships_removed,
        });
        Ok(character)
    }

    pub fn rename_character(&mut self, old: &str, new: &str) -> Result<(), GraphError> {
        self.graph_mut().rename_character(old, new)?;
        self.world
            .resource_mut::<InteractionsEngine>()
            .rename_character(old, new);
        let tick = self.current_tick();
        self.record(SimEvent::CharacterRenamed {
            tick,
            old_name: old.to_string(),
            new_name: new.to_string(),
        });
        Ok(())
    }

    pub fn set_personality(
        &mut self,
        name: &str,
        personality: PersonalityVector,
    ) -> Result<(), GraphError> {
        self.graph_mut().set_personality(name, personality)
    }

    pub fn set_emotions(&mut self, name: &str, emotions: EmotionVector) -> Result<(), GraphError> {
        self.graph_mut().set_emotions(name, emotions)
    }

    pub fn add_relationship(
        &mut self,
        source: &str,
        target: &str,
        triad: TriadVector,
        distance: u32,
    ) -> Result<(), GraphError> {
        let tick = self.current_tick();
        let relationship = self
            .graph_mut()
            .add_relationship(source, target, triad, distance)?;
        let event = SimEvent::RelationshipAdded {
            tick,
            source: source.to_string(),
            target: target.to_string(),
            triad: relationship.triad.into(),
            distance: relationship.distance(),
        };
        self.record(event);
        Ok(())
    }

    pub fn remove_relationship(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<Relationship, GraphError> {
        let relationship = self.graph_mut().remove_relationship(source, target)?;
        let tick = self.current_tick();
        self.record(SimEvent::RelationshipRemoved {
            tick,
            source: source.to_string(),
            target: target.to_string(),
        });
        Ok(relationship)
    }

    pub fn set_distance(&mut self, source: &str, target: &str, distance: u32) -> Result<(), GraphError> {
        self.graph_mut().set_distance(source, target, distance)
    }

    // === READ-BACK ===

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.graph().character(name)
    }

    pub fn relationship(&self, source: &str, target: &str) -> Option<&Relationship> {
        self.graph().relationship(source, target)
    }

    /// Character names in graph order
    pub fn list_characters(&self) -> Vec<String> {
        self.graph().character_names()
    }

    pub fn neighbors(&self, name: &str) -> Vec<&Character> {
        self.graph().neighbors(name)
    }

    // === STEPPING ===

    /// One evolution pass at the current tick, outside the step schedule
    pub fn evolve(&mut self) -> EvolutionReport {
        let mut state: SystemState<(
            Res<EvolutionManager>,
            ResMut<SocialGraph>,
            ResMut<SimRng>,
            Res<TickClock>,
            ResMut<PendingEvents>,
        )> = SystemState::new(&mut self.world);
        let (manager, mut graph, mut rng, clock, mut events) = state.get_mut(&mut self.world);
        manager.evolve(&mut graph, &mut rng.0, clock.current_tick(), &mut events)
    }

    /// Deliver diffusion entries due at `current_tick`
    pub fn tick(&mut self, current_tick: u64) -> DeliveryReport {
        let mut state: SystemState<(
            ResMut<InteractionsEngine>,
            ResMut<SocialGraph>,
            ResMut<PendingEvents>,
        )> = SystemState::new(&mut self.world);
        let (mut engine, mut graph, mut events) = state.get_mut(&mut self.world);
        engine.tick(&mut graph, current_tick, &mut events)
    }

    /// Advance the clock, evolve, then deliver. Returns None while paused.
    pub fn step(&mut self) -> Option<StepReport> {
        if self.clock().is_paused() {
            return None;
        }
        self.step_schedule.run(&mut self.world);
        Some(*self.world.resource::<StepReport>())
    }

    /// Run up to `ticks` steps, stopping early if the clock is paused.
    /// Returns the number of steps taken.
    pub fn run(&mut self, ticks: u64) -> u64 {
        let mut completed = 0;
        for _ in 0..ticks {
            if self.step().is_none() {
                break;
            }
            completed += 1;
        }
        info!(completed, tick = self.current_tick(), "run finished");
        completed
    }

    // === INTERACTIONS ===

    /// Trigger a catalog interaction by template name
    pub fn trigger_interaction(
        &mut self,
        actor: &str,
        target: &str,
        template: &str,
        scope: Scope,
    ) -> Result<InteractionId, InteractionError> {
        let kind: InteractionKind = template.parse()?;
        self.trigger_kind(actor, target, kind, scope)
    }

    pub fn trigger_kind(
        &mut self,
        actor: &str,
        target: &str,
        kind: InteractionKind,
        scope: Scope,
    ) -> Result<InteractionId, InteractionError> {
        let tick = self.current_tick();
        let mut state: SystemState<(
            ResMut<InteractionsEngine>,
            ResMut<SocialGraph>,
            ResMut<PendingEvents>,
        )> = SystemState::new(&mut self.world);
        let (mut engine, mut graph, mut events) = state.get_mut(&mut self.world);

        InteractionsEngine::validate_participants(&graph, actor, target)?;
        let interaction = engine.create_interaction(kind, actor, target, tick);
        engine.trigger_interaction(&mut graph, interaction, scope, &mut events)
    }

    /// Trigger an interaction with a free label; unset vector axes are drawn
    /// from the simulation RNG
    pub fn trigger_custom(
        &mut self,
        actor: &str,
        target: &str,
        label: &str,
        vector: [Option<f64>; 5],
        scope: Scope,
    ) -> Result<InteractionId, InteractionError> {
        let tick = self.current_tick();
        let mut state: SystemState<(
            ResMut<InteractionsEngine>,
            ResMut<SocialGraph>,
            ResMut<SimRng>,
            ResMut<PendingEvents>,
        )> = SystemState::new(&mut self.world);
        let (mut engine, mut graph, mut rng, mut events) = state.get_mut(&mut self.world);

        InteractionsEngine::validate_participants(&graph, actor, target)?;
        let vector = InteractionVector::from_partial(vector, &mut rng.0);
        let interaction = engine.create_custom_interaction(label, actor, target, tick, vector);
        engine.trigger_interaction(&mut graph, interaction, scope, &mut events)
    }

    // === SNAPSHOTS ===

    /// Serializable copy of the whole world at the current tick
    pub fn snapshot(&mut self) -> WorldSnapshot {
        self.snapshot_sequence += 1;
        let mut snapshot = WorldSnapshot::new(
            generate_snapshot_id(self.snapshot_sequence),
            self.current_tick(),
        );
        let graph = self.graph();
        snapshot.characters = graph.characters().iter().map(character_snapshot).collect();
        snapshot.relationships = graph
            .relationships()
            .iter()
            .map(relationship_snapshot)
            .collect();
        snapshot.pending_diffusions = self.engine().pending().len();
        snapshot
    }
}

fn character_snapshot(character: &Character) -> CharacterSnapshot {
    let p = &character.personality;
    let e = &character.emotions;
    CharacterSnapshot {
        name: character.name().to_string(),
        personality: PersonalitySnapshot {
            openness: p.openness,
            conscientiousness: p.conscientiousness,
            extraversion: p.extraversion,
            agreeableness: p.agreeableness,
            neuroticism: p.neuroticism,
        },
        emotions: EmotionSnapshot {
            happiness: e.happiness,
            sadness: e.sadness,
            anger: e.anger,
            fear: e.fear,
            surprise: e.surprise,
            disgust: e.disgust,
        },
        known_interactions: character
            .known_interactions()
            .into_iter()
            .map(|id| id.0)
            .collect(),
    }
}

fn relationship_snapshot(relationship: &Relationship) -> RelationshipSnapshot {
    RelationshipSnapshot {
        source: relationship.source().to_string(),
        target: relationship.target().to_string(),
        triad: relationship.triad.into(),
        intensity: relationship.intensity(),
        confidence: relationship.confidence(),
        label: relationship.label().to_string(),
        distance: relationship.distance(),
    }
}

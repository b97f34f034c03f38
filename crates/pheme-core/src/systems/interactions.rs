//! Interactions Engine
//!
//! Applies triggered interactions to participants and observers, and owns the
//! delayed diffusion schedule.

use bevy_ecs::prelude::*;
use tracing::{debug, info};

use super::diffusion::{DiffusionConfig, DiffusionQueue, PendingDiffusion};
use super::StepReport;
use crate::clock::TickClock;
use crate::components::{
    Interaction, InteractionId, InteractionKind, InteractionVector, Scope,
};
use crate::error::{GraphError, InteractionError};
use crate::events::{DropReason, PendingEvents, SimEvent};
use crate::graph::SocialGraph;
use crate::transform::TransformConfig;

/// How a character relates to an interaction it is processing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    Actor,
    Target,
    /// Knows the actor and/or the target
    Observer,
    /// Knows neither participant
    Unrelated,
    /// Not in the graph
    Absent,
}

/// Outcome of one delivery pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub dropped: usize,
    /// Entries still in transit after the pass
    pub pending: usize,
}

/// Resource: interaction processing and word-of-mouth diffusion
#[derive(Resource, Debug, Clone)]
pub struct InteractionsEngine {
    transform: TransformConfig,
    diffusion: DiffusionConfig,
    queue: DiffusionQueue,
    next_id: u64,
}

impl Default for InteractionsEngine {
    fn default() -> Self {
        Self::new(TransformConfig::default(), DiffusionConfig::default())
    }
}

impl InteractionsEngine {
    pub fn new(transform: TransformConfig, diffusion: DiffusionConfig) -> Self {
        Self {
            transform,
            diffusion,
            queue: DiffusionQueue::new(),
            next_id: 1,
        }
    }

    pub fn transform(&self) -> &TransformConfig {
        &self.transform
    }

    pub fn diffusion_config(&self) -> &DiffusionConfig {
        &self.diffusion
    }

    /// Entries still in transit, in scheduling order
    pub fn pending(&self) -> &[PendingDiffusion] {
        self.queue.entries()
    }

    fn allocate_id(&mut self) -> InteractionId {
        let id = InteractionId(self.next_id);
        self.next_id += 1;
        id
    }

    /// New interaction from a catalog template
    pub fn create_interaction(
        &mut self,
        kind: InteractionKind,
        actor: &str,
        target: &str,
        tick: u64,
    ) -> Interaction {
        let id = self.allocate_id();
        Interaction::from_kind(id, kind, actor, target, tick)
    }

    /// New interaction with a caller-supplied label and vector
    pub fn create_custom_interaction(
        &mut self,
        label: &str,
        actor: &str,
        target: &str,
        tick: u64,
        vector: InteractionVector,
    ) -> Interaction {
        let id = self.allocate_id();
        Interaction::new(id, actor, target, label, tick, vector)
    }

    /// Check that an interaction between `actor` and `target` can be triggered
    pub fn validate_participants(
        graph: &SocialGraph,
        actor: &str,
        target: &str,
    ) -> Result<(), InteractionError> {
        if actor == target {
            return Err(InteractionError::SelfInteraction(actor.to_string()));
        }
        for name in [actor, target] {
            if !graph.contains(name) {
                return Err(GraphError::CharacterNotFound(name.to_string()).into());
            }
        }
        Ok(())
    }

    // === PROCESSING ===

    /// Apply `interaction` from the point of view of `name`
    pub fn process_interaction_for_character(
        &self,
        graph: &mut SocialGraph,
        name: &str,
        interaction: &Interaction,
    ) -> Participation {
        if !graph.contains(name) {
            return Participation::Absent;
        }

        if name == interaction.actor {
            let perceived = self.transform.perceived_by_actor(&interaction.vector);
            self.apply_direct(graph, name, &interaction.target, &perceived, &interaction.vector);
            Participation::Actor
        } else if name == interaction.target {
            self.apply_direct(graph, name, &interaction.actor, &interaction.vector, &interaction.vector);
            Participation::Target
        } else if graph.has_relationship(name, &interaction.actor)
            || graph.has_relationship(name, &interaction.target)
        {
            self.apply_indirect(graph, name, interaction);
            Participation::Observer
        } else {
            Participation::Unrelated
        }
    }

    /// Apply `interaction` to each named character in order
    pub fn process_interaction_for_group(
        &self,
        graph: &mut SocialGraph,
        names: &[String],
        interaction: &Interaction,
    ) -> Vec<Participation> {
        names
            .iter()
            .map(|name| self.process_interaction_for_character(graph, name, interaction))
            .collect()
    }

    /// Apply `interaction` to every character in graph order
    pub fn process_interaction_for_all(
        &self,
        graph: &mut SocialGraph,
        interaction: &Interaction,
    ) -> Vec<Participation> {
        let names = graph.character_names();
        self.process_interaction_for_group(graph, &names, interaction)
    }

    /// Participant update. `perceived` drives the participant's own changes,
    /// `raw` drives the side effect on relationships toward the other
    /// participant's contacts.
    fn apply_direct(
        &self,
        graph: &mut SocialGraph,
        name: &str,
        other: &str,
        perceived: &InteractionVector,
        raw: &InteractionVector,
    ) {
        let Some(character) = graph.character_mut(name) else {
            return;
        };
        let personality = character.personality;
        character.emotions = self
            .transform
            .direct_emotions(&character.emotions, perceived, &personality);

        let Some(other_personality) = graph.character(other).map(|c| c.personality) else {
            return;
        };
        let Ok(relationship) = graph.ensure_relationship(name, other) else {
            return;
        };
        relationship.triad = self.transform.direct_relationship(
            &relationship.triad,
            perceived,
            &personality,
            &other_personality,
        );

        // What happened to `other` also colours how `name` sees other's contacts
        for neighbor in graph.neighbor_names(other) {
            if neighbor == name {
                continue;
            }
            if let Some(relationship) = graph.relationship_mut(name, &neighbor) {
                relationship.triad =
                    self.transform
                        .indirect_relationship(&relationship.triad, raw, &personality);
            }
        }
    }

    fn apply_indirect(&self, graph: &mut SocialGraph, name: &str, interaction: &Interaction) {
        let Some(character) = graph.character_mut(name) else {
            return;
        };
        let personality = character.personality;
        character.emotions =
            self.transform
                .indirect_emotions(&character.emotions, &interaction.vector, &personality);

        for participant in [&interaction.actor, &interaction.target] {
            if let Some(relationship) = graph.relationship_mut(name, participant) {
                relationship.triad = self.transform.indirect_relationship(
                    &relationship.triad,
                    &interaction.vector,
                    &personality,
                );
            }
        }
    }

    // === TRIGGERING ===

    /// Apply a freshly created interaction.
    ///
    /// Actor and target always learn it and get the direct update, actor
    /// first. Private interactions then spread from both participants by word
    /// of mouth. Public ones are then applied to the whole graph at once,
    /// participants included, and become known to everyone.
    pub fn trigger_interaction(
        &mut self,
        graph: &mut SocialGraph,
        interaction: Interaction,
        scope: Scope,
        events: &mut PendingEvents,
    ) -> Result<InteractionId, InteractionError> {
        Self::validate_participants(graph, &interaction.actor, &interaction.target)?;
        let tick = interaction.tick;

        info!(
            id = %interaction.id,
            actor = %interaction.actor,
            target = %interaction.target,
            label = %interaction.label,
            %scope,
            "interaction triggered"
        );
        events.push(SimEvent::InteractionTriggered {
            tick,
            interaction_id: interaction.id.0,
            actor: interaction.actor.clone(),
            target: interaction.target.clone(),
            label: interaction.label.clone(),
            scope: scope.to_string(),
        });

        for participant in [&interaction.actor, &interaction.target] {
            if let Some(character) = graph.character_mut(participant) {
                character.learn(interaction.id);
            }
            self.process_interaction_for_character(graph, participant, &interaction);
        }

        match scope {
            Scope::Secret => {}
            Scope::Private => {
                self.diffuse_interaction(graph, &interaction.actor, &interaction, tick);
                self.diffuse_interaction(graph, &interaction.target, &interaction, tick);
            }
            Scope::Public => {
                // The whole-graph pass covers actor and target again
                self.process_interaction_for_all(graph, &interaction);
                for name in graph.character_names() {
                    let Some(character) = graph.character_mut(&name) else {
                        continue;
                    };
                    if character.learn(interaction.id) {
                        events.push(SimEvent::InteractionDelivered {
                            tick,
                            interaction_id: interaction.id.0,
                            character: name,
                        });
                    }
                }
            }
        }

        Ok(interaction.id)
    }

    // === DIFFUSION ===

    /// `source` learns the interaction and tells each outgoing neighbor,
    /// who hears it after the edge's informational distance.
    /// Returns the number of deliveries scheduled.
    pub fn diffuse_interaction(
        &mut self,
        graph: &mut SocialGraph,
        source: &str,
        interaction: &Interaction,
        current_tick: u64,
    ) -> usize {
        let Some(character) = graph.character_mut(source) else {
            return 0;
        };
        character.learn(interaction.id);

        let mut scheduled = 0;
        for relationship in graph.relationships_from(source) {
            let arrival_tick = current_tick + u64::from(relationship.distance());
            self.queue.schedule(PendingDiffusion {
                arrival_tick,
                target: relationship.target().to_string(),
                interaction: interaction.clone(),
            });
            scheduled += 1;
        }
        debug!(source, id = %interaction.id, scheduled, "diffusion scheduled");
        scheduled
    }

    /// Deliver every entry due at `current_tick`.
    ///
    /// Entries whose target already knows the interaction, or whose target
    /// has left the graph, are dropped. Entries not yet due are kept in order.
    pub fn tick(
        &mut self,
        graph: &mut SocialGraph,
        current_tick: u64,
        events: &mut PendingEvents,
    ) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        let mut waiting = Vec::new();

        for entry in self.queue.drain() {
            if entry.arrival_tick > current_tick {
                waiting.push(entry);
                continue;
            }

            let id = entry.interaction.id;
            let dropped = match graph.character_mut(&entry.target) {
                None => Some(DropReason::MissingTarget),
                Some(character) => (!character.learn(id)).then_some(DropReason::AlreadyKnown),
            };
            if let Some(reason) = dropped {
                debug!(id = %id, target = %entry.target, ?reason, "diffusion dropped");
                events.push(SimEvent::InteractionDropped {
                    tick: current_tick,
                    interaction_id: id.0,
                    character: entry.target,
                    reason,
                });
                report.dropped += 1;
                continue;
            }

            self.process_interaction_for_character(graph, &entry.target, &entry.interaction);
            debug!(id = %id, target = %entry.target, "diffusion delivered");
            events.push(SimEvent::InteractionDelivered {
                tick: current_tick,
                interaction_id: id.0,
                character: entry.target.clone(),
            });
            report.delivered += 1;

            if self.diffusion.rediffuse_on_delivery {
                self.diffuse_interaction(graph, &entry.target, &entry.interaction, current_tick);
            }
        }

        self.queue.requeue(waiting);
        report.pending = self.queue.len();
        report
    }

    /// Point queued entries at a renamed character
    pub fn rename_character(&mut self, old: &str, new: &str) {
        self.queue.rename_character(old, new);
    }
}

/// System: deliver diffusion entries due at the current tick
pub fn deliver_diffusion_system(
    mut engine: ResMut<InteractionsEngine>,
    mut graph: ResMut<SocialGraph>,
    clock: Res<TickClock>,
    mut events: ResMut<PendingEvents>,
    mut report: ResMut<StepReport>,
) {
    report.delivery = engine.tick(&mut graph, clock.current_tick(), &mut events);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Character, EmotionVector, PersonalityVector, TriadPreset, TriadVector};

    fn graph_with(names: &[&str]) -> SocialGraph {
        let mut graph = SocialGraph::new();
        for name in names {
            graph.add_character(Character::neutral(*name)).unwrap();
        }
        graph
    }

    #[test]
    fn test_direct_update_creates_neutral_relationship() {
        let mut graph = graph_with(&["A", "B"]);
        let mut engine = InteractionsEngine::default();
        let helped = engine.create_interaction(InteractionKind::Helped, "A", "B", 0);

        let role = engine.process_interaction_for_character(&mut graph, "B", &helped);

        assert_eq!(role, Participation::Target);
        let triad = graph.relationship("B", "A").unwrap().triad;
        let expected = engine.transform().direct_relationship(
            &TriadVector::neutral(),
            &helped.vector,
            &PersonalityVector::neutral(),
            &PersonalityVector::neutral(),
        );
        assert_eq!(triad, expected);
        assert!(graph.character("B").unwrap().emotions.happiness > 0.0);
        assert!(!graph.has_relationship("A", "B"));
    }

    #[test]
    fn test_actor_feels_attenuated_valence() {
        let mut graph = graph_with(&["A", "B"]);
        let mut engine = InteractionsEngine::default();
        let helped = engine.create_interaction(InteractionKind::Helped, "A", "B", 0);

        engine.process_interaction_for_character(&mut graph, "A", &helped);
        engine.process_interaction_for_character(&mut graph, "B", &helped);

        let actor = graph.character("A").unwrap().emotions.happiness;
        let target = graph.character("B").unwrap().emotions.happiness;
        assert!(actor > 0.0);
        assert!(actor < target);
    }

    #[test]
    fn test_observer_and_unrelated() {
        let mut graph = graph_with(&["A", "B", "C", "D"]);
        graph.add_relationship("C", "A", TriadPreset::Friendly.triad(), 1).unwrap();
        let mut engine = InteractionsEngine::default();
        let insulted = engine.create_interaction(InteractionKind::Insulted, "A", "B", 0);

        assert_eq!(
            engine.process_interaction_for_character(&mut graph, "C", &insulted),
            Participation::Observer
        );
        assert_eq!(
            engine.process_interaction_for_character(&mut graph, "D", &insulted),
            Participation::Unrelated
        );
        assert_eq!(
            engine.process_interaction_for_character(&mut graph, "Nobody", &insulted),
            Participation::Absent
        );

        let expected = engine.transform().indirect_relationship(
            &TriadPreset::Friendly.triad(),
            &insulted.vector,
            &PersonalityVector::neutral(),
        );
        assert_eq!(graph.relationship("C", "A").unwrap().triad, expected);
        assert!(!graph.has_relationship("C", "B"));
        assert_eq!(graph.character("D").unwrap().emotions, EmotionVector::default());
    }

    #[test]
    fn test_direct_update_touches_contacts_of_other_participant() {
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_relationship("B", "C", TriadVector::neutral(), 1).unwrap();
        graph.add_relationship("A", "C", TriadVector::neutral(), 1).unwrap();
        let mut engine = InteractionsEngine::default();
        let helped = engine.create_interaction(InteractionKind::Helped, "A", "B", 0);

        engine.process_interaction_for_character(&mut graph, "A", &helped);

        // Side effect uses the raw vector, not the actor's attenuated one
        let expected = engine.transform().indirect_relationship(
            &TriadVector::neutral(),
            &helped.vector,
            &PersonalityVector::neutral(),
        );
        assert_eq!(graph.relationship("A", "C").unwrap().triad, expected);
    }

    #[test]
    fn test_delivery_waits_for_distance() {
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_relationship("A", "B", TriadVector::neutral(), 1).unwrap();
        graph.add_relationship("A", "C", TriadVector::neutral(), 3).unwrap();
        let mut engine = InteractionsEngine::default();
        let mut events = PendingEvents::new();
        let praised = engine.create_interaction(InteractionKind::Praised, "A", "B", 0);

        assert_eq!(engine.diffuse_interaction(&mut graph, "A", &praised, 5), 2);
        assert!(graph.character("A").unwrap().knows(praised.id));

        let report = engine.tick(&mut graph, 5, &mut events);
        assert_eq!(report.delivered, 0);
        assert_eq!(report.pending, 2);

        let report = engine.tick(&mut graph, 6, &mut events);
        assert_eq!(report.delivered, 1);
        assert!(graph.character("B").unwrap().knows(praised.id));
        assert!(!graph.character("C").unwrap().knows(praised.id));

        let report = engine.tick(&mut graph, 8, &mut events);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.pending, 0);
        assert!(graph.character("C").unwrap().knows(praised.id));
    }

    #[test]
    fn test_known_and_missing_targets_are_dropped() {
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_relationship("A", "B", TriadVector::neutral(), 1).unwrap();
        graph.add_relationship("A", "C", TriadVector::neutral(), 1).unwrap();
        let mut engine = InteractionsEngine::default();
        let mut events = PendingEvents::new();
        let hugged = engine.create_interaction(InteractionKind::Hugged, "A", "B", 0);

        engine.diffuse_interaction(&mut graph, "A", &hugged, 0);
        graph.character_mut("B").unwrap().learn(hugged.id);
        graph.remove_character("C").unwrap();

        let report = engine.tick(&mut graph, 1, &mut events);
        assert_eq!(report.delivered, 0);
        assert_eq!(report.dropped, 2);

        let reasons: Vec<DropReason> = events
            .drain()
            .into_iter()
            .filter_map(|e| match e {
                SimEvent::InteractionDropped { reason, .. } => Some(reason),
                _ => None,
            })
            .collect();
        assert_eq!(reasons, vec![DropReason::AlreadyKnown, DropReason::MissingTarget]);
    }

    #[test]
    fn test_secret_trigger_reaches_only_participants() {
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_relationship("A", "C", TriadVector::neutral(), 1).unwrap();
        let mut engine = InteractionsEngine::default();
        let mut events = PendingEvents::new();
        let kissed = engine.create_interaction(InteractionKind::Kissed, "A", "B", 0);

        let id = engine
            .trigger_interaction(&mut graph, kissed, Scope::Secret, &mut events)
            .unwrap();

        assert!(graph.character("A").unwrap().knows(id));
        assert!(graph.character("B").unwrap().knows(id));
        assert!(!graph.character("C").unwrap().knows(id));
        assert!(graph.has_relationship("A", "B"));
        assert!(graph.has_relationship("B", "A"));
        assert!(engine.pending().is_empty());
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_private_trigger_schedules_from_both_participants() {
        let mut graph = graph_with(&["A", "B", "C", "D"]);
        graph.add_relationship("A", "C", TriadVector::neutral(), 2).unwrap();
        graph.add_relationship("B", "D", TriadVector::neutral(), 1).unwrap();
        let mut engine = InteractionsEngine::default();
        let mut events = PendingEvents::new();
        let helped = engine.create_interaction(InteractionKind::Helped, "A", "B", 4);

        engine
            .trigger_interaction(&mut graph, helped, Scope::Private, &mut events)
            .unwrap();

        // A -> C, A -> B (created by the direct update), B -> D, B -> A
        let pending: Vec<(&str, u64)> = engine
            .pending()
            .iter()
            .map(|p| (p.target.as_str(), p.arrival_tick))
            .collect();
        assert_eq!(pending, vec![("C", 6), ("B", 5), ("D", 5), ("A", 5)]);

        let report = engine.tick(&mut graph, 5, &mut events);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.dropped, 2);
        assert_eq!(report.pending, 1);
    }

    #[test]
    fn test_public_trigger_reaches_everyone() {
        let mut graph = graph_with(&["A", "B", "C", "D"]);
        graph.add_relationship("C", "B", TriadVector::neutral(), 1).unwrap();
        let mut engine = InteractionsEngine::default();
        let mut events = PendingEvents::new();
        let threatened = engine.create_interaction(InteractionKind::Threatened, "A", "B", 0);

        let id = engine
            .trigger_interaction(&mut graph, threatened, Scope::Public, &mut events)
            .unwrap();

        for c in graph.characters() {
            assert!(c.knows(id), "{} should know", c.name());
        }
        assert!(engine.pending().is_empty());
        assert_ne!(graph.relationship("C", "B").unwrap().triad, TriadVector::neutral());
        assert_eq!(graph.character("D").unwrap().emotions, EmotionVector::default());
    }

    #[test]
    fn test_public_applies_to_participants_again() {
        let run = |scope: Scope| {
            let mut graph = graph_with(&["A", "B", "C"]);
            let mut engine = InteractionsEngine::default();
            let mut events = PendingEvents::new();
            let helped = engine.create_interaction(InteractionKind::Helped, "A", "B", 0);
            engine
                .trigger_interaction(&mut graph, helped, scope, &mut events)
                .unwrap();
            graph
        };
        let secret = run(Scope::Secret);
        let public = run(Scope::Public);

        let secret_ba = secret.relationship("B", "A").unwrap().triad;
        let public_ba = public.relationship("B", "A").unwrap().triad;
        assert_ne!(secret_ba, public_ba);
        assert!(public_ba.privacy > secret_ba.privacy);

        let secret_b = secret.character("B").unwrap().emotions.happiness;
        let public_b = public.character("B").unwrap().emotions.happiness;
        assert!(public_b > secret_b);
        assert_ne!(
            secret.character("A").unwrap().emotions,
            public.character("A").unwrap().emotions
        );
    }

    #[test]
    fn test_trigger_rejects_bad_participants() {
        let mut graph = graph_with(&["A", "B"]);
        let mut engine = InteractionsEngine::default();
        let mut events = PendingEvents::new();

        let own = engine.create_interaction(InteractionKind::Hugged, "A", "A", 0);
        assert_eq!(
            engine.trigger_interaction(&mut graph, own, Scope::Secret, &mut events),
            Err(InteractionError::SelfInteraction("A".to_string()))
        );
        let ghost = engine.create_interaction(InteractionKind::Hugged, "A", "Ghost", 0);
        assert!(matches!(
            engine.trigger_interaction(&mut graph, ghost, Scope::Secret, &mut events),
            Err(InteractionError::Graph(GraphError::CharacterNotFound(_)))
        ));
        assert!(events.is_empty());
        assert_eq!(graph.relationship_count(), 0);
    }

    #[test]
    fn test_rediffusion_spreads_multiple_hops() {
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_relationship("A", "B", TriadVector::neutral(), 1).unwrap();
        graph.add_relationship("B", "C", TriadVector::neutral(), 1).unwrap();
        let config = DiffusionConfig {
            rediffuse_on_delivery: true,
        };
        let mut engine = InteractionsEngine::new(TransformConfig::default(), config);
        let mut events = PendingEvents::new();
        let praised = engine.create_interaction(InteractionKind::Praised, "A", "B", 0);

        engine.diffuse_interaction(&mut graph, "A", &praised, 0);
        engine.tick(&mut graph, 1, &mut events);
        assert!(!graph.character("C").unwrap().knows(praised.id));
        engine.tick(&mut graph, 2, &mut events);
        assert!(graph.character("C").unwrap().knows(praised.id));
    }

    #[test]
    fn test_interaction_ids_are_sequential() {
        let mut engine = InteractionsEngine::default();
        let first = engine.create_interaction(InteractionKind::Ignored, "A", "B", 0);
        let second = engine.create_custom_interaction(
            "waved",
            "B",
            "A",
            0,
            InteractionVector::new(0.1, 0.3, 0.2, 0.0, 0.4),
        );
        assert_eq!(first.id, InteractionId(1));
        assert_eq!(second.id, InteractionId(2));
        assert_eq!(second.label, "waved");
    }
}

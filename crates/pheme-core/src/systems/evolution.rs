//! Evolution System
//!
//! Autonomous drift of the social graph between interactions:
//! triadic closure, relationship decay and emotion decay, in that order.

use bevy_ecs::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::StepReport;
use crate::clock::TickClock;
use crate::components::{TriadVector, NEUTRAL_COMPATIBILITY};
use crate::events::{PendingEvents, SimEvent};
use crate::graph::SocialGraph;
use crate::SimRng;

/// Tunable constants for the evolution step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Base chance that two acquaintances of a common friend meet
    pub formation_probability: f64,
    pub min_formation_probability: f64,
    pub max_formation_probability: f64,

    /// Triad average beyond which a relationship counts as clearly positive or negative
    pub polarity_threshold: f64,
    pub both_positive_multiplier: f64,
    pub both_negative_multiplier: f64,
    /// Hub likes the first partner and dislikes the second
    pub positive_negative_multiplier: f64,
    /// Hub dislikes the first partner and likes the second
    pub negative_positive_multiplier: f64,

    /// Weight of the hub's relationship to the first partner in the blend
    pub first_blend_weight: f64,
    /// Weight of the hub's relationship to the second partner in the blend
    pub second_blend_weight: f64,
    pub compatibility_mix_weight: f64,
    pub privacy_mix_weight: f64,
    pub commitment_mix_weight: f64,
    pub passion_mix_weight: f64,
    pub formation_jitter: f64,

    pub decay_compatibility_weight: f64,
    pub decay_jitter: f64,
    pub privacy_decay_rate: f64,
    pub commitment_decay_rate: f64,
    pub passion_decay_rate: f64,

    /// Relaxation applied to every character's emotions each tick
    pub emotion_decay: f64,
    pub positive_sentiment_threshold: f64,
    pub negative_sentiment_threshold: f64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            formation_probability: 0.3,
            min_formation_probability: 0.05,
            max_formation_probability: 0.9,
            polarity_threshold: 0.3,
            both_positive_multiplier: 1.4,
            both_negative_multiplier: 1.2,
            positive_negative_multiplier: 0.4,
            negative_positive_multiplier: 0.3,
            first_blend_weight: 0.3,
            second_blend_weight: 0.7,
            compatibility_mix_weight: 0.4,
            privacy_mix_weight: 0.2,
            commitment_mix_weight: 0.3,
            passion_mix_weight: 0.2,
            formation_jitter: 0.15,
            decay_compatibility_weight: 0.1,
            decay_jitter: 0.1,
            privacy_decay_rate: 0.01,
            commitment_decay_rate: 0.015,
            passion_decay_rate: 0.01,
            emotion_decay: 0.05,
            positive_sentiment_threshold: 0.3,
            negative_sentiment_threshold: -0.2,
        }
    }
}

/// What one evolution step changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvolutionReport {
    pub formation_attempts: usize,
    pub relationships_formed: usize,
    pub relationships_decayed: usize,
    pub characters_relaxed: usize,
}

/// Resource: runs the evolution step with a fixed configuration
#[derive(Resource, Debug, Clone, Default)]
pub struct EvolutionManager {
    config: EvolutionConfig,
}

/// One closure candidate: hub C knows both A and B
struct Triangle<'a> {
    hub: &'a str,
    first: &'a str,
    first_triad: TriadVector,
    second: &'a str,
    second_triad: TriadVector,
}

impl EvolutionManager {
    pub fn new(config: EvolutionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Run one full evolution step
    pub fn evolve<R: Rng + ?Sized>(
        &self,
        graph: &mut SocialGraph,
        rng: &mut R,
        tick: u64,
        events: &mut PendingEvents,
    ) -> EvolutionReport {
        let mut report = EvolutionReport::default();
        self.close_triads(graph, rng, tick, events, &mut report);
        report.relationships_decayed = self.decay_relationships(graph, rng);
        report.characters_relaxed = self.decay_emotions(graph);
        debug!(
            tick,
            attempts = report.formation_attempts,
            formed = report.relationships_formed,
            "evolution step"
        );
        report
    }

    /// Friends of friends may meet. Partner lists are read when each hub is
    /// visited, so relationships formed earlier in the pass are visible.
    fn close_triads<R: Rng + ?Sized>(
        &self,
        graph: &mut SocialGraph,
        rng: &mut R,
        tick: u64,
        events: &mut PendingEvents,
        report: &mut EvolutionReport,
    ) {
        for hub in graph.character_names() {
            let partners: Vec<(String, TriadVector)> = graph
                .relationships_from(&hub)
                .map(|r| (r.target().to_string(), r.triad))
                .collect();

            for (i, (first, first_triad)) in partners.iter().enumerate() {
                for (j, (second, second_triad)) in partners.iter().enumerate() {
                    if i == j || graph.has_relationship(first, second) {
                        continue;
                    }
                    report.formation_attempts += 1;
                    let triangle = Triangle {
                        hub: &hub,
                        first,
                        first_triad: *first_triad,
                        second,
                        second_triad: *second_triad,
                    };
                    if self.try_form(graph, rng, &triangle, tick, events) {
                        report.relationships_formed += 1;
                    }
                }
            }
        }
    }

    fn try_form<R: Rng + ?Sized>(
        &self,
        graph: &mut SocialGraph,
        rng: &mut R,
        triangle: &Triangle<'_>,
        tick: u64,
        events: &mut PendingEvents,
    ) -> bool {
        // Missing endpoints make the attempt a no-op
        let Some(compat) = graph.compatibility(triangle.first, triangle.second) else {
            return false;
        };

        let probability =
            self.formation_probability(&triangle.first_triad, &triangle.second_triad, compat);
        if rng.gen::<f64>() >= probability {
            return false;
        }

        let triad = self.blended_triad(&triangle.first_triad, &triangle.second_triad, compat, rng);
        if graph
            .add_relationship(triangle.first, triangle.second, triad, 1)
            .is_err()
        {
            return false;
        }

        let shift = if triad.average() > 0.0 {
            triad.intensity()
        } else {
            -triad.intensity()
        };
        for name in [triangle.first, triangle.second] {
            if let Some(character) = graph.character_mut(name) {
                character.emotions.shift(shift);
            }
        }

        debug!(
            source = triangle.first,
            target = triangle.second,
            via = triangle.hub,
            probability,
            "relationship formed"
        );
        events.push(SimEvent::RelationshipFormed {
            tick,
            source: triangle.first.to_string(),
            target: triangle.second.to_string(),
            via: triangle.hub.to_string(),
            probability,
            triad: triad.into(),
        });
        true
    }

    /// Chance that the two partners of a common hub form a relationship
    pub fn formation_probability(
        &self,
        first: &TriadVector,
        second: &TriadVector,
        compatibility: f64,
    ) -> f64 {
        let c = &self.config;
        let mean_intensity = (first.intensity() + second.intensity()) / 2.0;
        let polarity = self.polarity_multiplier(first.average(), second.average());
        (c.formation_probability * mean_intensity * (1.0 + compatibility) * polarity)
            .max(c.min_formation_probability)
            .min(c.max_formation_probability)
    }

    /// Friend of a friend is welcome, enemy of an enemy less so, mixed signals least
    pub fn polarity_multiplier(&self, first_average: f64, second_average: f64) -> f64 {
        let c = &self.config;
        let t = c.polarity_threshold;
        if first_average > t && second_average > t {
            c.both_positive_multiplier
        } else if first_average > t && second_average < -t {
            c.positive_negative_multiplier
        } else if first_average < -t && second_average > t {
            c.negative_positive_multiplier
        } else if first_average < -t && second_average < -t {
            c.both_negative_multiplier
        } else {
            1.0
        }
    }

    fn blended_triad<R: Rng + ?Sized>(
        &self,
        first: &TriadVector,
        second: &TriadVector,
        compatibility: f64,
        rng: &mut R,
    ) -> TriadVector {
        let c = &self.config;
        let blend = |a: f64, b: f64| a * c.first_blend_weight + b * c.second_blend_weight;
        let privacy = blend(first.privacy, second.privacy);
        let commitment = blend(first.commitment, second.commitment);
        let passion = blend(first.passion, second.passion);

        let mix = (compatibility - NEUTRAL_COMPATIBILITY) * c.compatibility_mix_weight
            + privacy * c.privacy_mix_weight
            + commitment * c.commitment_mix_weight
            + passion * c.passion_mix_weight;
        let jitter = if c.formation_jitter > 0.0 {
            rng.gen_range(-c.formation_jitter..=c.formation_jitter)
        } else {
            0.0
        };

        TriadVector::new(privacy + mix + jitter, commitment + mix + jitter, passion + mix + jitter)
    }

    /// Every relationship drifts a little toward what the pair's
    /// personalities would settle on
    fn decay_relationships<R: Rng + ?Sized>(&self, graph: &mut SocialGraph, rng: &mut R) -> usize {
        let c = &self.config;
        let compatibilities: Vec<f64> = graph
            .relationships()
            .iter()
            .map(|r| {
                graph
                    .compatibility(r.source(), r.target())
                    .unwrap_or(NEUTRAL_COMPATIBILITY)
            })
            .collect();

        let rates = [c.privacy_decay_rate, c.commitment_decay_rate, c.passion_decay_rate];
        for (relationship, compat) in graph.relationships_mut().iter_mut().zip(compatibilities) {
            let jitter = if c.decay_jitter > 0.0 {
                rng.gen_range(-c.decay_jitter..=c.decay_jitter)
            } else {
                0.0
            };
            let change = ((compat - NEUTRAL_COMPATIBILITY) * c.decay_compatibility_weight + jitter)
                .clamp(-1.0, 1.0);
            let mut values = relationship.triad.as_array();
            for (value, rate) in values.iter_mut().zip(rates) {
                *value += rate * (change - *value);
            }
            relationship.triad = TriadVector::from_array(values);
        }
        graph.relationship_count()
    }

    /// Emotions relax each tick, then lean toward the character's overall
    /// sentiment when that sentiment is strong
    fn decay_emotions(&self, graph: &mut SocialGraph) -> usize {
        let c = &self.config;
        let sentiments: Vec<Option<f64>> = graph
            .characters()
            .iter()
            .map(|ch| graph.mean_sentiment(ch.name()))
            .collect();

        for (name, sentiment) in graph.character_names().into_iter().zip(sentiments) {
            let Some(character) = graph.character_mut(&name) else {
                continue;
            };
            character.emotions.shift(c.emotion_decay);
            if let Some(mean) = sentiment {
                if mean > c.positive_sentiment_threshold || mean < c.negative_sentiment_threshold {
                    character.emotions.shift(mean);
                }
            }
        }
        graph.character_count()
    }
}

/// System: run one evolution step against the world's graph
pub fn evolve_system(
    manager: Res<EvolutionManager>,
    mut graph: ResMut<SocialGraph>,
    mut rng: ResMut<SimRng>,
    clock: Res<TickClock>,
    mut events: ResMut<PendingEvents>,
    mut report: ResMut<StepReport>,
) {
    report.evolution = manager.evolve(&mut graph, &mut rng.0, clock.current_tick(), &mut events);
}

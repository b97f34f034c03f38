//! Scenario Files
//!
//! TOML description of a starting world and the interactions to trigger
//! while it runs.
//!
//! ```toml
//! [[characters]]
//! name = "Alice"
//! personality = { agreeableness = 0.2, extraversion = 0.1 }
//! emotions = { happiness = 0.2, fear = 0.8 }
//!
//! [[relationships]]
//! source = "Alice"
//! target = "Jacky"
//! preset = "unfriendly"
//! distance = 2
//!
//! [[interactions]]
//! tick = 3
//! actor = "Alice"
//! target = "Jacky"
//! template = "insulted"
//! scope = "private"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::components::{EmotionVector, InteractionId, InteractionKind, Scope, TriadPreset, TriadVector};
use crate::error::{ConfigError, InteractionError, SetupError};
use crate::simulation::Simulation;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub characters: Vec<CharacterSpec>,
    pub relationships: Vec<RelationshipSpec>,
    pub interactions: Vec<ScheduledInteraction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CharacterSpec {
    pub name: String,
    /// Unset traits are drawn at random
    #[serde(default)]
    pub personality: PersonalitySpec,
    #[serde(default)]
    pub emotions: EmotionVector,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct PersonalitySpec {
    pub openness: Option<f64>,
    pub conscientiousness: Option<f64>,
    pub extraversion: Option<f64>,
    pub agreeableness: Option<f64>,
    pub neuroticism: Option<f64>,
}

impl PersonalitySpec {
    pub fn as_partial(&self) -> [Option<f64>; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }
}

fn default_distance() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelationshipSpec {
    pub source: String,
    pub target: String,
    /// Starting triad; explicit axes below override it
    #[serde(default)]
    pub preset: Option<TriadPreset>,
    #[serde(default)]
    pub privacy: Option<f64>,
    #[serde(default)]
    pub commitment: Option<f64>,
    #[serde(default)]
    pub passion: Option<f64>,
    #[serde(default = "default_distance")]
    pub distance: u32,
}

impl RelationshipSpec {
    pub fn triad(&self) -> TriadVector {
        let base = self.preset.map(|p| p.triad()).unwrap_or_default();
        TriadVector::new(
            self.privacy.unwrap_or(base.privacy),
            self.commitment.unwrap_or(base.commitment),
            self.passion.unwrap_or(base.passion),
        )
    }
}

fn default_scope() -> String {
    Scope::Secret.to_string()
}

/// An interaction to trigger once the given tick has completed.
/// Tick 0 fires before the first step.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduledInteraction {
    pub tick: u64,
    pub actor: String,
    pub target: String,
    pub template: String,
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl ScheduledInteraction {
    pub fn kind(&self) -> Result<InteractionKind, InteractionError> {
        self.template.parse()
    }

    pub fn scope(&self) -> Result<Scope, InteractionError> {
        self.scope.parse()
    }

    pub fn trigger(&self, sim: &mut Simulation) -> Result<InteractionId, InteractionError> {
        let kind = self.kind()?;
        let scope = self.scope()?;
        sim.trigger_kind(&self.actor, &self.target, kind, scope)
    }
}

impl Scenario {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reject unknown templates and scopes before anything runs
    pub fn validate(&self) -> Result<(), SetupError> {
        for interaction in &self.interactions {
            interaction.kind()?;
            interaction.scope()?;
        }
        Ok(())
    }

    /// Add the scenario's characters and relationships to `sim`
    pub fn apply(&self, sim: &mut Simulation) -> Result<(), SetupError> {
        self.validate()?;
        for spec in &self.characters {
            let emotions = EmotionVector::from_array(spec.emotions.as_array());
            sim.add_character_with(&spec.name, spec.personality.as_partial(), emotions)?;
        }
        for spec in &self.relationships {
            sim.add_relationship(&spec.source, &spec.target, spec.triad(), spec.distance)?;
        }
        info!(
            characters = self.characters.len(),
            relationships = self.relationships.len(),
            interactions = self.interactions.len(),
            "scenario applied"
        );
        Ok(())
    }

    /// Interactions scheduled for `tick`, in file order
    pub fn interactions_at(&self, tick: u64) -> impl Iterator<Item = &ScheduledInteraction> {
        self.interactions.iter().filter(move |i| i.tick == tick)
    }

    /// Trigger everything scheduled for `tick`. Failures such as a
    /// participant that has since been removed are logged and skipped.
    pub fn trigger_due(&self, sim: &mut Simulation, tick: u64) -> usize {
        let mut triggered = 0;
        for scheduled in self.interactions_at(tick) {
            match scheduled.trigger(sim) {
                Ok(_) => triggered += 1,
                Err(e) => warn!(
                    tick,
                    actor = %scheduled.actor,
                    target = %scheduled.target,
                    "skipped scheduled interaction: {}",
                    e
                ),
            }
        }
        triggered
    }

    /// Last tick with a scheduled interaction
    pub fn last_interaction_tick(&self) -> Option<u64> {
        self.interactions.iter().map(|i| i.tick).max()
    }
}

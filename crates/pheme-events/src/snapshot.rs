//! Snapshot Types
//!
//! Serialization structs for world snapshots.
//!
//! A snapshot captures every character and relationship at a tick so a
//! presentation layer can redraw without touching the engine.

use serde::{Deserialize, Serialize};

use crate::TriadSnapshot;

/// Generates a snapshot ID with the given sequence number.
pub fn generate_snapshot_id(sequence: u64) -> String {
    format!("snap_{:06}", sequence)
}

/// Big Five personality values
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonalitySnapshot {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

/// Basic emotion values
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmotionSnapshot {
    pub happiness: f64,
    pub sadness: f64,
    pub anger: f64,
    pub fear: f64,
    pub surprise: f64,
    pub disgust: f64,
}

/// Character snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub name: String,
    pub personality: PersonalitySnapshot,
    pub emotions: EmotionSnapshot,
    /// Identifiers of every interaction this character knows about, ascending
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_interactions: Vec<u64>,
}

/// Directed relationship snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    pub source: String,
    pub target: String,
    pub triad: TriadSnapshot,
    pub intensity: f64,
    pub confidence: f64,
    pub label: String,
    pub distance: u32,
}

/// Complete world snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub snapshot_id: String,
    pub tick: u64,
    pub characters: Vec<CharacterSnapshot>,
    pub relationships: Vec<RelationshipSnapshot>,
    /// Diffusion entries still in transit
    #[serde(default)]
    pub pending_diffusions: usize,
}

impl WorldSnapshot {
    pub fn new(snapshot_id: impl Into<String>, tick: u64) -> Self {
        Self {
            snapshot_id: snapshot_id.into(),
            tick,
            characters: Vec::new(),
            relationships: Vec::new(),
            pending_diffusions: 0,
        }
    }

    /// Find a character by name
    pub fn character(&self, name: &str) -> Option<&CharacterSnapshot> {
        self.characters.iter().find(|c| c.name == name)
    }

    /// Find the relationship from `source` to `target`
    pub fn relationship(&self, source: &str, target: &str) -> Option<&RelationshipSnapshot> {
        self.relationships
            .iter()
            .find(|r| r.source == source && r.target == target)
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

//! Event Types
//!
//! Structured records of everything that changes the social graph.
//! One event per line when written as JSONL.

use serde::{Deserialize, Serialize};

/// Sternberg triad values as carried by events and snapshots
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TriadSnapshot {
    pub privacy: f64,
    pub commitment: f64,
    pub passion: f64,
}

impl TriadSnapshot {
    pub fn new(privacy: f64, commitment: f64, passion: f64) -> Self {
        Self {
            privacy,
            commitment,
            passion,
        }
    }
}

/// Why a pending diffusion entry was discarded instead of delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The target had already learned about the interaction
    AlreadyKnown,
    /// The target was removed from the graph while the entry was in transit
    MissingTarget,
}

/// A single simulation event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    CharacterAdded {
        tick: u64,
        name: String,
    },
    CharacterRemoved {
        tick: u64,
        name: String,
        /// Relationships removed along with the character
        relationships_removed: usize,
    },
    CharacterRenamed {
        tick: u64,
        old_name: String,
        new_name: String,
    },
    RelationshipAdded {
        tick: u64,
        source: String,
        target: String,
        triad: TriadSnapshot,
        distance: u32,
    },
    RelationshipRemoved {
        tick: u64,
        source: String,
        target: String,
    },
    /// A relationship created by triadic closure during evolution
    RelationshipFormed {
        tick: u64,
        source: String,
        target: String,
        /// The common acquaintance that closed the triangle
        via: String,
        probability: f64,
        triad: TriadSnapshot,
    },
    InteractionTriggered {
        tick: u64,
        interaction_id: u64,
        actor: String,
        target: String,
        label: String,
        scope: String,
    },
    InteractionDelivered {
        tick: u64,
        interaction_id: u64,
        character: String,
    },
    InteractionDropped {
        tick: u64,
        interaction_id: u64,
        character: String,
        reason: DropReason,
    },
}

impl SimEvent {
    /// Tick at which the event happened
    pub fn tick(&self) -> u64 {
        match self {
            SimEvent::CharacterAdded { tick, .. }
            | SimEvent::CharacterRemoved { tick, .. }
            | SimEvent::CharacterRenamed { tick, .. }
            | SimEvent::RelationshipAdded { tick, .. }
            | SimEvent::RelationshipRemoved { tick, .. }
            | SimEvent::RelationshipFormed { tick, .. }
            | SimEvent::InteractionTriggered { tick, .. }
            | SimEvent::InteractionDelivered { tick, .. }
            | SimEvent::InteractionDropped { tick, .. } => *tick,
        }
    }

    /// Snake-case name of the event variant, matching the serialized `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            SimEvent::CharacterAdded { .. } => "character_added",
            SimEvent::CharacterRemoved { .. } => "character_removed",
            SimEvent::CharacterRenamed { .. } => "character_renamed",
            SimEvent::RelationshipAdded { .. } => "relationship_added",
            SimEvent::RelationshipRemoved { .. } => "relationship_removed",
            SimEvent::RelationshipFormed { .. } => "relationship_formed",
            SimEvent::InteractionTriggered { .. } => "interaction_triggered",
            SimEvent::InteractionDelivered { .. } => "interaction_delivered",
            SimEvent::InteractionDropped { .. } => "interaction_dropped",
        }
    }

    /// Whether the event concerns the given character
    pub fn involves(&self, name: &str) -> bool {
        match self {
            SimEvent::CharacterAdded { name: n, .. } | SimEvent::CharacterRemoved { name: n, .. } => {
                n == name
            }
            SimEvent::CharacterRenamed {
                old_name, new_name, ..
            } => old_name == name || new_name == name,
            SimEvent::RelationshipAdded { source, target, .. }
            | SimEvent::RelationshipRemoved { source, target, .. } => {
                source == name || target == name
            }
            SimEvent::RelationshipFormed {
                source, target, via, ..
            } => source == name || target == name || via == name,
            SimEvent::InteractionTriggered { actor, target, .. } => {
                actor == name || target == name
            }
            SimEvent::InteractionDelivered { character, .. }
            | SimEvent::InteractionDropped { character, .. } => character == name,
        }
    }
}

//! Shared event and snapshot types for the Pheme social simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine emits these records; presentation layers read them back.

pub mod event;
pub mod snapshot;

// Re-export event types
pub use event::{DropReason, SimEvent, TriadSnapshot};

// Re-export snapshot types
pub use snapshot::{
    generate_snapshot_id, CharacterSnapshot, EmotionSnapshot, PersonalitySnapshot,
    RelationshipSnapshot, WorldSnapshot,
};

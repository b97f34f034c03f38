//! Entity components: characters, relationships and interactions.

pub mod character;
pub mod interaction;
pub mod relationship;

/// Clamp an axis value into `[lo, hi]`. NaN and infinities fall back to 0.0.
pub(crate) fn bounded(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        0.0
    }
}

pub use character::{
    Character, EmotionVector, PersonalityVector, EMOTION_SHIFT_WEIGHTS, NEUTRAL_COMPATIBILITY,
};
pub use interaction::{Interaction, InteractionId, InteractionKind, InteractionVector, Scope};
pub use relationship::{Relationship, RelationshipLabel, TriadPreset, TriadVector};

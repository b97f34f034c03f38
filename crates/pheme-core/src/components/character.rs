//! Character Components
//!
//! Characters, their Big Five personality and their basic emotions.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::components::bounded;
use crate::components::interaction::InteractionId;

/// Compatibility returned when either personality has zero magnitude
pub const NEUTRAL_COMPATIBILITY: f64 = 0.5;

/// Per-axis weights for [`EmotionVector::shift`], in field order.
/// Positive weights rise with a positive shift, negative weights fall.
pub const EMOTION_SHIFT_WEIGHTS: [f64; 6] = [1.0, -0.8, -0.6, -0.6, 0.5, -0.4];

/// Big Five personality. Every trait is -1.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PersonalityVector {
    /// Curiosity and taste for novelty vs. routine
    pub openness: f64,
    /// Organisation and discipline vs. impulsiveness
    pub conscientiousness: f64,
    /// Sociability and energy vs. reserve
    pub extraversion: f64,
    /// Cooperation and empathy vs. antagonism
    pub agreeableness: f64,
    /// Tendency toward negative affect vs. emotional stability
    pub neuroticism: f64,
}

impl PersonalityVector {
    pub fn new(
        openness: f64,
        conscientiousness: f64,
        extraversion: f64,
        agreeableness: f64,
        neuroticism: f64,
    ) -> Self {
        Self::from_array([
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        ])
    }

    /// All traits at zero
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn from_array(values: [f64; 5]) -> Self {
        let [o, c, e, a, n] = values.map(|v| bounded(v, -1.0, 1.0));
        Self {
            openness: o,
            conscientiousness: c,
            extraversion: e,
            agreeableness: a,
            neuroticism: n,
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.openness,
            self.conscientiousness,
            self.extraversion,
            self.agreeableness,
            self.neuroticism,
        ]
    }

    /// Uniformly random personality
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_partial([None; 5], rng)
    }

    /// Given traits are clamped, unset traits are drawn from -1.0 to 1.0
    pub fn from_partial<R: Rng + ?Sized>(values: [Option<f64>; 5], rng: &mut R) -> Self {
        Self::from_array(values.map(|v| v.unwrap_or_else(|| rng.gen_range(-1.0..=1.0))))
    }

    pub fn magnitude(&self) -> f64 {
        self.as_array().iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    /// Cosine similarity of the two personalities, -1.0 to 1.0.
    /// Zero-magnitude personalities are neutral (0.5) rather than undefined.
    pub fn compatibility(&self, other: &PersonalityVector) -> f64 {
        let norm = self.magnitude() * other.magnitude();
        if norm == 0.0 {
            return NEUTRAL_COMPATIBILITY;
        }
        let dot: f64 = self
            .as_array()
            .iter()
            .zip(other.as_array().iter())
            .map(|(a, b)| a * b)
            .sum();
        (dot / norm).clamp(-1.0, 1.0)
    }
}

/// Basic emotions. Every value is 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionVector {
    pub happiness: f64,
    pub sadness: f64,
    pub anger: f64,
    pub fear: f64,
    pub surprise: f64,
    pub disgust: f64,
}

impl EmotionVector {
    pub fn new(
        happiness: f64,
        sadness: f64,
        anger: f64,
        fear: f64,
        surprise: f64,
        disgust: f64,
    ) -> Self {
        Self::from_array([happiness, sadness, anger, fear, surprise, disgust])
    }

    pub fn from_array(values: [f64; 6]) -> Self {
        let [h, sa, an, f, su, d] = values.map(|v| bounded(v, 0.0, 1.0));
        Self {
            happiness: h,
            sadness: sa,
            anger: an,
            fear: f,
            surprise: su,
            disgust: d,
        }
    }

    pub fn as_array(&self) -> [f64; 6] {
        [
            self.happiness,
            self.sadness,
            self.anger,
            self.fear,
            self.surprise,
            self.disgust,
        ]
    }

    /// Relax the emotions by `amount`: positive amounts lift happiness and
    /// surprise and ease the negative emotions, negative amounts do the reverse.
    pub fn shift(&mut self, amount: f64) {
        let mut values = self.as_array();
        for (value, weight) in values.iter_mut().zip(EMOTION_SHIFT_WEIGHTS) {
            *value += amount * weight;
        }
        *self = Self::from_array(values);
    }
}

/// A character in the social graph
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    name: String,
    pub personality: PersonalityVector,
    pub emotions: EmotionVector,
    /// Interactions this character has learned about
    known_interactions: HashSet<InteractionId>,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        personality: PersonalityVector,
        emotions: EmotionVector,
    ) -> Self {
        Self {
            name: name.into(),
            personality: PersonalityVector::from_array(personality.as_array()),
            emotions: EmotionVector::from_array(emotions.as_array()),
            known_interactions: HashSet::new(),
        }
    }

    /// Character with neutral personality and no emotions
    pub fn neutral(name: impl Into<String>) -> Self {
        Self::new(name, PersonalityVector::neutral(), EmotionVector::default())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn knows(&self, interaction: InteractionId) -> bool {
        self.known_interactions.contains(&interaction)
    }

    /// Record an interaction; returns false if it was already known
    pub fn learn(&mut self, interaction: InteractionId) -> bool {
        self.known_interactions.insert(interaction)
    }

    /// Known interaction ids in ascending order
    pub fn known_interactions(&self) -> Vec<InteractionId> {
        let mut ids: Vec<InteractionId> = self.known_interactions.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn known_count(&self) -> usize {
        self.known_interactions.len()
    }
}

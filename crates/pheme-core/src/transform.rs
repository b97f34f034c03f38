//! Affect Transforms
//!
//! Fixed coefficient matrices mapping an interaction vector, modulated by
//! personality, onto emotion and relationship changes.
//!
//! Direct updates apply to the two participants. Indirect updates apply to
//! observers who know a participant and are attenuated.

use serde::{Deserialize, Serialize};

use crate::components::{EmotionVector, InteractionVector, PersonalityVector, TriadVector};

/// Scale applied to the authored base matrices by [`TransformConfig::default`]
pub const DEFAULT_MATRIX_SCALE: f64 = 0.3;

/// Interaction (agency, communion, intensity, contact, valence) to emotion
const BASE_EMOTION_MATRIX: [[f64; 5]; 6] = [
    [0.3, 0.5, 0.2, 0.1, 0.8],    // happiness
    [0.1, -0.4, 0.1, 0.0, -0.7],  // sadness
    [0.4, -0.5, 0.3, 0.2, -0.5],  // anger
    [0.3, -0.3, 0.2, 0.1, -0.4],  // fear
    [0.2, 0.3, 0.5, 0.3, 0.0],    // surprise
    [-0.1, -0.5, 0.1, 0.0, -0.6], // disgust
];

/// Personality (O, C, E, A, N) to per-emotion sensitivity
const BASE_PERSONALITY_MODULATION: [[f64; 5]; 6] = [
    [0.2, -0.1, 0.4, 0.3, -0.5],
    [0.0, 0.1, -0.3, -0.2, 0.6],
    [-0.1, -0.2, 0.1, -0.5, 0.5],
    [0.0, 0.2, -0.2, -0.1, 0.7],
    [0.4, 0.0, 0.2, 0.0, 0.2],
    [-0.2, 0.1, -0.1, -0.4, 0.3],
];

/// Interaction to triad (privacy, commitment, passion)
const BASE_RELATIONSHIP_MATRIX: [[f64; 5]; 3] = [
    [0.1, 0.4, 0.2, 0.3, 0.5],
    [0.2, 0.5, 0.1, 0.1, 0.6],
    [0.3, 0.3, 0.5, 0.4, 0.4],
];

/// Personality to per-axis relationship sensitivity
const BASE_RELATIONSHIP_COMPATIBILITY: [[f64; 5]; 3] = [
    [0.3, 0.1, 0.2, 0.4, -0.2],
    [0.0, 0.5, 0.1, 0.3, -0.3],
    [0.2, -0.1, 0.4, 0.1, 0.0],
];

/// Coefficients for every affect computation.
///
/// Immutable once handed to the engine; tests swap in their own values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformConfig {
    pub emotion_matrix: [[f64; 5]; 6],
    pub personality_modulation: [[f64; 5]; 6],
    pub relationship_matrix: [[f64; 5]; 3],
    pub relationship_compatibility: [[f64; 5]; 3],
    pub indirect_emotion_attenuation: f64,
    pub indirect_relationship_attenuation: f64,
    pub direct_emotion_strength: f64,
    pub indirect_emotion_strength: f64,
    pub direct_relationship_strength: f64,
    pub indirect_relationship_strength: f64,
    /// Valence factor for the actor's own perception of what they did
    pub actor_valence_attenuation: f64,
    pub compatibility_weight: f64,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self::scaled(DEFAULT_MATRIX_SCALE)
    }
}

fn scale<const R: usize>(matrix: [[f64; 5]; R], factor: f64) -> [[f64; 5]; R] {
    matrix.map(|row| row.map(|v| v * factor))
}

fn mat_vec<const R: usize>(matrix: &[[f64; 5]; R], v: &[f64; 5]) -> [f64; R] {
    let mut out = [0.0; R];
    for (value, row) in out.iter_mut().zip(matrix) {
        *value = row.iter().zip(v).map(|(m, x)| m * x).sum();
    }
    out
}

impl TransformConfig {
    /// Base matrices multiplied by `factor`, default scalars
    pub fn scaled(factor: f64) -> Self {
        Self {
            emotion_matrix: scale(BASE_EMOTION_MATRIX, factor),
            personality_modulation: scale(BASE_PERSONALITY_MODULATION, factor),
            relationship_matrix: scale(BASE_RELATIONSHIP_MATRIX, factor),
            relationship_compatibility: scale(BASE_RELATIONSHIP_COMPATIBILITY, factor),
            indirect_emotion_attenuation: 0.3,
            indirect_relationship_attenuation: 0.2,
            direct_emotion_strength: 0.5,
            indirect_emotion_strength: 0.3,
            direct_relationship_strength: 0.3,
            indirect_relationship_strength: 0.2,
            actor_valence_attenuation: 0.5,
            compatibility_weight: 0.5,
        }
    }

    /// The interaction as the actor experiences it
    pub fn perceived_by_actor(&self, interaction: &InteractionVector) -> InteractionVector {
        interaction.with_valence_scaled(self.actor_valence_attenuation)
    }

    /// New emotions for a participant
    pub fn direct_emotions(
        &self,
        current: &EmotionVector,
        interaction: &InteractionVector,
        personality: &PersonalityVector,
    ) -> EmotionVector {
        self.emotions(current, interaction, personality, 1.0, self.direct_emotion_strength)
    }

    /// New emotions for an observer
    pub fn indirect_emotions(
        &self,
        current: &EmotionVector,
        interaction: &InteractionVector,
        personality: &PersonalityVector,
    ) -> EmotionVector {
        self.emotions(
            current,
            interaction,
            personality,
            self.indirect_emotion_attenuation,
            self.indirect_emotion_strength,
        )
    }

    fn emotions(
        &self,
        current: &EmotionVector,
        interaction: &InteractionVector,
        personality: &PersonalityVector,
        attenuation: f64,
        strength: f64,
    ) -> EmotionVector {
        let delta = mat_vec(&self.emotion_matrix, &interaction.as_array());
        let modulation = mat_vec(&self.personality_modulation, &personality.as_array());
        let mut next = current.as_array();
        for ((value, d), m) in next.iter_mut().zip(delta).zip(modulation) {
            *value += d * attenuation * (1.0 + m * strength);
        }
        EmotionVector::from_array(next)
    }

    /// New triad for a participant's relationship toward the other participant
    pub fn direct_relationship(
        &self,
        current: &TriadVector,
        interaction: &InteractionVector,
        source: &PersonalityVector,
        target: &PersonalityVector,
    ) -> TriadVector {
        let delta = mat_vec(&self.relationship_matrix, &interaction.as_array());
        let from_source = mat_vec(&self.relationship_compatibility, &source.as_array());
        let from_target = mat_vec(&self.relationship_compatibility, &target.as_array());
        let mut next = current.as_array();
        for (k, value) in next.iter_mut().enumerate() {
            let compat = (from_source[k] + from_target[k]) * self.compatibility_weight;
            *value += delta[k] * (1.0 + compat * self.direct_relationship_strength);
        }
        TriadVector::from_array(next)
    }

    /// New triad for an observer's relationship toward a participant
    pub fn indirect_relationship(
        &self,
        current: &TriadVector,
        interaction: &InteractionVector,
        observer: &PersonalityVector,
    ) -> TriadVector {
        let delta = mat_vec(&self.relationship_matrix, &interaction.as_array());
        let modulation = mat_vec(&self.relationship_compatibility, &observer.as_array());
        let mut next = current.as_array();
        for ((value, d), m) in next.iter_mut().zip(delta).zip(modulation) {
            *value += d
                * self.indirect_relationship_attenuation
                * (1.0 + m * self.indirect_relationship_strength);
        }
        TriadVector::from_array(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::InteractionKind;

    #[test]
    fn test_default_matrices_are_scaled() {
        let config = TransformConfig::default();
        assert!((config.emotion_matrix[0][4] - 0.24).abs() < 1e-12);
        assert!((config.relationship_compatibility[1][1] - 0.15).abs() < 1e-12);
        assert_eq!(config.indirect_emotion_attenuation, 0.3);
    }

    #[test]
    fn test_zero_emotion_matrix_leaves_emotions_unchanged() {
        let config = TransformConfig {
            emotion_matrix: [[0.0; 5]; 6],
            ..TransformConfig::default()
        };
        let current = EmotionVector::new(0.2, 0.4, 0.1, 0.0, 0.9, 0.3);
        let personality = PersonalityVector::new(0.6, -0.2, 0.8, 0.1, -0.9);
        let helped = InteractionKind::Helped.vector();

        assert_eq!(config.direct_emotions(&current, &helped, &personality), current);
        assert_eq!(config.indirect_emotions(&current, &helped, &personality), current);
    }

    #[test]
    fn test_helped_lifts_neutral_participant() {
        let config = TransformConfig::default();
        let personality = PersonalityVector::neutral();
        let helped = InteractionKind::Helped.vector();

        let emotions = config.direct_emotions(&EmotionVector::default(), &helped, &personality);
        assert!((emotions.happiness - 0.345).abs() < 1e-9);
        assert_eq!(emotions.sadness, 0.0);

        let triad = config.direct_relationship(&TriadVector::neutral(), &helped, &personality, &personality);
        assert!((triad.privacy - 0.252).abs() < 1e-9);
        assert!(triad.commitment > 0.0);
        assert!(triad.passion > 0.0);
    }

    #[test]
    fn test_indirect_is_attenuated() {
        let config = TransformConfig::default();
        let personality = PersonalityVector::neutral();
        let helped = InteractionKind::Helped.vector();
        let start = TriadVector::neutral();

        let direct = config.direct_relationship(&start, &helped, &personality, &personality);
        let indirect = config.indirect_relationship(&start, &helped, &personality);
        assert!(indirect.privacy > 0.0);
        assert!(indirect.privacy < direct.privacy);
        assert!((indirect.privacy - direct.privacy * 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_results_stay_in_bounds() {
        let config = TransformConfig::scaled(5.0);
        let extreme = PersonalityVector::new(1.0, -1.0, 1.0, -1.0, 1.0);
        let killed = InteractionKind::Killed.vector();
        let emotions = config.direct_emotions(&EmotionVector::default(), &killed, &extreme);
        for v in emotions.as_array() {
            assert!((0.0..=1.0).contains(&v));
        }
        let triad = config.direct_relationship(&TriadVector::new(0.9, 0.9, 0.9), &killed, &extreme, &extreme);
        for v in triad.as_array() {
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_actor_perception_halves_valence() {
        let config = TransformConfig::default();
        let perceived = config.perceived_by_actor(&InteractionKind::Killed.vector());
        assert_eq!(perceived.valence, -0.5);
    }
}

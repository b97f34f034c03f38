//! Interaction Components
//!
//! Discrete interactions between two characters and the fixed template catalog.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::components::bounded;
use crate::error::InteractionError;

/// Stable identifier of an interaction, unique within one simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InteractionId(pub u64);

impl fmt::Display for InteractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "int_{:08}", self.0)
    }
}

/// Interpersonal circumplex vector describing what an interaction felt like.
///
/// Agency, communion and valence are bipolar (-1.0 to 1.0); intensity and
/// physical contact are unipolar (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InteractionVector {
    pub agency: f64,
    pub communion: f64,
    pub intensity: f64,
    pub physical_contact: f64,
    pub valence: f64,
}

/// Whether each axis is bipolar, in field order
const BIPOLAR_AXES: [bool; 5] = [true, true, false, false, true];

fn axis_range(bipolar: bool) -> (f64, f64) {
    if bipolar {
        (-1.0, 1.0)
    } else {
        (0.0, 1.0)
    }
}

impl InteractionVector {
    pub fn new(agency: f64, communion: f64, intensity: f64, physical_contact: f64, valence: f64) -> Self {
        Self::from_array([agency, communion, intensity, physical_contact, valence])
    }

    pub fn from_array(values: [f64; 5]) -> Self {
        let mut clamped = values;
        for (value, bipolar) in clamped.iter_mut().zip(BIPOLAR_AXES) {
            let (lo, hi) = axis_range(bipolar);
            *value = bounded(*value, lo, hi);
        }
        let [agency, communion, intensity, physical_contact, valence] = clamped;
        Self {
            agency,
            communion,
            intensity,
            physical_contact,
            valence,
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.agency,
            self.communion,
            self.intensity,
            self.physical_contact,
            self.valence,
        ]
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_partial([None; 5], rng)
    }

    /// Given axes are clamped to their range, unset axes are drawn uniformly from it
    pub fn from_partial<R: Rng + ?Sized>(values: [Option<f64>; 5], rng: &mut R) -> Self {
        let mut filled = [0.0; 5];
        for ((slot, value), bipolar) in filled.iter_mut().zip(values).zip(BIPOLAR_AXES) {
            let (lo, hi) = axis_range(bipolar);
            *slot = value.unwrap_or_else(|| rng.gen_range(lo..=hi));
        }
        Self::from_array(filled)
    }

    /// Copy with the valence scaled by `factor`
    pub fn with_valence_scaled(&self, factor: f64) -> Self {
        Self {
            valence: (self.valence * factor).clamp(-1.0, 1.0),
            ..*self
        }
    }
}

/// Named interaction templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Killed,
    LaughedAt,
    Helped,
    Kissed,
    Insulted,
    Hugged,
    Threatened,
    Praised,
    Ignored,
    Comforted,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 10] = [
        InteractionKind::Killed,
        InteractionKind::LaughedAt,
        InteractionKind::Helped,
        InteractionKind::Kissed,
        InteractionKind::Insulted,
        InteractionKind::Hugged,
        InteractionKind::Threatened,
        InteractionKind::Praised,
        InteractionKind::Ignored,
        InteractionKind::Comforted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Killed => "killed",
            InteractionKind::LaughedAt => "laughed_at",
            InteractionKind::Helped => "helped",
            InteractionKind::Kissed => "kissed",
            InteractionKind::Insulted => "insulted",
            InteractionKind::Hugged => "hugged",
            InteractionKind::Threatened => "threatened",
            InteractionKind::Praised => "praised",
            InteractionKind::Ignored => "ignored",
            InteractionKind::Comforted => "comforted",
        }
    }

    /// Fixed circumplex vector for this template
    pub fn vector(&self) -> InteractionVector {
        let v = match self {
            InteractionKind::Killed => [0.9, -0.9, 0.8, 0.9, -1.0],
            InteractionKind::LaughedAt => [0.5, -0.4, 0.6, 0.1, -0.3],
            InteractionKind::Helped => [0.3, 0.8, 0.4, 0.2, 0.7],
            InteractionKind::Kissed => [0.2, 0.7, 0.6, 0.9, 0.8],
            InteractionKind::Insulted => [0.6, -0.7, 0.7, 0.0, -0.6],
            InteractionKind::Hugged => [0.1, 0.9, 0.5, 0.8, 0.6],
            InteractionKind::Threatened => [0.8, -0.6, 0.7, 0.2, -0.7],
            InteractionKind::Praised => [0.2, 0.6, 0.4, 0.0, 0.5],
            InteractionKind::Ignored => [-0.2, -0.3, 0.1, 0.0, -0.2],
            InteractionKind::Comforted => [0.1, 0.8, 0.3, 0.4, 0.7],
        };
        InteractionVector::from_array(v)
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = InteractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        InteractionKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| InteractionError::UnknownTemplate(s.to_string()))
    }
}

/// How far knowledge of a triggered interaction spreads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Only the two participants know
    #[default]
    Secret,
    /// Spreads by word of mouth along relationships
    Private,
    /// Everyone learns at once
    Public,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Secret => "secret",
            Scope::Private => "private",
            Scope::Public => "public",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = InteractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "secret" => Ok(Scope::Secret),
            "private" => Ok(Scope::Private),
            "public" => Ok(Scope::Public),
            _ => Err(InteractionError::UnknownScope(s.to_string())),
        }
    }
}

/// A single interaction from `actor` toward `target`.
///
/// Participants are referenced by name only; the graph owns the characters.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub id: InteractionId,
    pub actor: String,
    pub target: String,
    pub label: String,
    pub tick: u64,
    pub vector: InteractionVector,
}

impl Interaction {
    pub fn new(
        id: InteractionId,
        actor: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
        tick: u64,
        vector: InteractionVector,
    ) -> Self {
        Self {
            id,
            actor: actor.into(),
            target: target.into(),
            label: label.into(),
            tick,
            vector,
        }
    }

    /// Interaction built from a catalog template
    pub fn from_kind(
        id: InteractionId,
        kind: InteractionKind,
        actor: impl Into<String>,
        target: impl Into<String>,
        tick: u64,
    ) -> Self {
        Self::new(id, actor, target, kind.as_str(), tick, kind.vector())
    }

    pub fn involves(&self, name: &str) -> bool {
        self.actor == name || self.target == name
    }

    /// Point participant references at a renamed character
    pub(crate) fn rename_participant(&mut self, old: &str, new: &str) {
        if self.actor == old {
            self.actor = new.to_string();
        }
        if self.target == old {
            self.target = new.to_string();
        }
    }
}

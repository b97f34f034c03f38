//! Relationship Components
//!
//! Directed relationships described by Sternberg's triangle of love.
//!
//! Intensity, confidence and label are derived from the triad on every
//! read, so they always reflect the current values.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::components::bounded;

/// Privacy, commitment and passion, each -1.0 to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TriadVector {
    pub privacy: f64,
    pub commitment: f64,
    pub passion: f64,
}

impl TriadVector {
    pub fn new(privacy: f64, commitment: f64, passion: f64) -> Self {
        Self::from_array([privacy, commitment, passion])
    }

    /// All axes at zero
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn from_array(values: [f64; 3]) -> Self {
        let [privacy, commitment, passion] = values.map(|v| bounded(v, -1.0, 1.0));
        Self {
            privacy,
            commitment,
            passion,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.privacy, self.commitment, self.passion]
    }

    /// Signed mean of the three axes
    pub fn average(&self) -> f64 {
        (self.privacy + self.commitment + self.passion) / 3.0
    }

    /// Mean of the absolute axes, 0.0 to 1.0
    pub fn intensity(&self) -> f64 {
        (self.privacy.abs() + self.commitment.abs() + self.passion.abs()) / 3.0
    }

    /// How sure the pair is about each other, 0.0 to 100.0
    pub fn confidence(&self) -> f64 {
        let base = (self.privacy + self.commitment) / 2.0;
        let value = if base < 0.0 {
            (20.0 + base * 20.0).max(0.0)
        } else {
            20.0 + base * 80.0
        };
        value.clamp(0.0, 100.0)
    }

    pub fn label(&self) -> RelationshipLabel {
        let average = self.average();
        if average > 0.6 {
            RelationshipLabel::Love
        } else if average > 0.3 {
            if self.commitment > self.passion {
                RelationshipLabel::CloseFriend
            } else {
                RelationshipLabel::BuddingLove
            }
        } else if average > 0.1 {
            if self.commitment > 0.2 {
                RelationshipLabel::CloseColleague
            } else {
                RelationshipLabel::Acquaintance
            }
        } else if average > -0.1 {
            RelationshipLabel::Neutral
        } else if average > -0.3 {
            if self.passion < -0.2 {
                RelationshipLabel::Rivalry
            } else {
                RelationshipLabel::Disagreement
            }
        } else if average > -0.6 {
            RelationshipLabel::Hostility
        } else {
            RelationshipLabel::Hatred
        }
    }
}

/// Named starting points for hand-authored relationships
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriadPreset {
    Lovely,
    Friendly,
    Family,
    Professional,
    Unfriendly,
}

impl TriadPreset {
    pub fn triad(&self) -> TriadVector {
        match self {
            TriadPreset::Lovely => TriadVector::new(0.8, 0.7, 0.9),
            TriadPreset::Friendly => TriadVector::new(0.6, 0.5, 0.1),
            TriadPreset::Family => TriadVector::new(0.7, 0.8, 0.0),
            TriadPreset::Professional => TriadVector::new(0.1, 0.6, 0.0),
            TriadPreset::Unfriendly => TriadVector::new(-0.5, -0.3, -0.6),
        }
    }
}

/// Descriptive label derived from a triad
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationshipLabel {
    Love,
    CloseFriend,
    BuddingLove,
    CloseColleague,
    Acquaintance,
    Neutral,
    Rivalry,
    Disagreement,
    Hostility,
    Hatred,
}

impl RelationshipLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipLabel::Love => "Love",
            RelationshipLabel::CloseFriend => "Close friend",
            RelationshipLabel::BuddingLove => "Budding love",
            RelationshipLabel::CloseColleague => "Close colleague",
            RelationshipLabel::Acquaintance => "Acquaintance",
            RelationshipLabel::Neutral => "Neutral",
            RelationshipLabel::Rivalry => "Rivalry",
            RelationshipLabel::Disagreement => "Disagreement",
            RelationshipLabel::Hostility => "Hostility",
            RelationshipLabel::Hatred => "Hatred",
        }
    }
}

impl fmt::Display for RelationshipLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed relationship from `source` to `target`
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    source: String,
    target: String,
    pub triad: TriadVector,
    /// Ticks needed for news to cross this edge
    distance: u32,
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        triad: TriadVector,
        distance: u32,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            triad: TriadVector::from_array(triad.as_array()),
            distance: distance.max(1),
        }
    }

    pub fn neutral(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(source, target, TriadVector::neutral(), 1)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn distance(&self) -> u32 {
        self.distance
    }

    /// Set the informational distance; zero is raised to one
    pub fn set_distance(&mut self, distance: u32) {
        self.distance = distance.max(1);
    }

    pub fn connects(&self, source: &str, target: &str) -> bool {
        self.source == source && self.target == target
    }

    pub fn touches(&self, name: &str) -> bool {
        self.source == name || self.target == name
    }

    pub fn intensity(&self) -> f64 {
        self.triad.intensity()
    }

    pub fn confidence(&self) -> f64 {
        self.triad.confidence()
    }

    pub fn label(&self) -> RelationshipLabel {
        self.triad.label()
    }

    pub(crate) fn rename_endpoint(&mut self, old: &str, new: &str) {
        if self.source == old {
            self.source = new.to_string();
        }
        if self.target == old {
            self.target = new.to_string();
        }
    }
}

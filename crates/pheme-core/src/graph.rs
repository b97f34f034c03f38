//! Social Graph
//!
//! Owns every character and every directed relationship.
//!
//! Both collections keep insertion order, and every enumeration follows it,
//! so a seeded run visits entities in the same order each time. There is at
//! most one relationship per ordered (source, target) pair, and A -> B says
//! nothing about B -> A.

use bevy_ecs::prelude::*;
use tracing::debug;

use crate::components::{
    Character, EmotionVector, PersonalityVector, Relationship, TriadVector,
};
use crate::error::GraphError;

#[derive(Resource, Debug, Default, Clone)]
pub struct SocialGraph {
    characters: Vec<Character>,
    relationships: Vec<Relationship>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // === CHARACTERS ===

    pub fn add_character(&mut self, character: Character) -> Result<(), GraphError> {
        if self.contains(character.name()) {
            return Err(GraphError::DuplicateCharacter(character.name().to_string()));
        }
        debug!(name = character.name(), "character added");
        self.characters.push(character);
        Ok(())
    }

    /// Remove a character and every relationship touching it.
    /// Returns the character and how many relationships went with it.
    pub fn remove_character(&mut self, name: &str) -> Result<(Character, usize), GraphError> {
        let index = self
            .character_index(name)
            .ok_or_else(|| GraphError::CharacterNotFound(name.to_string()))?;
        let character = self.characters.remove(index);

        let before = self.relationships.len();
        self.relationships.retain(|r| !r.touches(name));
        let removed = before - self.relationships.len();

        debug!(name, relationships_removed = removed, "character removed");
        Ok((character, removed))
    }

    /// Rename a character, carrying its state and every incident relationship
    pub fn rename_character(&mut self, old: &str, new: &str) -> Result<(), GraphError> {
        if old == new {
            return if self.contains(old) {
                Ok(())
            } else {
                Err(GraphError::CharacterNotFound(old.to_string()))
            };
        }
        if self.contains(new) {
            return Err(GraphError::DuplicateCharacter(new.to_string()));
        }
        let character = self
            .character_mut(old)
            .ok_or_else(|| GraphError::CharacterNotFound(old.to_string()))?;
        character.set_name(new);

        for relationship in self.relationships.iter_mut().filter(|r| r.touches(old)) {
            relationship.rename_endpoint(old, new);
        }
        debug!(old, new, "character renamed");
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.character_index(name).is_some()
    }

    pub fn character(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name() == name)
    }

    pub fn character_mut(&mut self, name: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.name() == name)
    }

    /// Characters in insertion order
    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn character_names(&self) -> Vec<String> {
        self.characters.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn set_personality(
        &mut self,
        name: &str,
        personality: PersonalityVector,
    ) -> Result<(), GraphError> {
        let character = self
            .character_mut(name)
            .ok_or_else(|| GraphError::CharacterNotFound(name.to_string()))?;
        character.personality = PersonalityVector::from_array(personality.as_array());
        Ok(())
    }

    pub fn set_emotions(&mut self, name: &str, emotions: EmotionVector) -> Result<(), GraphError> {
        let character = self
            .character_mut(name)
            .ok_or_else(|| GraphError::CharacterNotFound(name.to_string()))?;
        character.emotions = EmotionVector::from_array(emotions.as_array());
        Ok(())
    }

    /// Personality compatibility of two characters, None if either is missing
    pub fn compatibility(&self, a: &str, b: &str) -> Option<f64> {
        let a = self.character(a)?;
        let b = self.character(b)?;
        Some(a.personality.compatibility(&b.personality))
    }

    fn character_index(&self, name: &str) -> Option<usize> {
        self.characters.iter().position(|c| c.name() == name)
    }

    // === RELATIONSHIPS ===

    /// Insert a relationship, or overwrite the triad and distance of the
    /// existing one for the same ordered pair.
    pub fn add_relationship(
        &mut self,
        source: &str,
        target: &str,
        triad: TriadVector,
        distance: u32,
    ) -> Result<&mut Relationship, GraphError> {
        self.check_endpoints(source, target)?;
        let triad = TriadVector::from_array(triad.as_array());

        if let Some(index) = self.relationship_index(source, target) {
            let relationship = &mut self.relationships[index];
            relationship.triad = triad;
            relationship.set_distance(distance);
            return Ok(relationship);
        }

        debug!(source, target, distance, "relationship added");
        let index = self.relationships.len();
        self.relationships
            .push(Relationship::new(source, target, triad, distance));
        Ok(&mut self.relationships[index])
    }

    /// Get the relationship, creating a neutral one with distance 1 if absent
    pub fn ensure_relationship(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<&mut Relationship, GraphError> {
        match self.relationship_index(source, target) {
            Some(index) => Ok(&mut self.relationships[index]),
            None => self.add_relationship(source, target, TriadVector::neutral(), 1),
        }
    }

    pub fn remove_relationship(
        &mut self,
        source: &str,
        target: &str,
    ) -> Result<Relationship, GraphError> {
        let index = self
            .relationship_index(source, target)
            .ok_or_else(|| GraphError::RelationshipNotFound {
                from: source.to_string(),
                to: target.to_string(),
            })?;
        debug!(source, target, "relationship removed");
        Ok(self.relationships.remove(index))
    }

    pub fn relationship(&self, source: &str, target: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.connects(source, target))
    }

    pub fn relationship_mut(&mut self, source: &str, target: &str) -> Option<&mut Relationship> {
        self.relationships
            .iter_mut()
            .find(|r| r.connects(source, target))
    }

    pub fn has_relationship(&self, source: &str, target: &str) -> bool {
        self.relationship_index(source, target).is_some()
    }

    pub fn set_distance(
        &mut self,
        source: &str,
        target: &str,
        distance: u32,
    ) -> Result<(), GraphError> {
        let relationship = self
            .relationship_mut(source, target)
            .ok_or_else(|| GraphError::RelationshipNotFound {
                from: source.to_string(),
                to: target.to_string(),
            })?;
        relationship.set_distance(distance);
        Ok(())
    }

    /// Relationships in insertion order
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Mutable view of every relationship; endpoints stay fixed
    pub fn relationships_mut(&mut self) -> &mut [Relationship] {
        &mut self.relationships
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Outgoing relationships of `name`
    pub fn relationships_from<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships.iter().filter(move |r| r.source() == name)
    }

    /// Relationships in either direction touching `name`
    pub fn incident_relationships<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships.iter().filter(move |r| r.touches(name))
    }

    /// Characters reachable through an outgoing relationship of `name`
    pub fn neighbors(&self, name: &str) -> Vec<&Character> {
        self.relationships_from(name)
            .filter_map(|r| self.character(r.target()))
            .collect()
    }

    pub fn neighbor_names(&self, name: &str) -> Vec<String> {
        self.relationships_from(name)
            .map(|r| r.target().to_string())
            .collect()
    }

    /// Mean triad average over relationships touching `name`, None if it has none
    pub fn mean_sentiment(&self, name: &str) -> Option<f64> {
        let (sum, count) = self
            .incident_relationships(name)
            .fold((0.0, 0usize), |(sum, count), r| (sum + r.triad.average(), count + 1));
        (count > 0).then(|| sum / count as f64)
    }

    fn relationship_index(&self, source: &str, target: &str) -> Option<usize> {
        self.relationships
            .iter()
            .position(|r| r.connects(source, target))
    }

    fn check_endpoints(&self, source: &str, target: &str) -> Result<(), GraphError> {
        if source == target {
            return Err(GraphError::SelfRelationship(source.to_string()));
        }
        for name in [source, target] {
            if !self.contains(name) {
                return Err(GraphError::CharacterNotFound(name.to_string()));
            }
        }
        Ok(())
    }
}

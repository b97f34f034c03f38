//! Diffusion Queue
//!
//! Word-of-mouth delivery of interactions along relationships, delayed by
//! each edge's informational distance.

use serde::{Deserialize, Serialize};

use crate::components::Interaction;

/// Diffusion behaviour switches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffusionConfig {
    /// Characters pass on what they hear to their own neighbors
    pub rediffuse_on_delivery: bool,
}

/// An interaction travelling toward one character
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDiffusion {
    /// First tick at which the entry may be delivered
    pub arrival_tick: u64,
    pub target: String,
    pub interaction: Interaction,
}

/// Pending entries in scheduling order
#[derive(Debug, Clone, Default)]
pub struct DiffusionQueue {
    entries: Vec<PendingDiffusion>,
}

impl DiffusionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, entry: PendingDiffusion) {
        self.entries.push(entry);
    }

    pub fn drain(&mut self) -> Vec<PendingDiffusion> {
        std::mem::take(&mut self.entries)
    }

    /// Put undelivered entries back ahead of anything scheduled since the drain
    pub fn requeue(&mut self, mut entries: Vec<PendingDiffusion>) {
        entries.append(&mut self.entries);
        self.entries = entries;
    }

    pub fn entries(&self) -> &[PendingDiffusion] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn rename_character(&mut self, old: &str, new: &str) {
        for entry in &mut self.entries {
            if entry.target == old {
                entry.target = new.to_string();
            }
            entry.interaction.rename_participant(old, new);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{InteractionId, InteractionKind};

    fn entry(id: u64, target: &str, arrival_tick: u64) -> PendingDiffusion {
        PendingDiffusion {
            arrival_tick,
            target: target.to_string(),
            interaction: Interaction::from_kind(InteractionId(id), InteractionKind::Praised, "A", "B", 0),
        }
    }

    #[test]
    fn test_requeue_keeps_scheduling_order() {
        let mut queue = DiffusionQueue::new();
        queue.schedule(entry(1, "C", 3));
        queue.schedule(entry(2, "D", 5));

        let drained = queue.drain();
        assert!(queue.is_empty());
        queue.schedule(entry(3, "E", 4));
        queue.requeue(drained);

        let ids: Vec<u64> = queue.entries().iter().map(|e| e.interaction.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_rename_updates_targets_and_participants() {
        let mut queue = DiffusionQueue::new();
        queue.schedule(entry(1, "B", 2));
        queue.rename_character("B", "Bea");
        let e = &queue.entries()[0];
        assert_eq!(e.target, "Bea");
        assert_eq!(e.interaction.target, "Bea");
        assert_eq!(queue.len(), 1);
    }
}

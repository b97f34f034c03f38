//! Event recording and JSONL output.

pub mod logger;

pub use logger::{EventLogger, PendingEvents};
pub use pheme_events::{DropReason, SimEvent, TriadSnapshot};

use crate::components::TriadVector;

impl From<TriadVector> for TriadSnapshot {
    fn from(triad: TriadVector) -> Self {
        TriadSnapshot::new(triad.privacy, triad.commitment, triad.passion)
    }
}

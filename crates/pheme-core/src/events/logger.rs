//! Event Logger
//!
//! JSONL output for the event stream. Each event is one line carrying a
//! `type` tag; lines are only ever appended.

use bevy_ecs::prelude::*;
use pheme_events::SimEvent;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::warn;

/// Event sink with per-kind tallies. Without a file it only counts.
#[derive(Debug, Default)]
pub struct EventLogger {
    sink: Option<BufWriter<File>>,
    tallies: BTreeMap<&'static str, u64>,
}

impl EventLogger {
    /// Start a fresh log at `path`, replacing any previous run
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self::with_file(file))
    }

    /// Continue an existing log at `path`
    pub fn append(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::with_file(file))
    }

    /// Count events without writing them anywhere
    pub fn null() -> Self {
        Self::default()
    }

    fn with_file(file: File) -> Self {
        Self {
            sink: Some(BufWriter::new(file)),
            tallies: BTreeMap::new(),
        }
    }

    pub fn event_count(&self) -> u64 {
        self.tallies.values().sum()
    }

    /// How many events of the given kind (e.g. `interaction_delivered`) were seen
    pub fn count_of(&self, kind: &str) -> u64 {
        self.tallies.get(kind).copied().unwrap_or(0)
    }

    pub fn tallies(&self) -> &BTreeMap<&'static str, u64> {
        &self.tallies
    }

    pub fn log(&mut self, event: &SimEvent) -> std::io::Result<()> {
        if let Some(sink) = self.sink.as_mut() {
            serde_json::to_writer(&mut *sink, event)?;
            sink.write_all(b"\n")?;
        }
        *self.tallies.entry(event.kind()).or_insert(0) += 1;
        Ok(())
    }

    pub fn log_batch(&mut self, events: &[SimEvent]) -> std::io::Result<()> {
        events.iter().try_for_each(|event| self.log(event))
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for EventLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("event log flush failed: {}", e);
        }
    }
}

/// Events produced since the last drain
#[derive(Resource, Debug, Default)]
pub struct PendingEvents {
    events: Vec<SimEvent>,
}

impl PendingEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;

    fn delivered(tick: u64, character: &str) -> SimEvent {
        SimEvent::InteractionDelivered {
            tick,
            interaction_id: 1,
            character: character.to_string(),
        }
    }

    #[test]
    fn test_event_logging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        let mut logger = EventLogger::new(&path).unwrap();
        logger
            .log_batch(&[delivered(1, "Alice"), delivered(2, "Bob")])
            .unwrap();
        logger.flush().unwrap();

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 2);

        let parsed: SimEvent = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(parsed, delivered(2, "Bob"));
    }

    #[test]
    fn test_append_keeps_earlier_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");

        {
            let mut logger = EventLogger::new(&path).unwrap();
            logger.log(&delivered(1, "Alice")).unwrap();
        }
        {
            let mut logger = EventLogger::append(&path).unwrap();
            logger.log(&delivered(2, "Bob")).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_null_logger_still_counts() {
        let mut logger = EventLogger::null();
        logger.log(&delivered(1, "Alice")).unwrap();
        logger.log(&delivered(2, "Bob")).unwrap();
        assert_eq!(logger.event_count(), 2);
        assert_eq!(logger.count_of("interaction_delivered"), 2);
        assert_eq!(logger.count_of("interaction_dropped"), 0);
        assert_eq!(logger.tallies().len(), 1);
    }

    #[test]
    fn test_pending_events() {
        let mut pending = PendingEvents::new();
        assert!(pending.is_empty());

        pending.push(delivered(3, "Carol"));
        assert_eq!(pending.len(), 1);

        let drained = pending.drain();
        assert_eq!(drained.len(), 1);
        assert!(pending.is_empty());
    }
}

//! Sequence detection
//!
//! A [`SequenceDetector`] consumes the chronologically ordered records of one
//! group and keeps every attempt that walks the whole baking protocol. The
//! protocol itself is the pure [`transition`] function; this module only owns
//! the attempt buffer and the saved sequences.
//!
//! One detector serves exactly one group. Detectors share nothing, so groups
//! can be processed on separate threads.

mod state;

pub use state::{transition, Action, State};

use crate::types::{EventRecord, Sequence};

/// Per-group detection context
#[derive(Debug, Default)]
pub struct SequenceDetector {
    state: State,
    current: Sequence,
    saved: Vec<Sequence>,
}

impl SequenceDetector {
    /// Create a detector in the initial state
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a fresh detector over one group's records
    pub fn detect<'a, I>(records: I) -> Vec<Sequence>
    where
        I: IntoIterator<Item = &'a EventRecord>,
    {
        let mut detector = Self::new();
        for record in records {
            detector.process(record.clone());
        }
        detector.finish()
    }

    /// Consume one record
    ///
    /// Records must arrive in non-decreasing timestamp order; the detector
    /// does not check this.
    pub fn process(&mut self, record: EventRecord) {
        let event_id = record.event_id;
        self.current.push(record);

        let (next, action) = transition(self.state, event_id);
        log::trace!(
            "event {} in {} -> {} ({:?})",
            event_id,
            self.state,
            next,
            action
        );

        match action {
            Action::None => {}
            Action::Save => {
                log::debug!("Cycle completed with {} records", self.current.len());
                self.saved.push(std::mem::take(&mut self.current));
            }
            Action::ResetDiscard => {
                self.current.clear();
            }
            Action::ResetRestart => {
                // The restart record was appended last; it alone survives.
                let start = self.current.len() - 1;
                self.current.drain(..start);
            }
        }
        self.state = next;
    }

    /// Take the sequences saved so far, leaving the attempt in progress intact
    pub fn drain_sequences(&mut self) -> Vec<Sequence> {
        std::mem::take(&mut self.saved)
    }

    /// Saved sequences once the stream has ended
    ///
    /// An unfinished attempt is dropped.
    pub fn finish(self) -> Vec<Sequence> {
        if !self.current.is_empty() {
            log::debug!(
                "Dropping unfinished attempt of {} records in {}",
                self.current.len(),
                self.state
            );
        }
        self.saved
    }

    /// Current protocol state
    pub fn state(&self) -> State {
        self.state
    }

    /// Records of the attempt in progress
    pub fn current_attempt(&self) -> &[EventRecord] {
        &self.current
    }

    /// Number of sequences saved and not yet drained
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }
}

//! Decimated snapshot history.

use dr_reactor::ReactorSnapshot;

/// Keeps the initial snapshot, every `every`-th step after it, and the final
/// snapshot.
#[derive(Debug, Clone)]
pub struct Recorder {
    every: u64,
    steps: u64,
    records: Vec<ReactorSnapshot>,
    last_recorded: bool,
}

impl Recorder {
    pub fn new(every: u64, initial: ReactorSnapshot) -> Self {
        Self {
            every: every.max(1),
            steps: 0,
            records: vec![initial],
            last_recorded: true,
        }
    }

    /// Offer the snapshot taken after a step.
    pub fn push(&mut self, snapshot: ReactorSnapshot) {
        self.steps += 1;
        self.last_recorded = self.steps % self.every == 0;
        if self.last_recorded {
            self.records.push(snapshot);
        }
    }

    pub fn records(&self) -> &[ReactorSnapshot] {
        &self.records
    }

    /// Close the record, appending `last` unless it was already kept.
    pub fn finish(mut self, last: ReactorSnapshot) -> Vec<ReactorSnapshot> {
        if !self.last_recorded {
            self.records.push(last);
        }
        self.records
    }
}

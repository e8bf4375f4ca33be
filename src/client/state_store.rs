use log::{debug, warn};

use crate::client::json;
use crate::client::signal::Signal;
use crate::client::snapshot::Snapshot;
use crate::common::ParseResult;

/// Latest authoritative snapshot, or nothing before the first frame and
/// after a disconnect.
pub struct StateStore {
    snapshot: Signal<Option<Snapshot>>,
    rejected: u64
}

impl StateStore {
    pub fn new() -> Self {
        StateStore {
            snapshot: Signal::new(None),
            rejected: 0
        }
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshot.get().as_ref()
    }

    pub fn snapshot(&mut self) -> &mut Signal<Option<Snapshot>> {
        &mut self.snapshot
    }

    /// Frames that failed to decode since the store was created.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    /// Replaces the held snapshot with the decoded frame. A frame that does
    /// not decode leaves the held snapshot exactly as it was.
    pub fn apply_frame(&mut self, frame: &str) -> ParseResult<()> {
        match json::parse_snapshot(frame) {
            Ok(snapshot) => {
                self.snapshot.set(Some(snapshot));
                Ok(())
            },

            Err(err) => {
                self.rejected += 1;
                warn!("failed to parse game state: {}", err);
                Err(err)
            }
        }
    }

    pub fn clear(&mut self) {
        if self.snapshot.get().is_some() {
            debug!("discarding held snapshot");
            self.snapshot.set(None);
        }
    }
}

impl Default for StateStore {
    fn default() -> Self {
        StateStore::new()
    }
}

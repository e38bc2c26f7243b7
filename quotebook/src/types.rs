//! Type definitions for quotebook
//!
//! Result and event types passed between the store, the reconciler and the
//! command line front end.

use serde::Serialize;
use shared::{Quote, SharedError};

/// A record from an import document that was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedImportRecord {
    /// Position of the record in the import document
    pub index: usize,
    pub reason: SharedError,
}

/// Outcome of a bulk import
///
/// Malformed records are skipped and reported; they never abort the import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: Vec<Quote>,
    pub rejected: Vec<MalformedImportRecord>,
}

impl ImportReport {
    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Counts produced by one merge of a remote snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Remote quotes that were not present locally
    pub added: usize,
    /// Local quotes overwritten by a strictly newer remote version
    pub updated: usize,
    /// Remote quotes whose local copy was equal or newer
    pub unchanged: usize,
}

impl MergeOutcome {
    pub fn changed(&self) -> bool {
        self.added + self.updated > 0
    }
}

/// Notification emitted by the scheduler after every cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SyncEvent {
    Updated { added: usize, updated: usize },
    Unchanged,
    Failed { error: String },
}

impl From<MergeOutcome> for SyncEvent {
    fn from(outcome: MergeOutcome) -> Self {
        if outcome.changed() {
            SyncEvent::Updated {
                added: outcome.added,
                updated: outcome.updated,
            }
        } else {
            SyncEvent::Unchanged
        }
    }
}

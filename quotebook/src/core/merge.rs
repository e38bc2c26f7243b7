//! Last-writer-wins merge of a remote snapshot into a store

use shared::Quote;

use crate::core::store::QuoteStore;
use crate::types::MergeOutcome;

/// Which side wins a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Local,
    Remote,
}

/// Resolve a conflict using last-writer-wins.
/// The remote copy wins only when strictly newer; ties keep the local copy.
pub fn resolve_conflict(local_updated_at: i64, remote_updated_at: i64) -> Winner {
    if remote_updated_at > local_updated_at {
        Winner::Remote
    } else {
        Winner::Local
    }
}

/// Merge remote quotes into the store
///
/// Unknown ids are appended in remote order; known ids are overwritten when
/// the remote copy is strictly newer. Nothing is ever removed, and a remote
/// snapshot that repeats an id is folded into the first occurrence, so the
/// store never ends up with duplicate ids.
pub fn merge_into(store: &mut QuoteStore, remote: Vec<Quote>) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for incoming in remote {
        match store.position(&incoming.id) {
            None => {
                store.push(incoming);
                outcome.added += 1;
            }
            Some(position) => {
                let local_updated_at = store.quotes()[position].updated_at;
                match resolve_conflict(local_updated_at, incoming.updated_at) {
                    Winner::Remote => {
                        store.overwrite(position, incoming);
                        outcome.updated += 1;
                    }
                    Winner::Local => outcome.unchanged += 1,
                }
            }
        }
    }

    outcome
}

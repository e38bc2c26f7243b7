//! Quotebook core logic

pub mod merge;
pub mod reconciler;
pub mod scheduler;
pub mod store;

pub use merge::{merge_into, resolve_conflict, Winner};
pub use reconciler::{Reconciler, DEFAULT_FETCH_TIMEOUT};
pub use scheduler::{SyncScheduler, DEFAULT_SYNC_INTERVAL};
pub use store::{parse_import_document, pick_random, QuoteStore};

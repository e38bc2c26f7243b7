//! Quotebook library: a persistent quote collection kept in sync with a
//! remote source
//!
//! The library provides a testable quote store with category filtering,
//! bulk import and export, and a periodic reconciler that merges a remote
//! snapshot using last-writer-wins on each quote's `updatedAt` stamp.

pub mod config;
pub mod core;
pub mod error;
pub mod quotebook_impl;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use config::{QuotebookConfig, SourceKind};
pub use core::{
    merge_into, parse_import_document, pick_random, resolve_conflict, QuoteStore, Reconciler,
    SyncScheduler, Winner, DEFAULT_FETCH_TIMEOUT, DEFAULT_SYNC_INTERVAL,
};
pub use error::{QuotebookError, QuotebookResult, SourceError};
pub use quotebook_impl::{QuoteBook, LAST_VIEWED_KEY, NO_QUOTES_MESSAGE, QUOTES_KEY, SELECTED_CATEGORY_KEY};
pub use traits::{Clock, KeyValueStore, MockClock, MockKeyValueStore, MockQuoteSource, QuoteSource};
pub use types::{ImportReport, MalformedImportRecord, MergeOutcome, SyncEvent};

//! Trait definitions with mockall annotations for testing
//!
//! These are the seams through which the store and the reconciler reach the
//! outside world: persistence, the remote quote source and the clock.

use async_trait::async_trait;
use shared::Quote;

use crate::error::{QuotebookResult, SourceError};

/// Key-value persistence abstraction
///
/// Values are opaque strings; the caller owns their encoding.
#[mockall::automock]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written
    async fn get(&self, key: &str) -> QuotebookResult<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> QuotebookResult<()>;

    /// Remove a key; removing a missing key succeeds
    async fn remove(&self, key: &str) -> QuotebookResult<()>;
}

/// Remote source of quotes used during reconciliation
#[mockall::automock]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the remote snapshot
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, SourceError>;

    /// Push a locally created quote to the remote side
    async fn publish_quote(&self, quote: &Quote) -> Result<(), SourceError>;
}

/// Wall clock abstraction so timestamps can be driven from tests
#[mockall::automock]
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch
    fn now_millis(&self) -> i64;
}

//! Reconciliation of the local book against a remote quote source
//!
//! One cycle fetches the remote snapshot (bounded by a timeout, without
//! holding the store lock) and then merges it under the lock with
//! last-writer-wins. A failed fetch leaves the store untouched.

use std::sync::Arc;
use std::time::Duration;

use shared::{component_debug, component_info, component_warn, Component, Quote};

use crate::error::{QuotebookResult, SourceError};
use crate::quotebook_impl::QuoteBook;
use crate::traits::{Clock, KeyValueStore, QuoteSource};
use crate::types::MergeOutcome;

/// Default upper bound for a single fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Reconciler<S: QuoteSource> {
    source: Arc<S>,
    fetch_timeout: Duration,
}

impl<S: QuoteSource> Reconciler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the remote snapshot, failing once the timeout elapses
    pub async fn fetch(&self) -> Result<Vec<Quote>, SourceError> {
        let fetched = tokio::time::timeout(self.fetch_timeout, self.source.fetch_quotes())
            .await
            .map_err(|_| SourceError::Timeout(self.fetch_timeout))??;

        let (usable, dropped): (Vec<Quote>, Vec<Quote>) = fetched
            .into_iter()
            .partition(|quote| !quote.text.trim().is_empty() && !quote.category.trim().is_empty());
        if !dropped.is_empty() {
            component_warn!(
                Component::Reconciler,
                "⚠️ Dropped {} remote quotes without text or category",
                dropped.len()
            );
        }
        Ok(usable)
    }

    /// Run one reconciliation cycle against the book
    pub async fn reconcile<K, C>(&self, book: &QuoteBook<K, C>) -> QuotebookResult<MergeOutcome>
    where
        K: KeyValueStore,
        C: Clock,
    {
        let remote = match self.fetch().await {
            Ok(remote) => remote,
            Err(e) => {
                component_warn!(Component::Reconciler, "⚠️ Sync skipped, remote unavailable: {}", e);
                return Err(e.into());
            }
        };

        let outcome = book.apply_remote(remote).await?;
        if outcome.changed() {
            component_info!(
                Component::Reconciler,
                "🔄 Quotes synced with server: {} added, {} updated",
                outcome.added,
                outcome.updated
            );
        } else {
            component_debug!(Component::Reconciler, "Sync found nothing new");
        }
        Ok(outcome)
    }

    /// Push a locally added quote to the remote side
    ///
    /// Failures are logged and reported as `false`; the local add stands.
    pub async fn publish(&self, quote: &Quote) -> bool {
        let published = tokio::time::timeout(self.fetch_timeout, self.source.publish_quote(quote))
            .await
            .map_err(|_| SourceError::Timeout(self.fetch_timeout))
            .and_then(|result| result);

        match published {
            Ok(()) => {
                component_debug!(Component::Reconciler, "📤 Published quote {}", quote.id);
                true
            }
            Err(e) => {
                component_warn!(Component::Reconciler, "⚠️ Failed to publish quote {}: {}", quote.id, e);
                false
            }
        }
    }
}

//! Simulated quote source
//!
//! Answers after a fixed delay with an in-memory server snapshot. Quotes
//! published to it are echoed back by later fetches, like a real server
//! would. A failing mode exercises the transport error path without a
//! network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shared::{component_debug, Component, Quote};

use crate::error::SourceError;
use crate::traits::QuoteSource;

/// Default latency of the simulated server
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Snapshot served when none is configured
pub fn default_server_quotes() -> Vec<Quote> {
    vec![
        Quote::new(1, "Believe in yourself and all that you are.", "Motivation", 2),
        Quote::new(3, "Simplicity is the ultimate sophistication.", "Design", 2),
        Quote::new(4, "Well done is better than well said.", "Action", 2),
    ]
}

#[derive(Debug, Clone)]
pub struct SimulatedSource {
    snapshot: Arc<RwLock<Vec<Quote>>>,
    delay: Duration,
    failure: Option<SourceError>,
}

impl SimulatedSource {
    pub fn new() -> Self {
        Self::with_snapshot(default_server_quotes())
    }

    pub fn with_snapshot(snapshot: Vec<Quote>) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
            delay: DEFAULT_DELAY,
            failure: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every request fail with the given error after the delay
    pub fn failing_with(mut self, error: SourceError) -> Self {
        self.failure = Some(error);
        self
    }

    /// Replace the server side snapshot
    pub async fn replace_snapshot(&self, snapshot: Vec<Quote>) {
        *self.snapshot.write().await = snapshot;
    }

    pub async fn snapshot(&self) -> Vec<Quote> {
        self.snapshot.read().await.clone()
    }

    async fn respond(&self) -> Result<(), SourceError> {
        tokio::time::sleep(self.delay).await;
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl Default for SimulatedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteSource for SimulatedSource {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, SourceError> {
        self.respond().await?;
        let quotes = self.snapshot().await;
        component_debug!(Component::Source, "🎲 Simulated server returned {} quotes", quotes.len());
        Ok(quotes)
    }

    async fn publish_quote(&self, quote: &Quote) -> Result<(), SourceError> {
        self.respond().await?;

        let mut snapshot = self.snapshot.write().await;
        match snapshot.iter_mut().find(|existing| existing.id == quote.id) {
            Some(existing) => *existing = quote.clone(),
            None => snapshot.push(quote.clone()),
        }
        Ok(())
    }
}

//! Test helpers and builder patterns for quotebook tests

use std::sync::Arc;

use quotebook::services::{ManualClock, MemoryStorage};
use quotebook::*;
use shared::Quote;

use super::fixtures::TestFixtures;

/// Builder for quote books backed by in-memory storage and a manual clock
pub struct BookBuilder {
    storage: MemoryStorage,
    clock: ManualClock,
}

impl BookBuilder {
    pub fn new() -> Self {
        Self {
            storage: MemoryStorage::new(),
            clock: ManualClock::new(TestFixtures::NOW),
        }
    }

    /// Seed the persisted quote list
    pub async fn with_quotes(self, quotes: &[Quote]) -> Self {
        let encoded = serde_json::to_string(quotes).unwrap();
        self.storage.set(QUOTES_KEY, &encoded).await.unwrap();
        self
    }

    /// Seed an arbitrary raw value under a key
    pub async fn with_raw(self, key: &str, raw: &str) -> Self {
        self.storage.set(key, raw).await.unwrap();
        self
    }

    pub fn storage(&self) -> MemoryStorage {
        self.storage.clone()
    }

    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    pub async fn build(self) -> QuoteBook<MemoryStorage, ManualClock> {
        QuoteBook::open(self.storage, self.clock).await.unwrap()
    }
}

/// Helper functions for common test scenarios
pub struct TestHelpers;

impl TestHelpers {
    /// Book seeded with the standard local quotes
    pub async fn local_book() -> Arc<QuoteBook<MemoryStorage, ManualClock>> {
        Arc::new(
            BookBuilder::new()
                .with_quotes(&TestFixtures::local_quotes())
                .await
                .build()
                .await,
        )
    }

    /// Source mock that always answers with the given snapshot
    pub fn source_returning(snapshot: Vec<Quote>) -> MockQuoteSource {
        let mut source = MockQuoteSource::new();
        source
            .expect_fetch_quotes()
            .returning(move || Ok(snapshot.clone()))
            .times(0..);
        source
    }

    /// Source mock whose every fetch fails
    pub fn failing_source() -> MockQuoteSource {
        let mut source = MockQuoteSource::new();
        source
            .expect_fetch_quotes()
            .returning(|| Err(SourceError::Network("connection reset".to_string())))
            .times(0..);
        source
    }

    /// Persisted quote list decoded from storage
    pub async fn persisted_quotes(storage: &MemoryStorage) -> Vec<Quote> {
        let raw = storage.get(QUOTES_KEY).await.unwrap().expect("quotes persisted");
        serde_json::from_str(&raw).unwrap()
    }

    /// Ids in store order
    pub fn ids(quotes: &[Quote]) -> Vec<String> {
        quotes.iter().map(|q| q.id.to_string()).collect()
    }
}

//! QuoteBook: the store plus its persistence
//!
//! Wraps a [`QuoteStore`] behind an async mutex so every mutation, and the
//! persistence that follows it, runs as one unit. Reads of the remote source
//! happen outside this lock; only the merge itself takes it.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use shared::{component_debug, component_info, component_warn, CategoryFilter, Component, Quote};

use crate::core::merge::merge_into;
use crate::core::store::{parse_import_document, pick_random, QuoteStore};
use crate::error::QuotebookResult;
use crate::services::MemoryStorage;
use crate::traits::{Clock, KeyValueStore};
use crate::types::{ImportReport, MergeOutcome};

/// Storage key holding the quote list
pub const QUOTES_KEY: &str = "quotes";
/// Storage key holding the last active category filter
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Session key holding the last quote shown
pub const LAST_VIEWED_KEY: &str = "lastViewedQuote";

/// Message shown when a filter matches nothing
pub const NO_QUOTES_MESSAGE: &str = "No quotes found in this category.";

/// Persistent quote collection with a selected category
pub struct QuoteBook<K, C>
where
    K: KeyValueStore,
    C: Clock,
{
    store: Mutex<QuoteStore>,
    selected: Mutex<CategoryFilter>,

    // Dependencies (injected)
    storage: Arc<K>,
    clock: Arc<C>,

    // Session scoped state, lives as long as the process
    session: MemoryStorage,
}

impl<K, C> QuoteBook<K, C>
where
    K: KeyValueStore,
    C: Clock,
{
    /// Open the book from persisted state, falling back to the defaults
    pub async fn open(storage: K, clock: C) -> QuotebookResult<Self> {
        let storage = Arc::new(storage);
        let clock = Arc::new(clock);

        let persisted = storage.get(QUOTES_KEY).await?;
        let store = QuoteStore::load(persisted.as_deref(), clock.now_millis());

        let selected = match storage.get(SELECTED_CATEGORY_KEY).await? {
            Some(raw) => restore_selection(&store, &raw),
            None => CategoryFilter::All,
        };

        component_info!(
            Component::Store,
            "📚 Opened quote book with {} quotes, filter '{}'",
            store.len(),
            selected
        );

        Ok(Self {
            store: Mutex::new(store),
            selected: Mutex::new(selected),
            storage,
            clock,
            session: MemoryStorage::new(),
        })
    }

    /// Add a user submitted quote and persist the store
    pub async fn add(&self, text: &str, category: &str) -> QuotebookResult<Quote> {
        let mut store = self.store.lock().await;
        let previous = store.clone();
        let quote = store.add(text, category, self.clock.now_millis())?;
        self.commit(&mut store, previous).await?;

        component_info!(Component::Store, "➕ Added quote {} in '{}'", quote.id, quote.category);
        Ok(quote)
    }

    /// Import raw records, skipping malformed ones
    pub async fn import_records(&self, records: Vec<Value>) -> QuotebookResult<ImportReport> {
        let mut store = self.store.lock().await;
        let previous = store.clone();
        let report = store.import_many(records, self.clock.now_millis());
        if report.imported_count() > 0 {
            self.commit(&mut store, previous).await?;
        }

        if !report.is_clean() {
            component_warn!(
                Component::Store,
                "⚠️ Skipped {} malformed import records",
                report.rejected.len()
            );
        }
        component_info!(Component::Store, "📥 Imported {} quotes", report.imported_count());
        Ok(report)
    }

    /// Import a JSON document holding an array of quote records
    pub async fn import_json(&self, raw: &str) -> QuotebookResult<ImportReport> {
        let records = parse_import_document(raw)?;
        self.import_records(records).await
    }

    /// Export the full store as pretty JSON
    pub async fn export_json(&self) -> QuotebookResult<String> {
        self.store.lock().await.to_json()
    }

    /// Snapshot of every quote, in store order
    pub async fn quotes(&self) -> Vec<Quote> {
        self.store.lock().await.quotes().to_vec()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn categories(&self) -> Vec<String> {
        self.store.lock().await.categories()
    }

    pub async fn filter_options(&self) -> Vec<CategoryFilter> {
        self.store.lock().await.filter_options()
    }

    pub async fn filter(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.store.lock().await.filter(filter)
    }

    pub async fn selected_category(&self) -> CategoryFilter {
        self.selected.lock().await.clone()
    }

    /// Change the active filter and remember it
    pub async fn select_category(&self, filter: CategoryFilter) -> QuotebookResult<()> {
        self.storage.set(SELECTED_CATEGORY_KEY, filter.as_str()).await?;
        component_debug!(Component::Store, "Selected category '{}'", filter);
        *self.selected.lock().await = filter;
        Ok(())
    }

    /// Pick a random quote from the active filter and remember it for the session
    pub async fn show_random(&self) -> QuotebookResult<Option<Quote>> {
        let filter = self.selected_category().await;
        let candidates = self.filter(&filter).await;

        let picked = {
            let mut rng = rand::thread_rng();
            pick_random(&candidates, &mut rng).cloned()
        };

        if let Some(quote) = &picked {
            let encoded = serde_json::to_string(quote)?;
            self.session.set(LAST_VIEWED_KEY, &encoded).await?;
        }
        Ok(picked)
    }

    /// Last quote shown during this session
    pub async fn last_viewed(&self) -> QuotebookResult<Option<Quote>> {
        match self.session.get(LAST_VIEWED_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw).ok()),
            None => Ok(None),
        }
    }

    /// Merge a remote snapshot and persist when anything changed
    ///
    /// The lock is held for the whole merge so readers never observe a
    /// half-merged store. A failed write undoes the merge, so the next cycle
    /// sees the same changes again.
    pub async fn apply_remote(&self, remote: Vec<Quote>) -> QuotebookResult<MergeOutcome> {
        let mut store = self.store.lock().await;
        let previous = store.clone();
        let outcome = merge_into(&mut store, remote);
        if outcome.changed() {
            self.commit(&mut store, previous).await?;
        }
        Ok(outcome)
    }

    /// Current time according to the injected clock
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Persist a mutated store, restoring `previous` when the write fails
    async fn commit(&self, store: &mut QuoteStore, previous: QuoteStore) -> QuotebookResult<()> {
        if let Err(e) = self.persist(store).await {
            component_warn!(Component::Storage, "⚠️ Write failed, change rolled back: {}", e);
            *store = previous;
            return Err(e);
        }
        Ok(())
    }

    async fn persist(&self, store: &QuoteStore) -> QuotebookResult<()> {
        let encoded = store.to_json()?;
        self.storage.set(QUOTES_KEY, &encoded).await?;
        component_debug!(Component::Storage, "💾 Persisted {} quotes", store.len());
        Ok(())
    }
}

/// Restore a persisted filter, ignoring categories that no longer exist
fn restore_selection(store: &QuoteStore, raw: &str) -> CategoryFilter {
    match raw.parse::<CategoryFilter>() {
        Ok(CategoryFilter::Named(name)) if !store.categories().contains(&name) => {
            component_debug!(Component::Store, "Saved category '{}' no longer exists", name);
            CategoryFilter::All
        }
        Ok(filter) => filter,
        Err(_) => CategoryFilter::All,
    }
}

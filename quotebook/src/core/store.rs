//! In-memory quote store
//!
//! Owns the authoritative list of quotes. Ids are kept unique through an
//! index that is maintained on every append; quotes are never removed, so
//! positions stay stable for the lifetime of the store.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use shared::{
    category_name, component_debug, component_warn, default_quotes, required_field, CategoryFilter,
    Component, Quote, QuoteId, QuoteRecord,
};

use crate::error::{QuotebookError, QuotebookResult};
use crate::types::{ImportReport, MalformedImportRecord};

/// Ordered collection of quotes with unique ids
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteStore {
    quotes: Vec<Quote>,
    index: HashMap<QuoteId, usize>,
}

impl QuoteStore {
    /// Create an empty store
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a store holding the built-in default quotes
    pub fn with_defaults() -> Self {
        let mut store = Self::empty();
        for quote in default_quotes() {
            store.push(quote);
        }
        store
    }

    /// Initialize from a persisted snapshot, falling back to the defaults
    /// when the snapshot is absent or malformed
    pub fn load(persisted: Option<&str>, now: i64) -> Self {
        let Some(raw) = persisted else {
            component_debug!(Component::Store, "No persisted quotes, starting from defaults");
            return Self::with_defaults();
        };

        match Self::from_snapshot(raw, now) {
            Ok(store) => {
                component_debug!(Component::Store, "Loaded {} persisted quotes", store.len());
                store
            }
            Err(e) => {
                component_warn!(Component::Store, "⚠️ Falling back to default quotes: {}", e);
                Self::with_defaults()
            }
        }
    }

    /// Strictly parse a persisted snapshot
    ///
    /// Missing ids and timestamps are backfilled; anything that is not a
    /// list of quote-shaped records with unique ids is rejected.
    pub fn from_snapshot(raw: &str, now: i64) -> QuotebookResult<Self> {
        let malformed = |reason: String| QuotebookError::MalformedPersistedState { reason };

        let records: Vec<QuoteRecord> =
            serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;

        let mut store = Self::empty();
        for (position, record) in records.into_iter().enumerate() {
            let (text, category) = record
                .content()
                .map_err(|e| malformed(format!("record {position}: {e}")))?;

            let id = match record.present_id() {
                Some(id) if store.contains(id) => {
                    return Err(malformed(format!("record {position}: duplicate id {id}")));
                }
                Some(id) => id.clone(),
                None => store.fresh_id(),
            };

            store.push(Quote {
                id,
                text,
                category,
                updated_at: record.updated_at.unwrap_or(now),
            });
        }

        Ok(store)
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn contains(&self, id: &QuoteId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &QuoteId) -> Option<&Quote> {
        self.index.get(id).map(|&position| &self.quotes[position])
    }

    /// Validate and append a user submitted quote
    pub fn add(&mut self, text: &str, category: &str, now: i64) -> QuotebookResult<Quote> {
        let text = required_field(Some(text), "text").map_err(QuotebookError::invalid_input)?;
        let category = category_name(Some(category)).map_err(QuotebookError::invalid_input)?;

        let quote = Quote {
            id: self.fresh_id(),
            text,
            category,
            updated_at: now,
        };
        self.push(quote.clone());
        Ok(quote)
    }

    /// Append every quote-shaped record, skipping and reporting the rest
    ///
    /// Imported quotes are stamped with `now`. A record keeps its own id
    /// unless that id is missing or already taken.
    pub fn import_many(&mut self, records: Vec<Value>, now: i64) -> ImportReport {
        let mut report = ImportReport::default();

        for (index, value) in records.into_iter().enumerate() {
            let parsed = QuoteRecord::from_value(value)
                .and_then(|record| record.content().map(|content| (record, content)));

            let (record, (text, category)) = match parsed {
                Ok(parsed) => parsed,
                Err(reason) => {
                    component_debug!(Component::Store, "Skipping import record {}: {}", index, reason);
                    report.rejected.push(MalformedImportRecord { index, reason });
                    continue;
                }
            };

            let id = match record.present_id() {
                Some(id) if !self.contains(id) => id.clone(),
                _ => self.fresh_id(),
            };

            let quote = Quote {
                id,
                text,
                category,
                updated_at: now,
            };
            self.push(quote.clone());
            report.imported.push(quote);
        }

        report
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut categories = Vec::new();
        for quote in &self.quotes {
            if seen.insert(quote.category.as_str()) {
                categories.push(quote.category.clone());
            }
        }
        categories
    }

    /// Filter choices: the "all" pseudo-category followed by every category
    pub fn filter_options(&self) -> Vec<CategoryFilter> {
        std::iter::once(CategoryFilter::All)
            .chain(self.categories().into_iter().map(CategoryFilter::Named))
            .collect()
    }

    /// Quotes matching the filter, in store order
    pub fn filter(&self, filter: &CategoryFilter) -> Vec<Quote> {
        self.quotes
            .iter()
            .filter(|quote| filter.matches(quote))
            .cloned()
            .collect()
    }

    /// Serialize the full store as a pretty JSON array
    pub fn to_json(&self) -> QuotebookResult<String> {
        Ok(serde_json::to_string_pretty(&self.quotes)?)
    }

    /// Position of a quote by id
    pub(crate) fn position(&self, id: &QuoteId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Append a quote whose id is known to be absent
    pub(crate) fn push(&mut self, quote: Quote) {
        debug_assert!(!self.contains(&quote.id));
        self.index.insert(quote.id.clone(), self.quotes.len());
        self.quotes.push(quote);
    }

    /// Overwrite every field of the quote at `position`; the id is retained
    pub(crate) fn overwrite(&mut self, position: usize, incoming: Quote) {
        let slot = &mut self.quotes[position];
        slot.text = incoming.text;
        slot.category = incoming.category;
        slot.updated_at = incoming.updated_at;
    }

    fn fresh_id(&self) -> QuoteId {
        loop {
            let id = QuoteId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }
}

/// Parse an import document into raw records
pub fn parse_import_document(raw: &str) -> QuotebookResult<Vec<Value>> {
    let document: Value =
        serde_json::from_str(raw).map_err(|e| QuotebookError::MalformedImportDocument {
            reason: e.to_string(),
        })?;

    match document {
        Value::Array(records) => Ok(records),
        other => Err(QuotebookError::MalformedImportDocument {
            reason: format!("expected a JSON array, found {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Uniformly pick one quote, `None` when there is nothing to pick from
pub fn pick_random<'a, R>(quotes: &'a [Quote], rng: &mut R) -> Option<&'a Quote>
where
    R: Rng + ?Sized,
{
    quotes.choose(rng)
}

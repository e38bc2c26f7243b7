//! Core shared types: quotes, their identifiers and category filters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Identifier of a quote
///
/// Remote sources hand out integers while locally created quotes receive
/// UUID strings, so both shapes are accepted on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuoteId {
    Number(i64),
    Text(String),
}

impl QuoteId {
    /// Generate a fresh collision-resistant identifier
    pub fn generate() -> Self {
        Self::Text(Uuid::new_v4().to_string())
    }

    /// Identifiers that carry no value are treated as absent
    pub fn is_blank(&self) -> bool {
        match self {
            QuoteId::Number(n) => *n == 0,
            QuoteId::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteId::Number(n) => write!(f, "{n}"),
            QuoteId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for QuoteId {
    fn from(value: i64) -> Self {
        QuoteId::Number(value)
    }
}

impl From<&str> for QuoteId {
    fn from(value: &str) -> Self {
        QuoteId::Text(value.to_string())
    }
}

/// A single quote held by a store
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
    pub category: String,
    /// Millisecond timestamp of the last write, used for conflict resolution
    pub updated_at: i64,
}

impl Quote {
    pub fn new(id: impl Into<QuoteId>, text: impl Into<String>, category: impl Into<String>, updated_at: i64) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: category.into(),
            updated_at,
        }
    }

    /// Display form used by the command line front end
    pub fn render(&self) -> String {
        format!("\"{}\" — ({})", self.text, self.category)
    }
}

/// Loosely shaped quote as found in persisted snapshots, import documents
/// and remote payloads. Every field is optional until validated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuoteId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Remote posts carry their text here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl QuoteRecord {
    /// Parse a single record out of an arbitrary JSON value
    pub fn from_value(value: serde_json::Value) -> SharedResult<Self> {
        if !value.is_object() {
            return Err(SharedError::NotAnObject);
        }
        serde_json::from_value(value).map_err(|e| SharedError::DeserializationError {
            message: e.to_string(),
        })
    }

    /// Identifier if present and non-blank
    pub fn present_id(&self) -> Option<&QuoteId> {
        self.id.as_ref().filter(|id| !id.is_blank())
    }

    /// Text, falling back to `title` only when `text` is absent
    pub fn text_or_title(&self) -> Option<&str> {
        self.text.as_deref().or(self.title.as_deref())
    }

    /// Validated, trimmed text and category
    pub fn content(&self) -> SharedResult<(String, String)> {
        let text = required_field(self.text_or_title(), "text")?;
        let category = category_name(self.category.as_deref())?;
        Ok((text, category))
    }
}

impl From<Quote> for QuoteRecord {
    fn from(quote: Quote) -> Self {
        Self {
            id: Some(quote.id),
            text: Some(quote.text),
            title: None,
            category: Some(quote.category),
            updated_at: Some(quote.updated_at),
        }
    }
}

/// Trim a user supplied field and reject it when nothing is left
pub fn required_field(value: Option<&str>, field: &'static str) -> SharedResult<String> {
    let value = value.ok_or(SharedError::MissingField { field })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SharedError::EmptyField { field });
    }
    Ok(trimmed.to_string())
}

/// Trim a category and reject blanks and the reserved filter name
pub fn category_name(value: Option<&str>) -> SharedResult<String> {
    let name = required_field(value, "category")?;
    if name == CategoryFilter::ALL {
        return Err(SharedError::ReservedCategory { name });
    }
    Ok(name)
}

/// Category selection used for filtering
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    /// Pseudo-category matching every quote
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    pub const ALL: &'static str = "all";

    pub fn named(category: impl Into<String>) -> Self {
        CategoryFilter::Named(category.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => Self::ALL,
            CategoryFilter::Named(name) => name,
        }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Named(name) => quote.category == *name,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        if value == Self::ALL {
            CategoryFilter::All
        } else {
            CategoryFilter::Named(value)
        }
    }
}

impl From<CategoryFilter> for String {
    fn from(value: CategoryFilter) -> Self {
        value.as_str().to_string()
    }
}

impl FromStr for CategoryFilter {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = required_field(Some(s), "category")?;
        Ok(CategoryFilter::from(trimmed))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Quotes a store starts with when nothing usable was persisted
pub fn default_quotes() -> Vec<Quote> {
    vec![
        Quote::new(1, "Believe in yourself.", "Motivation", 1),
        Quote::new(2, "Keep pushing forward.", "Inspiration", 1),
    ]
}

/// Component emitting a log event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Component {
    Store,
    Reconciler,
    Scheduler,
    Storage,
    Source,
    Cli,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Store => write!(f, "store"),
            Component::Reconciler => write!(f, "reconciler"),
            Component::Scheduler => write!(f, "scheduler"),
            Component::Storage => write!(f, "storage"),
            Component::Source => write!(f, "source"),
            Component::Cli => write!(f, "cli"),
        }
    }
}

//! HTTP quote source
//!
//! Reads a JSON array of posts from a REST endpoint and maps each post onto a
//! quote: `text` (or `title` when it has none) becomes the quote text, posts
//! without a usable category land in the "Server" category and posts without
//! a timestamp are stamped with the fetch time. Newly added quotes are published with a POST to the
//! same endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use shared::{component_debug, component_warn, CategoryFilter, Component, Quote, QuoteRecord};

use crate::error::{QuotebookError, QuotebookResult, SourceError};
use crate::traits::{Clock, QuoteSource};

/// Public placeholder API the source talks to by default
pub const DEFAULT_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/posts";

/// Number of posts taken from each fetch
pub const DEFAULT_LIMIT: usize = 10;

/// Category assigned to remote posts that carry none
pub const SERVER_CATEGORY: &str = "Server";

/// Quote source backed by a REST endpoint
pub struct HttpQuoteSource<C: Clock> {
    client: reqwest::Client,
    endpoint: Url,
    limit: usize,
    clock: C,
}

impl<C: Clock> HttpQuoteSource<C> {
    pub fn new(endpoint: Url, clock: C) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            limit: DEFAULT_LIMIT,
            clock,
        }
    }

    /// Bound every request; a hung server must not stall a sync cycle
    pub fn with_request_timeout(mut self, timeout: Duration) -> QuotebookResult<Self> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuotebookError::config("request_timeout", e.to_string()))?;
        Ok(self)
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Map a remote payload onto quotes, skipping posts that cannot be used
pub fn payload_to_quotes(payload: Value, limit: usize, now: i64) -> Result<Vec<Quote>, SourceError> {
    let Value::Array(posts) = payload else {
        return Err(SourceError::InvalidPayload("expected a JSON array".to_string()));
    };

    let mut quotes = Vec::new();
    for (position, post) in posts.into_iter().take(limit).enumerate() {
        match post_to_quote(post, now) {
            Some(quote) => quotes.push(quote),
            None => {
                component_warn!(Component::Source, "⚠️ Ignoring unusable remote post at {}", position);
            }
        }
    }
    Ok(quotes)
}

fn post_to_quote(post: Value, now: i64) -> Option<Quote> {
    let record = QuoteRecord::from_value(post).ok()?;
    let id = record.present_id()?.clone();
    let text = record.text_or_title().map(str::trim).filter(|t| !t.is_empty())?;
    let category = record
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != CategoryFilter::ALL)
        .unwrap_or(SERVER_CATEGORY);

    Some(Quote {
        id,
        text: text.to_string(),
        category: category.to_string(),
        updated_at: record.updated_at.unwrap_or(now),
    })
}

fn transport_error(error: reqwest::Error) -> SourceError {
    match error.status() {
        Some(status) => SourceError::HttpStatus {
            status: status.as_u16(),
        },
        None => SourceError::Network(error.to_string()),
    }
}

#[async_trait]
impl<C: Clock> QuoteSource for HttpQuoteSource<C> {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, SourceError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| SourceError::InvalidPayload(format!("Failed to parse response: {}", e)))?;

        let quotes = payload_to_quotes(payload, self.limit, self.clock.now_millis())?;
        component_debug!(Component::Source, "🌐 Fetched {} quotes from {}", quotes.len(), self.endpoint);
        Ok(quotes)
    }

    async fn publish_quote(&self, quote: &Quote) -> Result<(), SourceError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("Content-Type", "application/json")
            .json(quote)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(SourceError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        component_debug!(Component::Source, "📤 Published quote {} to {}", quote.id, self.endpoint);
        Ok(())
    }
}

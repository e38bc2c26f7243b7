//! Source selected by configuration

use async_trait::async_trait;

use shared::Quote;

use crate::config::{QuotebookConfig, SourceKind};
use crate::error::{QuotebookResult, SourceError};
use crate::services::clock::SystemClock;
use crate::services::http_source::HttpQuoteSource;
use crate::services::simulated_source::SimulatedSource;
use crate::traits::QuoteSource;

/// One of the real sources, picked at startup
pub enum ConfiguredSource {
    Http(HttpQuoteSource<SystemClock>),
    Simulated(SimulatedSource),
    Offline,
}

impl ConfiguredSource {
    pub fn from_config(config: &QuotebookConfig) -> QuotebookResult<Self> {
        let source = match config.source {
            SourceKind::Http => ConfiguredSource::Http(
                HttpQuoteSource::new(config.endpoint.clone(), SystemClock::new())
                    .with_request_timeout(config.fetch_timeout)?,
            ),
            SourceKind::Simulated => {
                ConfiguredSource::Simulated(SimulatedSource::new().with_delay(config.simulated_delay))
            }
            SourceKind::Offline => ConfiguredSource::Offline,
        };
        Ok(source)
    }
}

fn offline() -> SourceError {
    SourceError::Unavailable("running offline".to_string())
}

#[async_trait]
impl QuoteSource for ConfiguredSource {
    async fn fetch_quotes(&self) -> Result<Vec<Quote>, SourceError> {
        match self {
            ConfiguredSource::Http(source) => source.fetch_quotes().await,
            ConfiguredSource::Simulated(source) => source.fetch_quotes().await,
            ConfiguredSource::Offline => Err(offline()),
        }
    }

    async fn publish_quote(&self, quote: &Quote) -> Result<(), SourceError> {
        match self {
            ConfiguredSource::Http(source) => source.publish_quote(quote).await,
            ConfiguredSource::Simulated(source) => source.publish_quote(quote).await,
            ConfiguredSource::Offline => Err(offline()),
        }
    }
}

//! Runtime configuration
//!
//! Assembled by the command line front end from flags, environment
//! variables and an optional `.env` file.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::core::{DEFAULT_FETCH_TIMEOUT, DEFAULT_SYNC_INTERVAL};
use crate::error::{QuotebookError, QuotebookResult};
use crate::services::http_source::DEFAULT_ENDPOINT;
use crate::services::simulated_source::DEFAULT_DELAY;

/// Which remote quote source to reconcile against
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SourceKind {
    /// REST endpoint returning a JSON array of posts
    Http,
    /// In-process server with a fixed delay
    Simulated,
    /// No remote side; sync and publish are unavailable
    #[value(name = "none", alias = "offline")]
    Offline,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuotebookConfig {
    /// Directory holding the persisted keys
    pub data_dir: PathBuf,
    pub source: SourceKind,
    pub endpoint: Url,
    pub sync_interval: Duration,
    /// Upper bound for one fetch or publish
    pub fetch_timeout: Duration,
    pub simulated_delay: Duration,
    /// Push newly added quotes to the remote source
    pub publish_new_quotes: bool,
}

impl Default for QuotebookConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            source: SourceKind::Http,
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            sync_interval: DEFAULT_SYNC_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            simulated_delay: DEFAULT_DELAY,
            publish_new_quotes: true,
        }
    }
}

impl QuotebookConfig {
    /// Reject settings the scheduler cannot run with
    pub fn validate(&self) -> QuotebookResult<()> {
        if self.sync_interval.is_zero() {
            return Err(QuotebookError::config("sync_interval", "must be greater than zero"));
        }
        if self.fetch_timeout.is_zero() {
            return Err(QuotebookError::config("fetch_timeout", "must be greater than zero"));
        }
        if !matches!(self.endpoint.scheme(), "http" | "https") {
            return Err(QuotebookError::config(
                "endpoint",
                format!("unsupported scheme '{}'", self.endpoint.scheme()),
            ));
        }
        Ok(())
    }

    /// Whether new quotes should be pushed to the remote side
    pub fn publishes(&self) -> bool {
        self.publish_new_quotes && self.source != SourceKind::Offline
    }
}

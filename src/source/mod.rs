pub mod error;
pub mod http;
pub mod mock;
pub mod types;

pub use error::TransportError;
pub use http::HttpContactSource;
pub use mock::MockContactSource;
pub use types::{ContactQuery, ContactRecord, FetchPage, FieldValue, LeadFilters};

use crate::config::{SourceConfig, SourceKind};
use crate::error::{LeadsError, Result};
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Anything that can answer a paginated contact query.
#[async_trait]
pub trait ContactSource: Send + Sync {
    /// Fetch one page. An empty `data` batch means there is nothing further.
    async fn fetch(&self, query: &ContactQuery) -> std::result::Result<FetchPage, TransportError>;

    fn name(&self) -> &str;
}

/// Build the configured contact source.
pub fn build_source(config: &SourceConfig) -> Result<Box<dyn ContactSource>> {
    match config.kind {
        SourceKind::Mock => {
            let seed = config.seed.unwrap_or_else(rand::random);
            tracing::info!(seed, "Using mock contact source");

            let source = MockContactSource::new(seed).with_latency(
                Duration::from_millis(config.mock_latency_min_ms),
                Duration::from_millis(config.mock_latency_max_ms),
            );
            Ok(Box::new(source))
        }
        SourceKind::Http => {
            let endpoint = Url::parse(&config.api_url).map_err(|_| LeadsError::InvalidUrl {
                url: config.api_url.clone(),
            })?;
            tracing::info!(endpoint = %endpoint, "Using HTTP contact source");

            let source = HttpContactSource::new(
                endpoint,
                config.api_key.clone(),
                Duration::from_secs(config.timeout_secs),
            )
            .map_err(LeadsError::Transport)?;
            Ok(Box::new(source))
        }
    }
}

use std::time::{Duration, Instant};

use anyhow::Context;
use log::{info, warn};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::{
    config::FeedSettings,
    models::{Pool, ReferenceQuote, TokenQuote},
    pricing::{resolve_reference_price, MarketSnapshot},
};

const REFERENCE_FEED: &str = "reference quote";
const POOLS_FEED: &str = "pools";
const SPOT_FEED: &str = "spot quotes";
const HISTORICAL_FEED: &str = "historical quotes";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{feed} feed unavailable: {source}")]
    Unavailable {
        feed: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{feed} feed returned HTTP {status}")]
    Status {
        feed: &'static str,
        status: StatusCode,
    },
    #[error("{feed} feed returned a malformed payload: {source}")]
    Malformed {
        feed: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl FeedError {
    /// Malformed payloads mean the upstream contract changed; they are never
    /// papered over with an empty result.
    pub fn is_malformed(&self) -> bool {
        matches!(self, FeedError::Malformed { .. })
    }
}

/// HTTP client for the upstream market feeds.
///
/// Unreachable feeds degrade to empty results with a warning so a single
/// outage never aborts the report. Payloads that do not decode into the
/// typed records are surfaced as [`FeedError::Malformed`].
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    settings: FeedSettings,
}

impl FeedClient {
    pub fn new(settings: FeedSettings) -> anyhow::Result<Self> {
        for url in [
            &settings.reference_quote_url,
            &settings.pools_url,
            &settings.spot_quotes_url,
            &settings.historical_quotes_url,
        ] {
            Url::parse(url).with_context(|| format!("Invalid feed URL {}", url))?;
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, settings })
    }

    /// Fetch all four feeds concurrently.
    pub async fn fetch_snapshot(&self) -> Result<MarketSnapshot, FeedError> {
        let start = Instant::now();

        let (reference, pools, spot, historical) = tokio::join!(
            self.fetch_reference_quote(),
            self.fetch_pools(),
            self.fetch_spot_quotes(),
            self.fetch_historical_quotes(),
        );

        let snapshot = MarketSnapshot {
            reference_usd: resolve_reference_price(reference),
            pools: pools?,
            spot: spot?,
            historical: historical?,
        };

        info!(
            "Fetched snapshot in {:?}: {} pools, {} spot tokens, {} historical tokens",
            start.elapsed(),
            snapshot.pools.len(),
            snapshot.spot.len(),
            snapshot.historical.len()
        );
        Ok(snapshot)
    }

    /// USD quote of the reference asset. Any failure yields `None`.
    pub async fn fetch_reference_quote(&self) -> Option<ReferenceQuote> {
        match self
            .get::<ReferenceQuote>(REFERENCE_FEED, &self.settings.reference_quote_url)
            .await
        {
            Ok(quote) => Some(quote),
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    }

    pub async fn fetch_pools(&self) -> Result<Vec<Pool>, FeedError> {
        or_empty(self.get(POOLS_FEED, &self.settings.pools_url).await)
    }

    pub async fn fetch_spot_quotes(&self) -> Result<Vec<TokenQuote>, FeedError> {
        or_empty(self.get(SPOT_FEED, &self.settings.spot_quotes_url).await)
    }

    pub async fn fetch_historical_quotes(&self) -> Result<Vec<TokenQuote>, FeedError> {
        let url = self.settings.historical_url();
        or_empty(self.get(HISTORICAL_FEED, &url).await)
    }

    async fn get<T: DeserializeOwned>(&self, feed: &'static str, url: &str) -> Result<T, FeedError> {
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FeedError::Unavailable { feed, source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status { feed, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FeedError::Unavailable { feed, source })?;

        let parsed = serde_json::from_slice(&body)
            .map_err(|source| FeedError::Malformed { feed, source })?;

        info!(
            "Fetched {} feed ({} bytes) in {:?}",
            feed,
            body.len(),
            start.elapsed()
        );
        Ok(parsed)
    }
}

/// Degrade an unavailable feed to an empty set; keep malformed payloads fatal.
fn or_empty<T>(result: Result<Vec<T>, FeedError>) -> Result<Vec<T>, FeedError> {
    match result {
        Ok(items) => Ok(items),
        Err(e) if e.is_malformed() => Err(e),
        Err(e) => {
            warn!("{}, continuing with an empty result", e);
            Ok(Vec::new())
        }
    }
}

use anyhow::{anyhow, Context};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{
    pricing::{
        valuation::{DEFAULT_FEE_DENOMINATOR, DEFAULT_LIQUIDITY_FLOOR, DEFAULT_REFERENCE_ASSETS},
        ReferenceAssets, ValuationConfig, DEFAULT_TOP_N,
    },
    utils::parse_decimal,
};

/// Upstream feed endpoints and request limits.
///
/// Every request is bounded by `timeout_secs`; a feed that does not answer
/// in time is treated as unavailable and contributes an empty result.
#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    #[serde(default = "default_reference_quote_url")]
    pub reference_quote_url: String,
    #[serde(default = "default_pools_url")]
    pub pools_url: String,
    #[serde(default = "default_spot_quotes_url")]
    pub spot_quotes_url: String,
    /// Base URL; the lookback window is appended as the last path segment
    #[serde(default = "default_historical_quotes_url")]
    pub historical_quotes_url: String,
    #[serde(default = "default_historical_window")]
    pub historical_window: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            reference_quote_url: default_reference_quote_url(),
            pools_url: default_pools_url(),
            spot_quotes_url: default_spot_quotes_url(),
            historical_quotes_url: default_historical_quotes_url(),
            historical_window: default_historical_window(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FeedSettings {
    pub fn historical_url(&self) -> String {
        format!(
            "{}/{}",
            self.historical_quotes_url.trim_end_matches('/'),
            self.historical_window
        )
    }
}

fn default_reference_quote_url() -> String {
    "https://api.tzkt.io/v1/quotes/last".to_string()
}

fn default_pools_url() -> String {
    "https://api.crunchy.network/v1/pools".to_string()
}

fn default_spot_quotes_url() -> String {
    "https://api.crunchy.network/v1/tokens/quotes/spot".to_string()
}

fn default_historical_quotes_url() -> String {
    "https://dex-indexer-api.onrender.com/v1/tokens/quotes/last".to_string()
}

fn default_historical_window() -> String {
    "1d".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Valuation parameters.
///
/// Decimals are strings so large values (the 10^18 fee denominator) survive
/// YAML and environment parsing untouched.
#[derive(Debug, Deserialize, Clone)]
pub struct ValuationSettings {
    #[serde(default = "default_reference_assets")]
    pub reference_assets: Vec<String>,
    #[serde(default = "default_fee_denominator")]
    pub fee_denominator: String,
    #[serde(default = "default_liquidity_floor")]
    pub liquidity_floor: String,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        Self {
            reference_assets: default_reference_assets(),
            fee_denominator: default_fee_denominator(),
            liquidity_floor: default_liquidity_floor(),
        }
    }
}

impl ValuationSettings {
    /// Build the immutable config handed to the valuation engines.
    pub fn to_config(&self) -> anyhow::Result<ValuationConfig> {
        if self.reference_assets.is_empty() {
            return Err(anyhow!("valuation.reference_assets must not be empty"));
        }

        let fee_denominator = parse_decimal(&self.fee_denominator)
            .with_context(|| format!("invalid valuation.fee_denominator {:?}", self.fee_denominator))?;
        let liquidity_floor = parse_decimal(&self.liquidity_floor)
            .with_context(|| format!("invalid valuation.liquidity_floor {:?}", self.liquidity_floor))?;

        Ok(ValuationConfig {
            reference_assets: ReferenceAssets::new(self.reference_assets.clone()),
            fee_denominator,
            liquidity_floor,
        })
    }
}

fn default_reference_assets() -> Vec<String> {
    DEFAULT_REFERENCE_ASSETS.iter().map(|a| a.to_string()).collect()
}

fn default_fee_denominator() -> String {
    DEFAULT_FEE_DENOMINATOR.to_string()
}

fn default_liquidity_floor() -> String {
    DEFAULT_LIQUIDITY_FLOOR.to_string()
}

/// Output format of the market overview.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            format: ReportFormat::default(),
        }
    }
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

/// Root application configuration.
///
/// Loaded from `config.{yaml,toml,json}` in the working directory if present,
/// then overridden by `TOKENBOARD__SECTION__KEY` environment variables.
/// Every field has a production default, so an empty config is valid.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub feeds: FeedSettings,
    #[serde(default)]
    pub valuation: ValuationSettings,
    #[serde(default)]
    pub report: ReportSettings,
    /// JSON array of blocked composite identities; no blocklist if unset
    #[serde(default)]
    pub blocklist_path: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feeds: FeedSettings::default(),
            valuation: ValuationSettings::default(),
            report: ReportSettings::default(),
            blocklist_path: None,
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load("config")
    }

    /// Load from the file `name` (extension optional) plus environment overrides.
    pub fn load(name: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(name).required(false))
            .add_source(
                Environment::with_prefix("TOKENBOARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

//! Configuration management for the funding rate API.
//!
//! Loads settings from environment variables and config files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::exchange::coingecko::{MarketsQuery, PUBLIC_API_URL};
use crate::exchange::hyperliquid::MAINNET_API_URL;
use crate::exchange::ReconnectPolicy;

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP listener settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Hyperliquid upstream
    #[serde(default)]
    pub hyperliquid: HyperliquidConfig,
    /// CoinGecko upstream
    #[serde(default)]
    pub coingecko: CoinGeckoConfig,
    /// Funding ranking parameters
    #[serde(default)]
    pub ranking: RankingConfig,
    /// Sparkline down-sampling
    #[serde(default)]
    pub sparkline: SparklineConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HyperliquidConfig {
    #[serde(default = "default_hyperliquid_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub reconnect: ReconnectPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinGeckoConfig {
    #[serde(default = "default_coingecko_url")]
    pub base_url: String,
    /// Demo-plan API key; empty means anonymous access
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,
    #[serde(default = "default_order")]
    pub order: String,
    /// Rows per page (1-250)
    #[serde(default = "default_per_page")]
    pub per_page: u32,
    /// Pages to fetch per request
    #[serde(default = "default_pages")]
    pub pages: u32,
    /// Comma-separated windows, e.g. "1h,24h,7d"
    #[serde(default = "default_price_change_windows")]
    pub price_change_windows: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub reconnect: ReconnectPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Number of top positive funding markets to report
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Appended to every Hyperliquid coin name, e.g. "BTC" -> "BTC-PERP"
    #[serde(default = "default_market_suffix")]
    pub market_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparklineConfig {
    /// Series longer than this are down-sampled
    #[serde(default = "default_sparkline_threshold")]
    pub threshold: usize,
    /// Keep every n-th point when down-sampling
    #[serde(default = "default_sparkline_step")]
    pub step: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory for the rolling log file
    #[serde(default = "default_log_directory")]
    pub directory: String,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

// Default value functions
fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_hyperliquid_url() -> String {
    MAINNET_API_URL.to_string()
}

fn default_coingecko_url() -> String {
    PUBLIC_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_vs_currency() -> String {
    "usd".to_string()
}

fn default_order() -> String {
    "market_cap_desc".to_string()
}

fn default_per_page() -> u32 {
    100
}

fn default_pages() -> u32 {
    1
}

fn default_price_change_windows() -> String {
    "1h,24h,7d".to_string()
}

fn default_top_n() -> usize {
    5
}

fn default_market_suffix() -> String {
    "-PERP".to_string()
}

fn default_sparkline_threshold() -> usize {
    14 // hourly 7d series (168 points) always exceed this
}

fn default_sparkline_step() -> usize {
    7
}

fn default_log_directory() -> String {
    "logs".to_string()
}

impl Config {
    /// Load configuration from environment variables and config files.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default().separator("__").prefix("FRA"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(self.server.port != 0, "server.port must be non-zero");

        anyhow::ensure!(
            (1..=250).contains(&self.coingecko.per_page),
            "coingecko.per_page must be between 1 and 250"
        );

        anyhow::ensure!(self.coingecko.pages >= 1, "coingecko.pages must be >= 1");

        anyhow::ensure!(
            self.sparkline.step >= 1,
            "sparkline.step must be >= 1"
        );

        anyhow::ensure!(
            self.hyperliquid.timeout_secs > 0 && self.coingecko.timeout_secs > 0,
            "timeouts must be positive"
        );

        Ok(())
    }
}

impl CoinGeckoConfig {
    /// The listing query these settings describe.
    pub fn markets_query(&self) -> MarketsQuery {
        MarketsQuery {
            vs_currency: self.vs_currency.clone(),
            order: self.order.clone(),
            per_page: self.per_page,
            pages: self.pages,
            price_change_windows: self
                .price_change_windows
                .split(',')
                .map(str::trim)
                .filter(|w| !w.is_empty())
                .map(String::from)
                .collect(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for HyperliquidConfig {
    fn default() -> Self {
        Self {
            base_url: default_hyperliquid_url(),
            timeout_secs: default_timeout_secs(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            base_url: default_coingecko_url(),
            api_key: String::new(),
            vs_currency: default_vs_currency(),
            order: default_order(),
            per_page: default_per_page(),
            pages: default_pages(),
            price_change_windows: default_price_change_windows(),
            timeout_secs: default_timeout_secs(),
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            market_suffix: default_market_suffix(),
        }
    }
}

impl Default for SparklineConfig {
    fn default() -> Self {
        Self {
            threshold: default_sparkline_threshold(),
            step: default_sparkline_step(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_directory(),
            json: false,
        }
    }
}

//! Configuration loading and validation

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub screening: ScreeningConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
}

/// DexScreener polling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// DexScreener API base URL
    #[serde(default = "default_dexscreener_base")]
    pub base_url: String,
    /// Chain the scanner targets; pairs on other chains are dropped
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    /// Symbols never surfaced to the pipeline (native/gas/stable tokens)
    #[serde(default = "default_excluded_symbols")]
    pub excluded_symbols: Vec<String>,
    /// How many fresh token profiles to expand into pair lookups per cycle
    #[serde(default = "default_profile_limit")]
    pub profile_limit: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Read-only chain intel endpoints used by the on-chain gates
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint (holders + mint account queries)
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Enhanced transaction REST base (recent-trades query)
    #[serde(default = "default_intel_rest_url")]
    pub rest_url: String,
    /// API key appended to intel requests, usually set via MEMESCOUT__CHAIN__API_KEY
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Gate thresholds. Each threshold belongs to exactly one gate.
#[derive(Debug, Clone, Deserialize)]
pub struct ScreeningConfig {
    #[serde(default = "default_min_liquidity_usd")]
    pub min_liquidity_usd: f64,
    /// Liquidity as a percentage of FDV; below this the pair is a thin-LP rug setup
    #[serde(default = "default_min_lp_ratio_pct")]
    pub min_lp_ratio_pct: f64,
    #[serde(default = "default_max_tax_pct")]
    pub max_tax_pct: f64,
    /// Memecoin keywords matched against name and symbol; empty disables the filter
    #[serde(default = "default_name_keywords")]
    pub name_keywords: Vec<String>,
    #[serde(default = "default_min_volume_h1_usd")]
    pub min_volume_h1_usd: f64,
    #[serde(default = "default_min_volume_h24_usd")]
    pub min_volume_h24_usd: f64,
    /// Low-cap hunt: anything valued above this is already discovered
    #[serde(default = "default_max_fdv_usd")]
    pub max_fdv_usd: f64,
    /// 1h price change floor; more negative means already dumping
    #[serde(default = "default_min_price_change_h1_pct")]
    pub min_price_change_h1_pct: f64,
    /// Largest single holder's share of observed supply
    #[serde(default = "default_max_holder_supply_pct")]
    pub max_holder_supply_pct: f64,
    /// How many top holders to request for the concentration check
    #[serde(default = "default_holder_query_limit")]
    pub holder_query_limit: u32,
    /// Accounts recognized as LP lockers/burners, matched by exact address or substring
    #[serde(default = "default_known_lockers")]
    pub known_lockers: Vec<String>,
    /// Recent trades inspected by the honeypot heuristic
    #[serde(default = "default_honeypot_trade_window")]
    pub honeypot_trade_window: u32,
    /// Current 24h volume must be at least this multiple of the stored baseline
    #[serde(default = "default_volume_pump_multiple")]
    pub volume_pump_multiple: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token; read from TELEGRAM_BOT_TOKEN, never from the config file
    #[serde(default = "default_bot_token")]
    pub bot_token: String,
    #[serde(default = "default_chat_id")]
    pub chat_id: String,
    #[serde(default = "default_parse_mode")]
    pub parse_mode: String,
    /// When true, a pair accepted in consecutive cycles is alerted only once
    /// per process lifetime. Default is re-alerting every cycle.
    #[serde(default)]
    pub suppress_repeat_alerts: bool,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

// Default value functions

fn default_dexscreener_base() -> String {
    "https://api.dexscreener.com".into()
}

fn default_chain_id() -> String {
    "solana".into()
}

fn default_excluded_symbols() -> Vec<String> {
    vec!["SOL".into(), "WSOL".into(), "USDC".into(), "USDT".into()]
}

fn default_profile_limit() -> usize {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_rpc_url() -> String {
    std::env::var("RPC_ENDPOINT").unwrap_or_else(|_| "https://api.mainnet-beta.solana.com".into())
}

fn default_intel_rest_url() -> String {
    "https://api.helius.xyz".into()
}

fn default_min_liquidity_usd() -> f64 {
    5_000.0
}

fn default_min_lp_ratio_pct() -> f64 {
    2.0
}

fn default_max_tax_pct() -> f64 {
    10.0
}

fn default_name_keywords() -> Vec<String> {
    ["dog", "pepe", "inu", "shiba", "elon", "meme", "woof", "pup"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_min_volume_h1_usd() -> f64 {
    1_000.0
}

fn default_min_volume_h24_usd() -> f64 {
    5_000.0
}

fn default_max_fdv_usd() -> f64 {
    1_000_000.0
}

fn default_min_price_change_h1_pct() -> f64 {
    -20.0
}

fn default_max_holder_supply_pct() -> f64 {
    50.0
}

fn default_holder_query_limit() -> u32 {
    20
}

fn default_known_lockers() -> Vec<String> {
    vec![
        // Solana incinerator: burned LP is locked forever
        "1nc1nerator11111111111111111111111111111111".into(),
        // Common locker program vaults, matched as substrings
        "streamflow".into(),
        "bonkbot".into(),
    ]
}

fn default_honeypot_trade_window() -> u32 {
    50
}

fn default_volume_pump_multiple() -> f64 {
    5.0
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_bot_token() -> String {
    std::env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default()
}

fn default_chat_id() -> String {
    std::env::var("TELEGRAM_CHAT_ID").unwrap_or_default()
}

fn default_parse_mode() -> String {
    "Markdown".into()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_dexscreener_base(),
            chain_id: default_chain_id(),
            excluded_symbols: default_excluded_symbols(),
            profile_limit: default_profile_limit(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            rest_url: default_intel_rest_url(),
            api_key: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            min_liquidity_usd: default_min_liquidity_usd(),
            min_lp_ratio_pct: default_min_lp_ratio_pct(),
            max_tax_pct: default_max_tax_pct(),
            name_keywords: default_name_keywords(),
            min_volume_h1_usd: default_min_volume_h1_usd(),
            min_volume_h24_usd: default_min_volume_h24_usd(),
            max_fdv_usd: default_max_fdv_usd(),
            min_price_change_h1_pct: default_min_price_change_h1_pct(),
            max_holder_supply_pct: default_max_holder_supply_pct(),
            holder_query_limit: default_holder_query_limit(),
            known_lockers: default_known_lockers(),
            honeypot_trade_window: default_honeypot_trade_window(),
            volume_pump_multiple: default_volume_pump_multiple(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: default_bot_token(),
            chat_id: default_chat_id(),
            parse_mode: default_parse_mode(),
            suppress_repeat_alerts: false,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            chain: ChainConfig::default(),
            screening: ScreeningConfig::default(),
            scheduler: SchedulerConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::from(path).required(false))
            // Override with environment variables (prefix MEMESCOUT__)
            .add_source(
                config::Environment::with_prefix("MEMESCOUT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let config: Config = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.base_url)
            .with_context(|| format!("Invalid source base_url: {}", self.source.base_url))?;
        url::Url::parse(&self.chain.rpc_url)
            .with_context(|| format!("Invalid chain rpc_url: {}", self.chain.rpc_url))?;
        url::Url::parse(&self.chain.rest_url)
            .with_context(|| format!("Invalid chain rest_url: {}", self.chain.rest_url))?;

        if self.source.chain_id.is_empty() {
            anyhow::bail!("source.chain_id must not be empty");
        }

        if self.screening.min_liquidity_usd < 0.0 {
            anyhow::bail!("min_liquidity_usd must be non-negative");
        }

        if self.screening.min_lp_ratio_pct <= 0.0 || self.screening.min_lp_ratio_pct > 100.0 {
            anyhow::bail!("min_lp_ratio_pct must be in (0, 100]");
        }

        if self.screening.max_tax_pct < 0.0 || self.screening.max_tax_pct > 100.0 {
            anyhow::bail!("max_tax_pct must be in [0, 100]");
        }

        if self.screening.max_holder_supply_pct <= 0.0
            || self.screening.max_holder_supply_pct > 100.0
        {
            anyhow::bail!("max_holder_supply_pct must be in (0, 100]");
        }

        if self.screening.min_volume_h1_usd < 0.0 || self.screening.min_volume_h24_usd < 0.0 {
            anyhow::bail!("volume floors must be non-negative");
        }

        if self.screening.max_fdv_usd <= 0.0 {
            anyhow::bail!("max_fdv_usd must be positive");
        }

        if self.screening.volume_pump_multiple <= 1.0 {
            anyhow::bail!("volume_pump_multiple must be greater than 1");
        }

        if self.screening.honeypot_trade_window == 0 {
            anyhow::bail!("honeypot_trade_window must be positive");
        }

        if self.scheduler.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }

        // Full-address locker entries must be valid base58 account keys;
        // shorter entries are treated as substring heuristics.
        for locker in &self.screening.known_lockers {
            if locker.is_empty() {
                anyhow::bail!("known_lockers entries must not be empty");
            }
            if locker.len() >= 32 {
                let decoded = bs58::decode(locker)
                    .into_vec()
                    .with_context(|| format!("Invalid locker address: {}", locker))?;
                if decoded.len() != 32 {
                    anyhow::bail!("Invalid locker address length: {}", locker);
                }
            }
        }

        Ok(())
    }

    /// Fatal startup check: alerting is the whole point of the process, so a
    /// missing credential aborts before the first poll.
    pub fn require_notifier(&self) -> Result<()> {
        if self.telegram.bot_token.is_empty() {
            anyhow::bail!("TELEGRAM_BOT_TOKEN is not set");
        }
        if self.telegram.chat_id.is_empty() {
            anyhow::bail!("TELEGRAM_CHAT_ID is not set (env or telegram.chat_id in config)");
        }
        Ok(())
    }

    /// Get masked configuration for display (hide secrets)
    pub fn masked_display(&self) -> String {
        format!(
            r#"Configuration:
  Source:
    base_url: {}
    chain: {}
    excluded_symbols: {:?}
    profile_limit: {}
  Chain intel:
    rpc_url: {}
    rest_url: {}
    api_key: {}
  Screening:
    name_keywords: {:?}
    min_liquidity: ${}
    min_volume_1h: ${}
    min_volume_24h: ${}
    max_fdv: ${}
    min_lp_ratio: {}%
    min_price_change_1h: {}%
    max_tax: {}%
    max_holder_supply: {}%
    honeypot_trade_window: {}
    volume_pump_multiple: {}x
    known_lockers: {}
  Scheduler:
    poll_interval: {}s
  Telegram:
    bot_token: {}
    chat_id: {}
    parse_mode: {}
    suppress_repeat_alerts: {}
"#,
            self.source.base_url,
            self.source.chain_id,
            self.source.excluded_symbols,
            self.source.profile_limit,
            mask_url(&self.chain.rpc_url),
            mask_url(&self.chain.rest_url),
            if self.chain.api_key.is_empty() {
                "(not set)"
            } else {
                "***"
            },
            self.screening.name_keywords,
            self.screening.min_liquidity_usd,
            self.screening.min_volume_h1_usd,
            self.screening.min_volume_h24_usd,
            self.screening.max_fdv_usd,
            self.screening.min_lp_ratio_pct,
            self.screening.min_price_change_h1_pct,
            self.screening.max_tax_pct,
            self.screening.max_holder_supply_pct,
            self.screening.honeypot_trade_window,
            self.screening.volume_pump_multiple,
            self.screening.known_lockers.len(),
            self.scheduler.poll_interval_secs,
            if self.telegram.bot_token.is_empty() {
                "(not set)"
            } else {
                "***"
            },
            self.telegram.chat_id,
            self.telegram.parse_mode,
            self.telegram.suppress_repeat_alerts,
        )
    }
}

/// Mask URL for display (hide API keys in query params)
fn mask_url(url: &str) -> String {
    if let Some(idx) = url.find('?') {
        format!("{}?***", &url[..idx])
    } else {
        url.to_string()
    }
}

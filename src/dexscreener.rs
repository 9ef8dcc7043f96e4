//! DexScreener token source adapter
//!
//! Two-step discovery: pull the latest token profiles, keep the ones on the
//! target chain, then expand each into its best trading pair and normalize
//! into a [`TokenCandidate`]. The adapter is the fail-safe boundary to the
//! provider: any transport or shape problem is logged and becomes an empty
//! candidate list so the scheduler keeps its cadence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::screen::types::TokenCandidate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenProfile {
    pub url: Option<String>,
    #[serde(rename = "chainId")]
    pub chain_id: String,
    #[serde(rename = "tokenAddress")]
    pub token_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChange {
    pub m5: Option<f64>,
    pub h1: Option<f64>,
    pub h6: Option<f64>,
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Liquidity {
    pub usd: Option<f64>,
    pub base: Option<f64>,
    pub quote: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volume {
    pub m5: Option<f64>,
    pub h1: Option<f64>,
    pub h6: Option<f64>,
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseToken {
    pub address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DexPair {
    #[serde(rename = "chainId")]
    pub chain_id: String,
    #[serde(rename = "dexId")]
    pub dex_id: String,
    pub url: Option<String>,
    #[serde(rename = "pairAddress")]
    pub pair_address: String,
    #[serde(rename = "baseToken")]
    pub base_token: BaseToken,
    #[serde(rename = "priceUsd")]
    pub price_usd: Option<String>,
    #[serde(rename = "priceChange")]
    pub price_change: Option<PriceChange>,
    pub volume: Option<Volume>,
    pub liquidity: Option<Liquidity>,
    pub fdv: Option<f64>,
    #[serde(rename = "buyTax")]
    pub buy_tax: Option<f64>,
    #[serde(rename = "sellTax")]
    pub sell_tax: Option<f64>,
    #[serde(rename = "pairCreatedAt")]
    pub pair_created_at: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairsResponse {
    pub pairs: Option<Vec<DexPair>>,
}

/// Where candidates come from each cycle. The scheduler only knows this
/// boundary; failures never cross it.
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn fetch_candidates(&self) -> Vec<TokenCandidate>;
}

pub struct DexScreenerSource {
    client: reqwest::Client,
    config: SourceConfig,
}

impl DexScreenerSource {
    pub fn new(config: SourceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    async fn try_fetch_candidates(&self) -> Result<Vec<TokenCandidate>> {
        let profiles = self.latest_profiles().await?;

        let fresh: Vec<_> = profiles
            .into_iter()
            .filter(|p| p.chain_id == self.config.chain_id)
            .take(self.config.profile_limit)
            .collect();

        debug!("{} fresh profiles on {}", fresh.len(), self.config.chain_id);

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();

        for profile in fresh {
            if !seen.insert(profile.token_address.clone()) {
                continue;
            }

            // One token's pair lookup failing should not sink the cycle
            let pair = match self.best_pair(&profile.token_address).await {
                Ok(Some(pair)) => pair,
                Ok(None) => continue,
                Err(e) => {
                    debug!("Pair lookup failed for {}: {}", profile.token_address, e);
                    continue;
                }
            };

            if let Some(candidate) = self.normalize(&pair) {
                candidates.push(candidate);
            }
        }

        Ok(candidates)
    }

    async fn latest_profiles(&self) -> Result<Vec<TokenProfile>> {
        let url = format!("{}/token-profiles/latest/v1", self.config.base_url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("profile request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(Error::SourceUnavailable(format!(
                "profile endpoint returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| Error::SourceMalformed(format!("profile payload: {}", e)))
    }

    /// The deepest pair on the target chain for a token, if any
    async fn best_pair(&self, token_address: &str) -> Result<Option<DexPair>> {
        let url = format!("{}/latest/dex/tokens/{}", self.config.base_url, token_address);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("pair request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(Error::SourceUnavailable(format!(
                "pair endpoint returned {}",
                resp.status()
            )));
        }

        let data: TokenPairsResponse = resp
            .json()
            .await
            .map_err(|e| Error::SourceMalformed(format!("pair payload: {}", e)))?;

        let pair = data.pairs.unwrap_or_default().into_iter()
            .filter(|p| p.chain_id == self.config.chain_id)
            .max_by(|a, b| {
                let la = a.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0);
                let lb = b.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0);
                la.total_cmp(&lb)
            });

        Ok(pair)
    }

    /// Normalize one raw pair into a candidate. Returns None for records the
    /// pipeline must never see: wrong chain, empty symbol/address, or a
    /// symbol in the exclusion set.
    pub fn normalize(&self, pair: &DexPair) -> Option<TokenCandidate> {
        if pair.chain_id != self.config.chain_id {
            return None;
        }

        let symbol = pair.base_token.symbol.clone().unwrap_or_default();
        let address = pair.base_token.address.clone();
        if symbol.is_empty() || address.is_empty() {
            return None;
        }

        if self
            .config
            .excluded_symbols
            .iter()
            .any(|s| s.eq_ignore_ascii_case(&symbol))
        {
            return None;
        }

        Some(TokenCandidate {
            symbol,
            name: pair.base_token.name.clone().unwrap_or_default(),
            address,
            pair_address: if pair.pair_address.is_empty() {
                None
            } else {
                Some(pair.pair_address.clone())
            },
            price_usd: pair
                .price_usd
                .as_deref()
                .and_then(|p| p.parse().ok())
                .unwrap_or(0.0),
            liquidity_usd: pair.liquidity.as_ref().and_then(|l| l.usd).unwrap_or(0.0),
            fdv_usd: pair.fdv.unwrap_or(0.0),
            price_change_h1_pct: pair
                .price_change
                .as_ref()
                .and_then(|pc| pc.h1)
                .unwrap_or(0.0),
            buy_tax_pct: pair.buy_tax.unwrap_or(0.0),
            sell_tax_pct: pair.sell_tax.unwrap_or(0.0),
            volume_h1_usd: pair.volume.as_ref().and_then(|v| v.h1).unwrap_or(0.0),
            volume_h24_usd: pair.volume.as_ref().and_then(|v| v.h24).unwrap_or(0.0),
            created_at: pair
                .pair_created_at
                .and_then(chrono::DateTime::from_timestamp_millis),
            url: pair.url.clone(),
        })
    }
}

#[async_trait]
impl CandidateSource for DexScreenerSource {
    /// Fetch and normalize this cycle's candidates.
    ///
    /// Never fails at this boundary: `SourceUnavailable` and
    /// `SourceMalformed` are logged and become an empty list.
    async fn fetch_candidates(&self) -> Vec<TokenCandidate> {
        match self.try_fetch_candidates().await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Candidate fetch failed, skipping cycle: {}", e);
                Vec::new()
            }
        }
    }
}

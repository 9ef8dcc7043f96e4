//! Read-only chain intel client backing the on-chain gates
//!
//! Three logical queries, each one HTTP round trip:
//! - top holders by balance for a mint (holder concentration, LP lock)
//! - mint account info (authority renouncement)
//! - recent trades touching a pair account (honeypot heuristic)
//!
//! Endpoints are provider-specific and swappable; the gates depend only on
//! the `ChainIntel` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::ChainConfig;
use crate::error::{Error, Result};

/// One holder row, largest first
#[derive(Debug, Clone)]
pub struct TokenHolder {
    pub address: String,
    pub amount: u64,
    /// Share of the observed (queried) supply, 0..=100
    pub pct_of_observed_supply: f64,
}

/// Parsed mint account info
#[derive(Debug, Clone)]
pub struct MintInfo {
    pub mint: String,
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
    pub supply: u64,
    pub decimals: u8,
}

impl MintInfo {
    /// An authority counts as renounced when it is absent or parked on a
    /// canonical null/system account.
    pub fn is_renounced(&self) -> bool {
        authority_is_null(&self.mint_authority) && authority_is_null(&self.freeze_authority)
    }
}

const NULL_AUTHORITIES: &[&str] = &[
    "11111111111111111111111111111111",
    "1nc1nerator11111111111111111111111111111111",
];

fn authority_is_null(authority: &Option<String>) -> bool {
    match authority {
        None => true,
        Some(a) => NULL_AUTHORITIES.contains(&a.as_str()),
    }
}

/// One historical trade, newest first
#[derive(Debug, Clone)]
pub struct TradeRecord {
    pub signature: String,
    pub is_buy: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

/// The logical queries the on-chain gates need
#[async_trait]
pub trait ChainIntel: Send + Sync {
    /// Top `limit` holders by balance for `mint`, largest first
    async fn token_holders(&self, mint: &str, limit: u32) -> Result<Vec<TokenHolder>>;

    /// Mint account authorities and supply
    async fn mint_info(&self, mint: &str) -> Result<MintInfo>;

    /// Most recent `limit` trades touching `account`
    async fn recent_trades(&self, account: &str, limit: u32) -> Result<Vec<TradeRecord>>;
}

/// HTTP implementation of [`ChainIntel`]
pub struct ChainClient {
    client: Client,
    rpc_url: String,
    rest_url: String,
    api_key: String,
    timeout: Duration,
}

impl ChainClient {
    pub fn new(config: &ChainConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            rpc_url: config.rpc_url.clone(),
            rest_url: config.rest_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            timeout,
        })
    }

    async fn rpc_call<T: serde::de::DeserializeOwned>(
        &self,
        request: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("RPC request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::SourceUnavailable(format!("RPC error {}", status)));
        }

        let rpc_response: RpcResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::SourceMalformed(format!("Failed to parse RPC response: {}", e)))?;

        if let Some(error) = rpc_response.error {
            return Err(Error::SourceUnavailable(format!(
                "RPC error {}: {}",
                error.code, error.message
            )));
        }

        rpc_response
            .result
            .ok_or_else(|| Error::SourceMalformed("No result in RPC response".to_string()))
    }
}

#[async_trait]
impl ChainIntel for ChainClient {
    async fn token_holders(&self, mint: &str, limit: u32) -> Result<Vec<TokenHolder>> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "memescout-holders",
            "method": "getTokenAccounts",
            "params": {
                "page": 1,
                "limit": limit,
                "mint": mint,
                "options": { "showZeroBalance": false }
            }
        });

        debug!("Fetching top holders for {}", mint);
        let result: TokenAccountsResult = self.rpc_call(request).await?;

        let mut holders: Vec<TokenHolder> = result
            .token_accounts
            .into_iter()
            .map(|account| TokenHolder {
                address: account.owner,
                amount: account.amount,
                pct_of_observed_supply: 0.0,
            })
            .collect();

        holders.sort_by(|a, b| b.amount.cmp(&a.amount));

        let total: u64 = holders.iter().map(|h| h.amount).sum();
        if total > 0 {
            for h in &mut holders {
                h.pct_of_observed_supply = h.amount as f64 / total as f64 * 100.0;
            }
        }

        Ok(holders)
    }

    async fn mint_info(&self, mint: &str) -> Result<MintInfo> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "memescout-mint",
            "method": "getAccountInfo",
            "params": [mint, { "encoding": "jsonParsed" }]
        });

        debug!("Fetching mint info for {}", mint);
        let result: AccountInfoResult = self.rpc_call(request).await?;

        let value = result
            .value
            .ok_or_else(|| Error::SourceMalformed("Mint account not found".to_string()))?;

        let info = value
            .data
            .parsed
            .and_then(|p| p.info)
            .ok_or_else(|| Error::SourceMalformed("Unparseable mint account".to_string()))?;

        Ok(MintInfo {
            mint: mint.to_string(),
            mint_authority: info.mint_authority,
            freeze_authority: info.freeze_authority,
            supply: info.supply.parse().unwrap_or(0),
            decimals: info.decimals,
        })
    }

    async fn recent_trades(&self, account: &str, limit: u32) -> Result<Vec<TradeRecord>> {
        let url = format!(
            "{}/v0/addresses/{}/transactions?api-key={}&limit={}",
            self.rest_url, account, self.api_key, limit
        );

        debug!("Fetching recent trades for {}", account);

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| Error::SourceUnavailable(format!("Trade history request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::SourceUnavailable(format!(
                "Trade history error {}",
                status
            )));
        }

        let transactions: Vec<EnhancedTransaction> = response.json().await.map_err(|e| {
            Error::SourceMalformed(format!("Failed to parse trade history: {}", e))
        })?;

        let trades = transactions
            .iter()
            .filter_map(|tx| classify_trade(tx, account))
            .collect();

        Ok(trades)
    }
}

/// Classify an enhanced transaction as a buy or sell relative to `pair`.
///
/// Explicit BUY/SELL types are trusted; for generic SWAPs the direction is
/// inferred from whether native funds flowed into the pair account.
fn classify_trade(tx: &EnhancedTransaction, pair: &str) -> Option<TradeRecord> {
    let tx_type = tx.tx_type.as_deref()?;
    let is_trade =
        tx_type.contains("SWAP") || tx_type.contains("BUY") || tx_type.contains("SELL");
    if !is_trade {
        return None;
    }

    let is_buy = if tx_type.contains("BUY") {
        true
    } else if tx_type.contains("SELL") {
        false
    } else {
        tx.native_transfers
            .as_ref()
            .map(|transfers| {
                transfers
                    .iter()
                    .any(|t| t.to_user_account.as_deref() == Some(pair))
            })
            .unwrap_or(false)
    };

    Some(TradeRecord {
        signature: tx.signature.clone(),
        is_buy,
        timestamp: tx.timestamp.and_then(|ts| DateTime::from_timestamp(ts, 0)),
    })
}

// ============ Provider response types ============

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i32,
    message: String,
}

#[derive(Debug, Deserialize)]
struct TokenAccountsResult {
    #[serde(rename = "token_accounts")]
    token_accounts: Vec<TokenAccount>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct TokenAccount {
    address: String,
    mint: String,
    owner: String,
    amount: u64,
}

#[derive(Debug, Deserialize)]
struct AccountInfoResult {
    value: Option<AccountValue>,
}

#[derive(Debug, Deserialize)]
struct AccountValue {
    data: AccountData,
}

#[derive(Debug, Deserialize)]
struct AccountData {
    parsed: Option<ParsedData>,
}

#[derive(Debug, Deserialize)]
struct ParsedData {
    info: Option<MintInfoData>,
}

#[derive(Debug, Deserialize)]
struct MintInfoData {
    decimals: u8,
    #[serde(rename = "freezeAuthority")]
    freeze_authority: Option<String>,
    #[serde(rename = "mintAuthority")]
    mint_authority: Option<String>,
    supply: String,
}

#[derive(Debug, Deserialize)]
struct EnhancedTransaction {
    signature: String,
    #[serde(rename = "type")]
    tx_type: Option<String>,
    timestamp: Option<i64>,
    #[serde(rename = "nativeTransfers")]
    native_transfers: Option<Vec<NativeTransfer>>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize)]
struct NativeTransfer {
    #[serde(rename = "fromUserAccount")]
    from_user_account: Option<String>,
    #[serde(rename = "toUserAccount")]
    to_user_account: Option<String>,
    amount: u64,
}

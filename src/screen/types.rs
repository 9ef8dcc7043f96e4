//! Core screening types shared by the adapter, gates and pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One token/pair observed at poll time, normalized from the source provider.
///
/// `symbol` and `address` are always non-empty; the adapter drops records
/// missing either. Every other field defaults to a neutral value (0 or None)
/// when the source omits it, and neutral values fail their gate closed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCandidate {
    pub symbol: String,
    pub name: String,
    /// Mint address of the base token
    pub address: String,
    /// Trading-pair account, when the source reports one
    pub pair_address: Option<String>,
    pub price_usd: f64,
    pub liquidity_usd: f64,
    /// Fully diluted valuation; 0 means unknown, which the ratio gate treats as unsafe
    pub fdv_usd: f64,
    pub price_change_h1_pct: f64,
    pub buy_tax_pct: f64,
    pub sell_tax_pct: f64,
    /// Rolling 1h volume; 0 means unknown
    pub volume_h1_usd: f64,
    /// Rolling 24h volume; 0 means unknown
    pub volume_h24_usd: f64,
    pub created_at: Option<DateTime<Utc>>,
    /// DexScreener dashboard deep link for the alert template
    pub url: Option<String>,
}

impl TokenCandidate {
    /// Key used by the volume trend store: pair account when known,
    /// otherwise the mint itself.
    pub fn trend_key(&self) -> &str {
        self.pair_address.as_deref().unwrap_or(&self.address)
    }

    /// Liquidity as a percentage of FDV. None when FDV is unknown.
    pub fn lp_ratio_pct(&self) -> Option<f64> {
        if self.fdv_usd > 0.0 {
            Some(self.liquidity_usd / self.fdv_usd * 100.0)
        } else {
            None
        }
    }
}

/// Result of one gate check for one candidate.
///
/// Indeterminate means the gate could not decide (source error or missing
/// data) and is treated identically to Fail by the pipeline. Skipped marks
/// gates never run because an earlier gate short-circuited the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateVerdict {
    Pass,
    Fail { reason: String },
    Indeterminate { reason: String },
    Skipped,
}

impl GateVerdict {
    pub fn fail(reason: impl Into<String>) -> Self {
        GateVerdict::Fail {
            reason: reason.into(),
        }
    }

    pub fn indeterminate(reason: impl Into<String>) -> Self {
        GateVerdict::Indeterminate {
            reason: reason.into(),
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, GateVerdict::Pass)
    }
}

impl std::fmt::Display for GateVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateVerdict::Pass => write!(f, "pass"),
            GateVerdict::Fail { reason } => write!(f, "fail: {}", reason),
            GateVerdict::Indeterminate { reason } => write!(f, "indeterminate: {}", reason),
            GateVerdict::Skipped => write!(f, "skipped"),
        }
    }
}

/// One (gate, verdict) entry in the order the pipeline holds its gates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateOutcome {
    pub gate: &'static str,
    pub verdict: GateVerdict,
}

/// Aggregate screening verdict for one candidate in one cycle
#[derive(Debug, Clone)]
pub struct ScreeningResult {
    pub candidate: TokenCandidate,
    /// One outcome per configured gate, executed or Skipped
    pub outcomes: Vec<GateOutcome>,
    /// True iff every gate ran to completion with Pass
    pub accepted: bool,
}

impl ScreeningResult {
    /// The gate that stopped the pipeline, if any
    pub fn rejected_by(&self) -> Option<&GateOutcome> {
        self.outcomes
            .iter()
            .find(|o| matches!(o.verdict, GateVerdict::Fail { .. } | GateVerdict::Indeterminate { .. }))
    }
}

#[cfg(test)]
pub(crate) fn test_candidate(symbol: &str, liquidity_usd: f64, fdv_usd: f64) -> TokenCandidate {
    TokenCandidate {
        symbol: symbol.to_string(),
        name: format!("{} Coin", symbol),
        address: "DogoMint1111111111111111111111111111111111".to_string(),
        pair_address: Some("DogoPair1111111111111111111111111111111111".to_string()),
        price_usd: 0.0001,
        liquidity_usd,
        fdv_usd,
        price_change_h1_pct: 4.2,
        buy_tax_pct: 1.0,
        sell_tax_pct: 1.0,
        volume_h1_usd: 9_000.0,
        volume_h24_usd: 60_000.0,
        created_at: None,
        url: Some("https://dexscreener.com/solana/dogo".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lp_ratio() {
        let c = test_candidate("DOGO", 60_000.0, 400_000.0);
        assert_eq!(c.lp_ratio_pct(), Some(15.0));

        let unknown_cap = test_candidate("DOGO", 60_000.0, 0.0);
        assert_eq!(unknown_cap.lp_ratio_pct(), None);
    }

    #[test]
    fn test_trend_key_falls_back_to_mint() {
        let mut c = test_candidate("DOGO", 1.0, 1.0);
        assert_eq!(c.trend_key(), "DogoPair1111111111111111111111111111111111");
        c.pair_address = None;
        assert_eq!(c.trend_key(), "DogoMint1111111111111111111111111111111111");
    }

    #[test]
    fn test_rejected_by_finds_first_non_pass() {
        let result = ScreeningResult {
            candidate: test_candidate("DOGO", 1.0, 1.0),
            outcomes: vec![
                GateOutcome {
                    gate: "liquidity_floor",
                    verdict: GateVerdict::Pass,
                },
                GateOutcome {
                    gate: "lp_ratio",
                    verdict: GateVerdict::fail("too thin"),
                },
                GateOutcome {
                    gate: "tax_bounds",
                    verdict: GateVerdict::Skipped,
                },
            ],
            accepted: false,
        };
        assert_eq!(result.rejected_by().unwrap().gate, "lp_ratio");
    }
}

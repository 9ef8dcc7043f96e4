//! Network-bound gates: holder concentration, mint renouncement, LP lock
//! and the honeypot trade-history heuristic
//!
//! Each gate issues one logical query through [`ChainIntel`] and converts any
//! provider failure into Indeterminate. No retries here; a failed call is a
//! failed check for this cycle and the pair gets another chance next poll.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::chain::ChainIntel;
use crate::screen::gates::Gate;
use crate::screen::types::{GateVerdict, TokenCandidate};

/// Fail when a single wallet controls more than the allowed share of the
/// observed supply.
pub struct HolderConcentrationGate {
    pub intel: Arc<dyn ChainIntel>,
    pub max_holder_supply_pct: f64,
    pub holder_query_limit: u32,
}

#[async_trait]
impl Gate for HolderConcentrationGate {
    fn name(&self) -> &'static str {
        "holder_concentration"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        let holders = match self
            .intel
            .token_holders(&candidate.address, self.holder_query_limit)
            .await
        {
            Ok(holders) => holders,
            Err(e) => {
                debug!("Holder lookup failed for {}: {}", candidate.symbol, e);
                return GateVerdict::indeterminate(format!("holder lookup failed: {}", e));
            }
        };

        let Some(top) = holders.first() else {
            return GateVerdict::indeterminate("provider returned no holders");
        };

        if top.pct_of_observed_supply > self.max_holder_supply_pct {
            GateVerdict::fail(format!(
                "top holder owns {:.1}% of observed supply (max {:.1}%)",
                top.pct_of_observed_supply, self.max_holder_supply_pct
            ))
        } else {
            GateVerdict::Pass
        }
    }
}

/// Pass only when mint and freeze authority are renounced, so the deployer
/// can neither print supply nor freeze holders.
pub struct RenouncementGate {
    pub intel: Arc<dyn ChainIntel>,
}

#[async_trait]
impl Gate for RenouncementGate {
    fn name(&self) -> &'static str {
        "mint_renounced"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        match self.intel.mint_info(&candidate.address).await {
            Ok(info) if info.is_renounced() => GateVerdict::Pass,
            Ok(info) => {
                let authority = info
                    .mint_authority
                    .or(info.freeze_authority)
                    .unwrap_or_default();
                GateVerdict::fail(format!("live authority {}", authority))
            }
            Err(e) => GateVerdict::indeterminate(format!("mint lookup failed: {}", e)),
        }
    }
}

/// Heuristic LP-lock check: the pair's LP tokens must sit with a recognized
/// locker or burner account. String/address match, not a lock-contract audit.
pub struct LpLockGate {
    pub intel: Arc<dyn ChainIntel>,
    pub known_lockers: Vec<String>,
    pub holder_query_limit: u32,
}

impl LpLockGate {
    fn is_recognized_locker(&self, address: &str) -> bool {
        let lower = address.to_lowercase();
        self.known_lockers
            .iter()
            .any(|l| address == l || lower.contains(&l.to_lowercase()))
    }
}

#[async_trait]
impl Gate for LpLockGate {
    fn name(&self) -> &'static str {
        "lp_lock"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        let Some(pair) = candidate.pair_address.as_deref() else {
            return GateVerdict::indeterminate("no pair account reported by source");
        };

        let holders = match self.intel.token_holders(pair, self.holder_query_limit).await {
            Ok(holders) => holders,
            Err(e) => return GateVerdict::indeterminate(format!("LP holder lookup failed: {}", e)),
        };

        if holders.is_empty() {
            return GateVerdict::indeterminate("provider returned no LP holders");
        }

        if holders.iter().any(|h| self.is_recognized_locker(&h.address)) {
            GateVerdict::Pass
        } else {
            GateVerdict::fail("LP tokens not held by a recognized locker")
        }
    }
}

/// Asymmetric-trade honeypot heuristic: a token people buy but nobody has
/// ever sold is assumed unsellable. Not a contract simulation.
pub struct HoneypotGate {
    pub intel: Arc<dyn ChainIntel>,
    pub trade_window: u32,
}

#[async_trait]
impl Gate for HoneypotGate {
    fn name(&self) -> &'static str {
        "honeypot"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        let account = candidate.trend_key();

        let trades = match self.intel.recent_trades(account, self.trade_window).await {
            Ok(trades) => trades,
            Err(e) => return GateVerdict::indeterminate(format!("trade lookup failed: {}", e)),
        };

        if trades.is_empty() {
            return GateVerdict::indeterminate("no trade history yet");
        }

        let buys = trades.iter().filter(|t| t.is_buy).count();
        let sells = trades.len() - buys;

        if buys > 0 && sells == 0 {
            GateVerdict::fail(format!("{} buys and zero sells in recent history", buys))
        } else {
            GateVerdict::Pass
        }
    }
}

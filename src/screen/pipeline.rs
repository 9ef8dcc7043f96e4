//! The screening pipeline: fixed gate order, short-circuit, fail-closed

use std::sync::Arc;
use tracing::debug;

use crate::chain::ChainIntel;
use crate::config::ScreeningConfig;
use crate::screen::gates::{
    FdvCapGate, Gate, LiquidityFloorGate, LpRatioGate, NameKeywordGate, PriceTrendGate,
    TaxBoundsGate, VolumeFloorGate,
};
use crate::screen::onchain::{HolderConcentrationGate, HoneypotGate, LpLockGate, RenouncementGate};
use crate::screen::types::{GateOutcome, GateVerdict, ScreeningResult, TokenCandidate};
use crate::screen::volume::{VolumePumpGate, VolumeTrendStore};

/// Runs every gate against a candidate, in order, stopping at the first
/// non-Pass verdict. The order puts purely numeric gates ahead of gates that
/// cost a network round trip, so trivially bad candidates burn no quota.
pub struct ScreeningPipeline {
    gates: Vec<Box<dyn Gate>>,
}

impl ScreeningPipeline {
    /// Standard gate lineup from configuration
    pub fn from_config(
        config: &ScreeningConfig,
        intel: Arc<dyn ChainIntel>,
        store: Arc<VolumeTrendStore>,
    ) -> Self {
        let gates: Vec<Box<dyn Gate>> = vec![
            Box::new(LiquidityFloorGate {
                min_liquidity_usd: config.min_liquidity_usd,
            }),
            Box::new(LpRatioGate {
                min_lp_ratio_pct: config.min_lp_ratio_pct,
            }),
            Box::new(TaxBoundsGate {
                max_tax_pct: config.max_tax_pct,
            }),
            Box::new(NameKeywordGate {
                keywords: config.name_keywords.clone(),
            }),
            Box::new(VolumeFloorGate {
                min_volume_h1_usd: config.min_volume_h1_usd,
                min_volume_h24_usd: config.min_volume_h24_usd,
            }),
            Box::new(FdvCapGate {
                max_fdv_usd: config.max_fdv_usd,
            }),
            Box::new(PriceTrendGate {
                min_price_change_h1_pct: config.min_price_change_h1_pct,
            }),
            Box::new(HolderConcentrationGate {
                intel: Arc::clone(&intel),
                max_holder_supply_pct: config.max_holder_supply_pct,
                holder_query_limit: config.holder_query_limit,
            }),
            Box::new(RenouncementGate {
                intel: Arc::clone(&intel),
            }),
            Box::new(LpLockGate {
                intel: Arc::clone(&intel),
                known_lockers: config.known_lockers.clone(),
                holder_query_limit: config.holder_query_limit,
            }),
            Box::new(HoneypotGate {
                intel,
                trade_window: config.honeypot_trade_window,
            }),
            Box::new(VolumePumpGate { store }),
        ];

        Self { gates }
    }

    /// Custom gate lineup; order is execution order
    pub fn with_gates(gates: Vec<Box<dyn Gate>>) -> Self {
        Self { gates }
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    /// Screen one candidate. Accept only if every gate passes; the first
    /// Fail or Indeterminate short-circuits and the remaining gates are
    /// recorded as Skipped.
    pub async fn screen(&self, candidate: &TokenCandidate) -> ScreeningResult {
        let mut outcomes = Vec::with_capacity(self.gates.len());
        let mut rejected = false;

        for gate in &self.gates {
            if rejected {
                outcomes.push(GateOutcome {
                    gate: gate.name(),
                    verdict: GateVerdict::Skipped,
                });
                continue;
            }

            let verdict = gate.check(candidate).await;
            debug!("{}: {} -> {}", candidate.symbol, gate.name(), verdict);

            if !verdict.is_pass() {
                rejected = true;
            }
            outcomes.push(GateOutcome {
                gate: gate.name(),
                verdict,
            });
        }

        ScreeningResult {
            candidate: candidate.clone(),
            accepted: !rejected,
            outcomes,
        }
    }
}

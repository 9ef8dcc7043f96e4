//! The gate abstraction and the cheap, purely numeric gates
//!
//! A gate inspects one candidate and answers pass/fail/indeterminate. Gates
//! never panic and never propagate errors; anything they cannot decide is
//! Indeterminate, which the pipeline treats as a failure (fail-closed).
//!
//! The gates in this file need nothing beyond the candidate record itself,
//! which is why the pipeline runs them before any network-bound gate.

use async_trait::async_trait;

use crate::screen::types::{GateVerdict, TokenCandidate};

#[async_trait]
pub trait Gate: Send + Sync {
    fn name(&self) -> &'static str;
    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict;
}

/// Fail any pair whose USD liquidity sits below the floor. A missing
/// liquidity field arrives as 0 and fails here by construction.
pub struct LiquidityFloorGate {
    pub min_liquidity_usd: f64,
}

#[async_trait]
impl Gate for LiquidityFloorGate {
    fn name(&self) -> &'static str {
        "liquidity_floor"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        if candidate.liquidity_usd < self.min_liquidity_usd {
            GateVerdict::fail(format!(
                "liquidity ${:.0} below floor ${:.0}",
                candidate.liquidity_usd, self.min_liquidity_usd
            ))
        } else {
            GateVerdict::Pass
        }
    }
}

/// Guard against thin-liquidity rug setups: liquidity must be at least
/// `min_lp_ratio_pct` percent of FDV. Unknown FDV (0) is unsafe and fails.
pub struct LpRatioGate {
    pub min_lp_ratio_pct: f64,
}

#[async_trait]
impl Gate for LpRatioGate {
    fn name(&self) -> &'static str {
        "lp_ratio"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        match candidate.lp_ratio_pct() {
            None => GateVerdict::fail("FDV unknown, cannot establish LP ratio"),
            Some(ratio) if ratio < self.min_lp_ratio_pct => GateVerdict::fail(format!(
                "LP ratio {:.2}% below minimum {:.2}%",
                ratio, self.min_lp_ratio_pct
            )),
            Some(_) => GateVerdict::Pass,
        }
    }
}

/// Require the token's name or symbol to contain one of the configured
/// memecoin keywords. An empty keyword list disables the filter.
pub struct NameKeywordGate {
    pub keywords: Vec<String>,
}

#[async_trait]
impl Gate for NameKeywordGate {
    fn name(&self) -> &'static str {
        "name_keywords"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        if self.keywords.is_empty() {
            return GateVerdict::Pass;
        }

        let name = candidate.name.to_lowercase();
        let symbol = candidate.symbol.to_lowercase();
        if self
            .keywords
            .iter()
            .any(|k| name.contains(&k.to_lowercase()) || symbol.contains(&k.to_lowercase()))
        {
            GateVerdict::Pass
        } else {
            GateVerdict::fail("name/symbol matches no configured keyword")
        }
    }
}

/// Fail pairs that nobody is actually trading: 1h and 24h volume must both
/// clear their floors. Missing volume arrives as 0 and fails here.
pub struct VolumeFloorGate {
    pub min_volume_h1_usd: f64,
    pub min_volume_h24_usd: f64,
}

#[async_trait]
impl Gate for VolumeFloorGate {
    fn name(&self) -> &'static str {
        "volume_floor"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        if candidate.volume_h1_usd < self.min_volume_h1_usd {
            GateVerdict::fail(format!(
                "1h volume ${:.0} below floor ${:.0}",
                candidate.volume_h1_usd, self.min_volume_h1_usd
            ))
        } else if candidate.volume_h24_usd < self.min_volume_h24_usd {
            GateVerdict::fail(format!(
                "24h volume ${:.0} below floor ${:.0}",
                candidate.volume_h24_usd, self.min_volume_h24_usd
            ))
        } else {
            GateVerdict::Pass
        }
    }
}

/// Low-cap hunt: reject anything already valued above the cap. Unknown FDV
/// (0) passes through here and is rejected by the ratio gate instead.
pub struct FdvCapGate {
    pub max_fdv_usd: f64,
}

#[async_trait]
impl Gate for FdvCapGate {
    fn name(&self) -> &'static str {
        "fdv_cap"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        if candidate.fdv_usd > self.max_fdv_usd {
            GateVerdict::fail(format!(
                "FDV ${:.0} above cap ${:.0}",
                candidate.fdv_usd, self.max_fdv_usd
            ))
        } else {
            GateVerdict::Pass
        }
    }
}

/// Reject tokens already dumping: 1h price change must stay above the
/// configured floor. A missing change arrives as 0 and passes.
pub struct PriceTrendGate {
    pub min_price_change_h1_pct: f64,
}

#[async_trait]
impl Gate for PriceTrendGate {
    fn name(&self) -> &'static str {
        "price_trend"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        if candidate.price_change_h1_pct < self.min_price_change_h1_pct {
            GateVerdict::fail(format!(
                "1h price change {:.1}% below floor {:.1}%",
                candidate.price_change_h1_pct, self.min_price_change_h1_pct
            ))
        } else {
            GateVerdict::Pass
        }
    }
}

/// Reject pairs whose buy or sell tax exceeds the bound. The provider does
/// not report taxes for most pairs; 0 is the safe direction for an
/// upper-bound check.
pub struct TaxBoundsGate {
    pub max_tax_pct: f64,
}

#[async_trait]
impl Gate for TaxBoundsGate {
    fn name(&self) -> &'static str {
        "tax_bounds"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        if candidate.buy_tax_pct > self.max_tax_pct {
            GateVerdict::fail(format!(
                "buy tax {:.1}% exceeds {:.1}%",
                candidate.buy_tax_pct, self.max_tax_pct
            ))
        } else if candidate.sell_tax_pct > self.max_tax_pct {
            GateVerdict::fail(format!(
                "sell tax {:.1}% exceeds {:.1}%",
                candidate.sell_tax_pct, self.max_tax_pct
            ))
        } else {
            GateVerdict::Pass
        }
    }
}

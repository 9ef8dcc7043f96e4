//! End-to-end screening scenarios against the full gate lineup, with the
//! chain intel boundary stubbed out

use async_trait::async_trait;
use std::sync::Arc;

use memescout::chain::{ChainIntel, MintInfo, TokenHolder, TradeRecord};
use memescout::config::ScreeningConfig;
use memescout::error::Result;
use memescout::screen::{GateVerdict, ScreeningPipeline, TokenCandidate, VolumeTrendStore};

const MINT: &str = "DogoMint1111111111111111111111111111111111";
const PAIR: &str = "DogoPair1111111111111111111111111111111111";
const INCINERATOR: &str = "1nc1nerator11111111111111111111111111111111";

/// Healthy-by-default intel: balanced holders, renounced mint, burned LP,
/// two-sided trade history. Tests override single aspects.
struct FakeIntel {
    top_holder_pct: f64,
    mint_authority: Option<String>,
    lp_held_by_locker: bool,
    sells_present: bool,
}

impl Default for FakeIntel {
    fn default() -> Self {
        Self {
            top_holder_pct: 12.0,
            mint_authority: None,
            lp_held_by_locker: true,
            sells_present: true,
        }
    }
}

#[async_trait]
impl ChainIntel for FakeIntel {
    async fn token_holders(&self, mint: &str, _limit: u32) -> Result<Vec<TokenHolder>> {
        if mint == PAIR {
            // LP token holders
            let owner = if self.lp_held_by_locker {
                INCINERATOR
            } else {
                "DevWa11et111111111111111111111111111111111"
            };
            return Ok(vec![TokenHolder {
                address: owner.to_string(),
                amount: 1_000,
                pct_of_observed_supply: 100.0,
            }]);
        }

        // Base token holders: top holder at the configured share, rest spread
        let rest = 100.0 - self.top_holder_pct;
        Ok(vec![
            TokenHolder {
                address: "TopHo1der1111111111111111111111111111111111".into(),
                amount: (self.top_holder_pct * 100.0) as u64,
                pct_of_observed_supply: self.top_holder_pct,
            },
            TokenHolder {
                address: "Retai1111111111111111111111111111111111111".into(),
                amount: (rest * 100.0) as u64,
                pct_of_observed_supply: rest,
            },
        ])
    }

    async fn mint_info(&self, mint: &str) -> Result<MintInfo> {
        Ok(MintInfo {
            mint: mint.to_string(),
            mint_authority: self.mint_authority.clone(),
            freeze_authority: None,
            supply: 1_000_000,
            decimals: 6,
        })
    }

    async fn recent_trades(&self, _account: &str, _limit: u32) -> Result<Vec<TradeRecord>> {
        let mut trades = vec![
            TradeRecord {
                signature: "buy1".into(),
                is_buy: true,
                timestamp: None,
            },
            TradeRecord {
                signature: "buy2".into(),
                is_buy: true,
                timestamp: None,
            },
        ];
        if self.sells_present {
            trades.push(TradeRecord {
                signature: "sell1".into(),
                is_buy: false,
                timestamp: None,
            });
        }
        Ok(trades)
    }
}

fn dogo() -> TokenCandidate {
    TokenCandidate {
        symbol: "DOGO".into(),
        name: "Dogo Coin".into(),
        address: MINT.into(),
        pair_address: Some(PAIR.into()),
        price_usd: 0.00015,
        liquidity_usd: 60_000.0,
        fdv_usd: 400_000.0,
        price_change_h1_pct: 8.0,
        buy_tax_pct: 1.0,
        sell_tax_pct: 1.0,
        volume_h1_usd: 9_000.0,
        volume_h24_usd: 60_000.0,
        created_at: None,
        url: Some("https://dexscreener.com/solana/dogo".into()),
    }
}

fn pipeline_with(intel: FakeIntel, store: Arc<VolumeTrendStore>) -> ScreeningPipeline {
    ScreeningPipeline::from_config(&ScreeningConfig::default(), Arc::new(intel), store)
}

fn verdict_of<'a>(
    result: &'a memescout::screen::ScreeningResult,
    gate: &str,
) -> &'a GateVerdict {
    &result
        .outcomes
        .iter()
        .find(|o| o.gate == gate)
        .unwrap_or_else(|| panic!("no outcome for gate {}", gate))
        .verdict
}

#[tokio::test]
async fn healthy_candidate_with_volume_pump_is_accepted() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    // Previous cycle saw 10k of 24h volume; 60k now is a 6x jump
    store.observe(PAIR, 10_000.0);

    let pipeline = pipeline_with(FakeIntel::default(), store);
    let result = pipeline.screen(&dogo()).await;

    assert!(result.accepted, "expected accept, got {:?}", result.outcomes);
    assert!(result.outcomes.iter().all(|o| o.verdict.is_pass()));
}

#[tokio::test]
async fn concentrated_holder_rejects_before_volume_gate() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    store.observe(PAIR, 10_000.0);

    let intel = FakeIntel {
        top_holder_pct: 70.0,
        ..FakeIntel::default()
    };
    let pipeline = pipeline_with(intel, Arc::clone(&store));
    let result = pipeline.screen(&dogo()).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "holder_concentration");
    // Short-circuit means the volume gate never ran and the stored baseline
    // was not touched by this cycle.
    assert_eq!(*verdict_of(&result, "volume_pump"), GateVerdict::Skipped);
}

#[tokio::test]
async fn liquidity_below_floor_skips_every_network_gate() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    let pipeline = pipeline_with(FakeIntel::default(), store);

    let mut candidate = dogo();
    candidate.liquidity_usd = 100.0;
    let result = pipeline.screen(&candidate).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "liquidity_floor");
    for gate in ["holder_concentration", "mint_renounced", "lp_lock", "honeypot", "volume_pump"] {
        assert_eq!(*verdict_of(&result, gate), GateVerdict::Skipped);
    }
}

#[tokio::test]
async fn non_meme_name_rejects_before_network_gates() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    let pipeline = pipeline_with(FakeIntel::default(), store);

    let mut candidate = dogo();
    candidate.name = "Acme Finance".into();
    candidate.symbol = "ACME".into();
    let result = pipeline.screen(&candidate).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "name_keywords");
    assert_eq!(*verdict_of(&result, "holder_concentration"), GateVerdict::Skipped);
}

#[tokio::test]
async fn high_cap_token_rejects_at_fdv_cap() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    let pipeline = pipeline_with(FakeIntel::default(), store);

    let mut candidate = dogo();
    candidate.fdv_usd = 5_000_000.0;
    let result = pipeline.screen(&candidate).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "fdv_cap");
}

#[tokio::test]
async fn dumping_price_rejects_at_price_trend() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    let pipeline = pipeline_with(FakeIntel::default(), store);

    let mut candidate = dogo();
    candidate.price_change_h1_pct = -45.0;
    let result = pipeline.screen(&candidate).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "price_trend");
}

#[tokio::test]
async fn thin_hourly_volume_rejects_at_volume_floor() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    let pipeline = pipeline_with(FakeIntel::default(), store);

    let mut candidate = dogo();
    candidate.volume_h1_usd = 200.0;
    let result = pipeline.screen(&candidate).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "volume_floor");
}

#[tokio::test]
async fn unknown_fdv_rejects_at_ratio_gate() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    let pipeline = pipeline_with(FakeIntel::default(), store);

    let mut candidate = dogo();
    candidate.fdv_usd = 0.0;
    let result = pipeline.screen(&candidate).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "lp_ratio");
}

#[tokio::test]
async fn live_mint_authority_rejects() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    store.observe(PAIR, 10_000.0);

    let intel = FakeIntel {
        mint_authority: Some("DevWa11et111111111111111111111111111111111".into()),
        ..FakeIntel::default()
    };
    let pipeline = pipeline_with(intel, store);
    let result = pipeline.screen(&dogo()).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "mint_renounced");
}

#[tokio::test]
async fn unlocked_lp_rejects() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    store.observe(PAIR, 10_000.0);

    let intel = FakeIntel {
        lp_held_by_locker: false,
        ..FakeIntel::default()
    };
    let pipeline = pipeline_with(intel, store);
    let result = pipeline.screen(&dogo()).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "lp_lock");
}

#[tokio::test]
async fn buys_without_sells_reject_as_honeypot() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    store.observe(PAIR, 10_000.0);

    let intel = FakeIntel {
        sells_present: false,
        ..FakeIntel::default()
    };
    let pipeline = pipeline_with(intel, store);
    let result = pipeline.screen(&dogo()).await;

    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "honeypot");
}

#[tokio::test]
async fn first_sighting_seeds_volume_and_rejects_this_cycle() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    let pipeline = pipeline_with(FakeIntel::default(), Arc::clone(&store));

    let result = pipeline.screen(&dogo()).await;
    assert!(!result.accepted);
    assert_eq!(result.rejected_by().unwrap().gate, "volume_pump");
    assert!(matches!(
        verdict_of(&result, "volume_pump"),
        GateVerdict::Indeterminate { .. }
    ));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn steady_volume_rejects_on_later_cycles() {
    let store = Arc::new(VolumeTrendStore::new(5.0));
    store.observe(PAIR, 50_000.0);

    let pipeline = pipeline_with(FakeIntel::default(), store);
    // 60k against a 50k baseline is only 1.2x
    let result = pipeline.screen(&dogo()).await;

    assert!(!result.accepted);
    assert!(matches!(
        verdict_of(&result, "volume_pump"),
        GateVerdict::Fail { .. }
    ));
}

//! Volume trend tracking and the pump gate
//!
//! The only stateful gate. The store maps a pair key to the last 24h volume
//! it was seen with; a pump is a new reading at least `multiple` times the
//! stored baseline. State lives and dies with the process.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;

use crate::screen::gates::Gate;
use crate::screen::types::{GateVerdict, TokenCandidate};

/// Last observation for one pair
#[derive(Debug, Clone)]
pub struct VolumeRecord {
    pub volume_h24_usd: f64,
    pub observed_at: DateTime<Utc>,
}

/// What one observation meant relative to the stored baseline
#[derive(Debug, Clone, PartialEq)]
pub enum VolumeTrend {
    /// No baseline existed; this reading seeded the store
    FirstSighting,
    /// Reading was at least `multiple` times the baseline
    Pump { ratio: f64 },
    /// Reading below the pump threshold; baseline replaced
    NoPump { ratio: f64 },
}

/// In-memory map of last-seen 24h volume per pair.
///
/// Entries are created on first sighting and replaced every cycle the pair
/// reappears; nothing is evicted, so entries for pairs that stop appearing
/// linger harmlessly until shutdown. The DashMap entry API keeps the
/// read-then-write for a single key atomic under concurrent screening.
pub struct VolumeTrendStore {
    records: DashMap<String, VolumeRecord>,
    pump_multiple: f64,
}

impl VolumeTrendStore {
    pub fn new(pump_multiple: f64) -> Self {
        Self {
            records: DashMap::new(),
            pump_multiple,
        }
    }

    /// Record `volume_h24_usd` for `key` and report how it compares to the
    /// previous observation. The stored value is always replaced with the
    /// current reading, pump or not.
    pub fn observe(&self, key: &str, volume_h24_usd: f64) -> VolumeTrend {
        let now = Utc::now();
        let mut trend = VolumeTrend::FirstSighting;

        self.records
            .entry(key.to_string())
            .and_modify(|record| {
                let ratio = if record.volume_h24_usd > 0.0 {
                    volume_h24_usd / record.volume_h24_usd
                } else {
                    f64::INFINITY
                };
                trend = if ratio >= self.pump_multiple {
                    VolumeTrend::Pump { ratio }
                } else {
                    VolumeTrend::NoPump { ratio }
                };
                record.volume_h24_usd = volume_h24_usd;
                record.observed_at = now;
            })
            .or_insert_with(|| VolumeRecord {
                volume_h24_usd,
                observed_at: now,
            });

        trend
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Pass only when the pair's 24h volume jumped by the configured multiple
/// since the last cycle it was seen. First sightings seed the baseline and
/// are Indeterminate; an unknown current volume is Indeterminate and leaves
/// the stored baseline untouched.
pub struct VolumePumpGate {
    pub store: Arc<VolumeTrendStore>,
}

#[async_trait]
impl Gate for VolumePumpGate {
    fn name(&self) -> &'static str {
        "volume_pump"
    }

    async fn check(&self, candidate: &TokenCandidate) -> GateVerdict {
        if candidate.volume_h24_usd <= 0.0 {
            return GateVerdict::indeterminate("24h volume unknown");
        }

        match self.store.observe(candidate.trend_key(), candidate.volume_h24_usd) {
            VolumeTrend::FirstSighting => {
                GateVerdict::indeterminate("first sighting, volume baseline seeded")
            }
            VolumeTrend::Pump { ratio } => {
                tracing::debug!(
                    "{}: volume pump {:.1}x over baseline",
                    candidate.symbol,
                    ratio
                );
                GateVerdict::Pass
            }
            VolumeTrend::NoPump { ratio } => {
                GateVerdict::fail(format!("volume only {:.2}x previous reading", ratio))
            }
        }
    }
}

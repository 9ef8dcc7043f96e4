//! Candidate screening
//!
//! Everything between "a pair came back from the source" and "accept or
//! reject": the gate abstraction, the individual checks, the volume trend
//! store and the pipeline that strings them together.

pub mod gates;
pub mod onchain;
pub mod pipeline;
pub mod types;
pub mod volume;

pub use gates::{
    FdvCapGate, Gate, LiquidityFloorGate, LpRatioGate, NameKeywordGate, PriceTrendGate,
    TaxBoundsGate, VolumeFloorGate,
};
pub use onchain::{HolderConcentrationGate, HoneypotGate, LpLockGate, RenouncementGate};
pub use pipeline::ScreeningPipeline;
pub use types::{GateOutcome, GateVerdict, ScreeningResult, TokenCandidate};
pub use volume::{VolumePumpGate, VolumeRecord, VolumeTrend, VolumeTrendStore};

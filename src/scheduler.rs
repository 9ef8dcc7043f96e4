//! Poll scheduler: fetch, screen, dispatch, sleep, repeat
//!
//! Two states: sleeping on the interval tick, or running one full cycle.
//! A cycle always completes and always returns to sleep, no matter how many
//! gates or candidates failed. No backoff and no circuit breaker: a dead
//! source yields empty cycles until it recovers. Ctrl-C is honored between
//! cycles only.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::alert::AlertDispatcher;
use crate::dexscreener::CandidateSource;
use crate::error::Result;
use crate::screen::ScreeningPipeline;

/// What one cycle did, for the summary log line
#[derive(Debug, Default, PartialEq)]
pub struct CycleSummary {
    pub candidates: usize,
    pub accepted: usize,
    pub alerts_sent: usize,
}

pub struct PollScheduler {
    source: Box<dyn CandidateSource>,
    pipeline: Arc<ScreeningPipeline>,
    dispatcher: Arc<AlertDispatcher>,
    poll_interval: Duration,
}

impl PollScheduler {
    pub fn new(
        source: Box<dyn CandidateSource>,
        pipeline: Arc<ScreeningPipeline>,
        dispatcher: Arc<AlertDispatcher>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            source,
            pipeline,
            dispatcher,
            poll_interval,
        }
    }

    /// Run forever, one cycle per interval tick, until Ctrl-C
    pub async fn run(&self) -> Result<()> {
        info!(
            "Scheduler started, polling every {}s",
            self.poll_interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let summary = self.run_cycle().await;
                    info!(
                        "Cycle done: {} candidates, {} accepted, {} alerts",
                        summary.candidates, summary.accepted, summary.alerts_sent
                    );
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        Ok(())
    }

    /// One full cycle: fetch, screen each candidate concurrently, dispatch
    /// accepted ones. Dispatch order across candidates is unspecified.
    pub async fn run_cycle(&self) -> CycleSummary {
        let candidates = self.source.fetch_candidates().await;
        debug!("Screening {} candidates", candidates.len());

        let results = join_all(
            candidates
                .iter()
                .map(|candidate| self.pipeline.screen(candidate)),
        )
        .await;

        let mut summary = CycleSummary {
            candidates: candidates.len(),
            ..Default::default()
        };

        for result in &results {
            if result.accepted {
                summary.accepted += 1;
                if self.dispatcher.dispatch(result).await {
                    summary.alerts_sent += 1;
                }
            } else if let Some(outcome) = result.rejected_by() {
                debug!(
                    "{} rejected at {}: {}",
                    result.candidate.symbol, outcome.gate, outcome.verdict
                );
            }
        }

        summary
    }
}

// src/scheduler.rs
use std::future::Future;
use std::time::Duration;

use tokio::time::{self, Instant, MissedTickBehavior};

use crate::checker::Checker;

#[derive(Clone, Copy, Debug)]
pub struct SchedulerCfg {
    /// Wait between the end of one cycle and the start of the next.
    pub check_interval: Duration,
    /// How often to log that we're still alive.
    pub tick_interval: Duration,
}

/// Run one cycle, logging instead of propagating a failed fetch.
pub async fn run_cycle(checker: &mut Checker) {
    if let Err(e) = checker.check().await {
        tracing::warn!(error = %e, "error checking sites, moving on");
    }
}

/// Check immediately, then every `check_interval` until `shutdown` resolves.
///
/// Cycles never overlap: the check timer is re-armed only once a cycle has
/// returned. Shutdown is observed at every wait point; a cycle in flight
/// finishes first. Returns the number of cycles run.
pub async fn run_until<F>(checker: &mut Checker, cfg: SchedulerCfg, shutdown: F) -> u64
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    let mut heartbeat = time::interval_at(Instant::now() + cfg.tick_interval, cfg.tick_interval);
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let next_check = time::sleep(Duration::ZERO);
    tokio::pin!(next_check);

    let mut cycles = 0u64;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!(cycles, "shutdown requested");
                return cycles;
            }
            _ = &mut next_check => {
                run_cycle(checker).await;
                cycles += 1;
                next_check.as_mut().reset(Instant::now() + cfg.check_interval);
            }
            _ = heartbeat.tick() => {
                tracing::info!(target: "heartbeat", cycles, "still watching");
            }
        }
    }
}

//! Periodic tick task driving the countdown engine

use std::sync::Arc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use crate::engine::EngineShared;

/// Tick once per engine period until this generation is superseded or the
/// countdown completes. The first tick fires one full period after start.
pub(crate) async fn ticker_task(engine: Arc<EngineShared>, generation: u64) {
    let period = engine.period();
    debug!("Starting ticker generation {} ({:?} period)", generation, period);

    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        if !engine.tick(generation) {
            break;
        }
    }

    debug!("Ticker generation {} finished", generation);
}

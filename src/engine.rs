//! Countdown engine
//!
//! Owns the authoritative [`CountdownState`] and the single periodic tick
//! source that drives it. Every transition is published on a broadcast
//! channel (for listeners that care about individual events) and on a watch
//! channel (for views that only need the latest state).

use std::{
    fmt,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use serde::Serialize;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tracing::{debug, error, info};

use crate::{
    duration::format_time,
    state::{CountdownState, TickOutcome},
    tasks::ticker_task,
};

/// Interval between two ticks in production
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Receives the one-shot completion signal of a run.
///
/// Called from the ticker while the engine lock is held, so implementations
/// must not call back into the engine and must not block.
pub trait CompletionListener: Send + Sync {
    fn timer_completed(&self, state: &CountdownState);
}

/// State transitions published by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EngineEvent {
    DurationSet { total_seconds: u64 },
    Started { remaining_seconds: u64 },
    Tick { remaining_seconds: u64 },
    Stopped { remaining_seconds: u64 },
    Reset { remaining_seconds: u64 },
    Completed,
}

/// Handle to the currently active tick task
struct Ticker {
    generation: u64,
    handle: JoinHandle<()>,
}

struct EngineInner {
    state: CountdownState,
    ticker: Option<Ticker>,
    next_generation: u64,
}

impl EngineInner {
    fn cancel_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            debug!("Cancelling ticker generation {}", ticker.generation);
            ticker.handle.abort();
        }
    }
}

pub(crate) struct EngineShared {
    inner: Mutex<EngineInner>,
    events_tx: broadcast::Sender<EngineEvent>,
    state_tx: watch::Sender<CountdownState>,
    listener: Arc<dyn CompletionListener>,
    period: Duration,
}

impl EngineShared {
    fn lock(&self) -> Result<MutexGuard<'_, EngineInner>, String> {
        self.inner
            .lock()
            .map_err(|e| format!("Failed to lock countdown state: {}", e))
    }

    fn publish(&self, state: CountdownState, event: EngineEvent) {
        // No subscribers is the normal case when nobody is watching
        let _ = self.events_tx.send(event);
        self.state_tx.send_replace(state);
    }

    pub(crate) fn period(&self) -> Duration {
        self.period
    }

    /// Apply one tick on behalf of ticker `generation`.
    /// Returns whether that ticker should keep running.
    pub(crate) fn tick(&self, generation: u64) -> bool {
        let mut inner = match self.lock() {
            Ok(inner) => inner,
            Err(e) => {
                error!("{}", e);
                return false;
            }
        };

        if inner.ticker.as_ref().map(|t| t.generation) != Some(generation) {
            debug!("Ticker generation {} is stale, exiting", generation);
            return false;
        }

        match inner.state.tick() {
            TickOutcome::Idle => {
                inner.ticker = None;
                false
            }
            TickOutcome::Advanced(remaining) => {
                debug!("Tick: {} remaining", format_time(remaining));
                self.publish(inner.state, EngineEvent::Tick { remaining_seconds: remaining });
                true
            }
            TickOutcome::Completed => {
                // The ticker is this very task; dropping the handle detaches it
                inner.ticker = None;
                info!("Countdown completed");
                self.publish(inner.state, EngineEvent::Tick { remaining_seconds: 0 });
                self.publish(inner.state, EngineEvent::Completed);
                self.listener.timer_completed(&inner.state);
                false
            }
        }
    }
}

/// Cheaply cloneable handle to the countdown engine
#[derive(Clone)]
pub struct CountdownEngine {
    shared: Arc<EngineShared>,
}

impl CountdownEngine {
    /// Create an engine ticking once per second
    pub fn new(listener: Arc<dyn CompletionListener>) -> Self {
        Self::with_period(listener, TICK_PERIOD)
    }

    /// Create an engine with a custom tick period
    pub fn with_period(listener: Arc<dyn CompletionListener>, period: Duration) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, _) = watch::channel(CountdownState::new());

        Self {
            shared: Arc::new(EngineShared {
                inner: Mutex::new(EngineInner {
                    state: CountdownState::new(),
                    ticker: None,
                    next_generation: 0,
                }),
                events_tx,
                state_tx,
                listener,
                period,
            }),
        }
    }

    /// Current countdown state
    pub fn snapshot(&self) -> Result<CountdownState, String> {
        self.shared.lock().map(|inner| inner.state)
    }

    /// Subscribe to individual transitions
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.shared.events_tx.subscribe()
    }

    /// Watch the latest state, for re-rendering
    pub fn watch(&self) -> watch::Receiver<CountdownState> {
        self.shared.state_tx.subscribe()
    }

    /// Set a new duration; a running countdown is stopped first
    pub fn set_duration(&self, total_seconds: u64) -> Result<CountdownState, String> {
        let mut inner = self.shared.lock()?;
        if inner.state.is_running {
            info!("Duration changed while running, stopping countdown");
        }
        inner.cancel_ticker();
        inner.state.set_duration(total_seconds);
        info!("Duration set to {}", format_time(total_seconds));
        self.shared.publish(inner.state, EngineEvent::DurationSet { total_seconds });
        Ok(inner.state)
    }

    /// Start counting down. Starting while already running is a no-op.
    pub fn start(&self) -> Result<CountdownState, String> {
        let mut inner = self.shared.lock()?;
        if !inner.state.start()? {
            debug!("Start requested while already running, ignoring");
            return Ok(inner.state);
        }

        inner.cancel_ticker();
        let generation = inner.next_generation;
        inner.next_generation += 1;
        let handle = tokio::spawn(ticker_task(Arc::clone(&self.shared), generation));
        inner.ticker = Some(Ticker { generation, handle });

        let remaining = inner.state.remaining_seconds;
        info!("Countdown started at {}", format_time(remaining));
        self.shared.publish(inner.state, EngineEvent::Started { remaining_seconds: remaining });
        Ok(inner.state)
    }

    /// Stop counting down, keeping the remaining time
    pub fn stop(&self) -> Result<CountdownState, String> {
        let mut inner = self.shared.lock()?;
        inner.cancel_ticker();
        if inner.state.stop() {
            let remaining = inner.state.remaining_seconds;
            info!("Countdown stopped at {}", format_time(remaining));
            self.shared.publish(inner.state, EngineEvent::Stopped { remaining_seconds: remaining });
        }
        Ok(inner.state)
    }

    /// Stop and restore the last configured duration
    pub fn reset(&self) -> Result<CountdownState, String> {
        let mut inner = self.shared.lock()?;
        inner.cancel_ticker();
        inner.state.reset();
        let remaining = inner.state.remaining_seconds;
        info!("Countdown reset to {}", format_time(remaining));
        self.shared.publish(inner.state, EngineEvent::Reset { remaining_seconds: remaining });
        Ok(inner.state)
    }

    /// Stop ticking on process teardown
    pub fn shutdown(&self) {
        match self.stop() {
            Ok(_) => debug!("Countdown engine shut down"),
            Err(e) => error!("Failed to stop countdown on shutdown: {}", e),
        }
    }
}

impl fmt::Debug for CountdownEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CountdownEngine")
            .field("state", &self.snapshot())
            .field("period", &self.shared.period)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    #[derive(Default)]
    struct CountingListener {
        calls: AtomicUsize,
    }

    impl CountingListener {
        fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl CompletionListener for CountingListener {
        fn timer_completed(&self, state: &CountdownState) {
            assert_eq!(state.remaining_seconds, 0);
            assert!(!state.is_running);
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn engine() -> (CountdownEngine, Arc<CountingListener>) {
        let listener = Arc::new(CountingListener::default());
        (CountdownEngine::new(listener.clone()), listener)
    }

    fn drain(rx: &mut broadcast::Receiver<EngineEvent>) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn three_ticks_reach_zero_and_complete_once() {
        let (engine, listener) = engine();
        engine.set_duration(3).unwrap();
        let mut rx = engine.subscribe();
        engine.start().unwrap();

        sleep(Duration::from_millis(3500)).await;

        let events = drain(&mut rx);
        let ticks: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::Tick { remaining_seconds } => Some(*remaining_seconds),
                _ => None,
            })
            .collect();
        assert_eq!(ticks, vec![2, 1, 0]);
        assert_eq!(events.last(), Some(&EngineEvent::Completed));
        assert_eq!(
            events.iter().filter(|e| **e == EngineEvent::Completed).count(),
            1
        );
        assert_eq!(listener.count(), 1);

        let state = engine.snapshot().unwrap();
        assert_eq!(state.remaining_seconds, 0);
        assert!(!state.is_running);
        assert!(state.completed);

        // nothing keeps ticking afterwards
        sleep(Duration::from_secs(5)).await;
        assert!(drain(&mut rx).is_empty());
        assert_eq!(listener.count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn one_decrement_per_second() {
        let (engine, _) = engine();
        engine.set_duration(10).unwrap();
        engine.start().unwrap();

        sleep(Duration::from_millis(500)).await;
        assert_eq!(engine.snapshot().unwrap().remaining_seconds, 10);
        sleep(Duration::from_secs(1)).await;
        assert_eq!(engine.snapshot().unwrap().remaining_seconds, 9);
        sleep(Duration::from_secs(2)).await;
        assert_eq!(engine.snapshot().unwrap().remaining_seconds, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn starting_twice_keeps_a_single_tick_source() {
        let (engine, _) = engine();
        engine.set_duration(10).unwrap();
        engine.start().unwrap();
        engine.start().unwrap();

        sleep(Duration::from_millis(1500)).await;
        assert_eq!(engine.snapshot().unwrap().remaining_seconds, 9);

        engine.start().unwrap();
        sleep(Duration::from_secs(1)).await;
        assert_eq!(engine.snapshot().unwrap().remaining_seconds, 8);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_keeps_remaining_and_never_completes() {
        let (engine, listener) = engine();
        engine.set_duration(2).unwrap();
        let mut rx = engine.subscribe();
        engine.start().unwrap();

        sleep(Duration::from_millis(1500)).await;
        let state = engine.stop().unwrap();
        assert_eq!(state.remaining_seconds, 1);
        assert!(!state.is_running);

        sleep(Duration::from_secs(5)).await;
        assert_eq!(engine.snapshot().unwrap().remaining_seconds, 1);
        assert_eq!(listener.count(), 0);
        assert!(!drain(&mut rx).contains(&EngineEvent::Completed));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_restores_configured_duration() {
        let (engine, listener) = engine();
        engine.set_duration(10).unwrap();
        engine.start().unwrap();

        sleep(Duration::from_millis(3500)).await;
        assert_eq!(engine.snapshot().unwrap().remaining_seconds, 7);

        let state = engine.reset().unwrap();
        assert_eq!(state.remaining_seconds, 10);
        assert!(!state.is_running);

        sleep(Duration::from_secs(3)).await;
        assert_eq!(engine.snapshot().unwrap().remaining_seconds, 10);
        assert_eq!(listener.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_after_completion_needs_new_time() {
        let (engine, listener) = engine();
        engine.set_duration(1).unwrap();
        engine.start().unwrap();
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(listener.count(), 1);

        assert!(engine.start().is_err());

        engine.reset().unwrap();
        engine.start().unwrap();
        sleep(Duration::from_millis(1500)).await;
        assert_eq!(listener.count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn set_duration_while_running_stops_ticking() {
        let (engine, _) = engine();
        engine.set_duration(10).unwrap();
        engine.start().unwrap();
        sleep(Duration::from_millis(1500)).await;

        let state = engine.set_duration(30).unwrap();
        assert!(!state.is_running);
        sleep(Duration::from_secs(3)).await;
        assert_eq!(engine.snapshot().unwrap().remaining_seconds, 30);
    }

    #[tokio::test(start_paused = true)]
    async fn watch_reflects_latest_state() {
        let (engine, _) = engine();
        let rx = engine.watch();
        engine.set_duration(5).unwrap();
        engine.start().unwrap();
        sleep(Duration::from_millis(2500)).await;

        let state = *rx.borrow();
        assert_eq!(state.remaining_seconds, 3);
        assert!(state.is_running);
    }
}

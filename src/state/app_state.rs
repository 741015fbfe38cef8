//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::{CountdownState, NotificationSettings, SettingsStore};
use crate::{
    duration::{format_time, DurationInput},
    engine::CountdownEngine,
    services::Notifier,
    tasks::CompletionNotifier,
};

/// Main application state shared by all handlers
#[derive(Debug)]
pub struct AppState {
    /// Countdown engine (owns the countdown state and tick source)
    pub engine: CountdownEngine,
    /// Persisted notification settings
    pub settings: Arc<SettingsStore>,
    /// Push notification dispatcher, also used for test notifications
    pub notifier: Notifier,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create the application state and wire the completion hook into the engine
    pub fn new(
        port: u16,
        host: String,
        settings: SettingsStore,
        notifier: Notifier,
        desktop_notifications: bool,
    ) -> Self {
        let settings = Arc::new(settings);
        let listener = CompletionNotifier::new(
            Arc::clone(&settings),
            notifier.clone(),
            desktop_notifications,
        );
        Self::with_engine(port, host, settings, notifier, CountdownEngine::new(Arc::new(listener)))
    }

    /// Create the application state around an existing engine
    pub fn with_engine(
        port: u16,
        host: String,
        settings: Arc<SettingsStore>,
        notifier: Notifier,
        engine: CountdownEngine,
    ) -> Self {
        Self {
            engine,
            settings,
            notifier,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Set the countdown from user input, clamped to the entry ranges
    pub fn set_duration(&self, input: DurationInput) -> Result<CountdownState, String> {
        let clamped = input.clamped();
        if clamped != input {
            info!("Clamped duration input {:?} to {:?}", input, clamped);
        }
        let state = self.engine.set_duration(clamped.total_seconds())?;
        self.record_action("set-duration");
        Ok(state)
    }

    pub fn start_timer(&self) -> Result<CountdownState, String> {
        let state = self.engine.start()?;
        self.record_action("start");
        Ok(state)
    }

    pub fn stop_timer(&self) -> Result<CountdownState, String> {
        let state = self.engine.stop()?;
        self.record_action("stop");
        Ok(state)
    }

    pub fn reset_timer(&self) -> Result<CountdownState, String> {
        let state = self.engine.reset()?;
        self.record_action("reset");
        Ok(state)
    }

    /// Get current countdown state
    pub fn get_countdown_state(&self) -> Result<CountdownState, String> {
        self.engine.snapshot()
    }

    /// Get current notification settings
    pub fn get_settings(&self) -> NotificationSettings {
        self.settings.current()
    }

    /// Replace and persist the notification settings
    pub fn update_settings(&self, settings: NotificationSettings) -> Result<NotificationSettings, String> {
        self.settings
            .save(&settings)
            .map_err(|e| format!("Failed to save notification settings: {:#}", e))?;
        info!("Notification service set to {}", settings.service.as_str());
        self.record_action("update-settings");
        Ok(settings)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_time(self.start_time.elapsed().as_secs())
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Stop the countdown when the process is torn down
    pub fn shutdown(&self) {
        if let Ok(state) = self.engine.snapshot() {
            if state.is_running {
                warn!(
                    "Shutting down with {} left on the countdown",
                    format_time(state.remaining_seconds)
                );
            }
        }
        self.engine.shutdown();
    }
}

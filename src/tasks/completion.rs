//! Completion hook: push and desktop notifications when a countdown ends

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    engine::CompletionListener,
    services::{show_desktop_notification, Message, Notifier},
    state::{CountdownState, SettingsStore},
};

/// Fires the configured notifications without blocking the engine
#[derive(Debug)]
pub struct CompletionNotifier {
    settings: Arc<SettingsStore>,
    notifier: Notifier,
    desktop_notifications: bool,
}

impl CompletionNotifier {
    pub fn new(settings: Arc<SettingsStore>, notifier: Notifier, desktop_notifications: bool) -> Self {
        Self {
            settings,
            notifier,
            desktop_notifications,
        }
    }
}

impl CompletionListener for CompletionNotifier {
    fn timer_completed(&self, _state: &CountdownState) {
        let settings = self.settings.current();
        info!("Timer complete, notifying via {}", settings.service.as_str());

        let dispatch = self.notifier.dispatch_detached(settings, Message::completed());
        tokio::spawn(async move {
            match dispatch.await {
                Ok(outcome) if outcome.is_failure() => {
                    warn!("Completion notification failed: {:?}", outcome)
                }
                Ok(_) => {}
                Err(e) => warn!("Completion notification task failed: {}", e),
            }
        });

        if self.desktop_notifications {
            tokio::spawn(show_desktop_notification(Message::completed()));
        }
    }
}

//! Local desktop notification shown when a countdown completes

use notify_rust::{Notification, Timeout};
use tracing::{debug, warn};

use super::Message;

const APP_NAME: &str = "Countdown Bell";

/// Show a system notification. Missing notification daemons or refusals
/// are logged and otherwise ignored.
pub async fn show_desktop_notification(message: Message) {
    let result = tokio::task::spawn_blocking(move || {
        let mut notification = Notification::new();
        notification
            .appname(APP_NAME)
            .summary(&message.title)
            .body(&message.body)
            .timeout(Timeout::Default);
        #[cfg(all(unix, not(target_os = "macos")))]
        notification.urgency(notify_rust::Urgency::Critical);
        notification.show().map(|_| ())
    })
    .await;

    match result {
        Ok(Ok(())) => debug!("Desktop notification shown"),
        Ok(Err(e)) => warn!("Desktop notification unavailable: {}", e),
        Err(e) => warn!("Desktop notification task failed: {}", e),
    }
}

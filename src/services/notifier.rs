//! Push notification dispatch to Bark and ServerChan

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::state::{NotificationService, NotificationSettings, ServerChanCredential};

pub const DEFAULT_BARK_BASE: &str = "https://api.day.app";
/// `{id}` is replaced by the user's ServerChan id
pub const DEFAULT_SERVERCHAN_BASE: &str = "https://{id}.push.ft07.com";

/// Title and body of a push message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub title: String,
    pub body: String,
}

impl Message {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Sent when a countdown reaches zero
    pub fn completed() -> Self {
        Self::new("Timer Complete!", "Your timer has finished.")
    }

    /// Sent from the settings screen to check credentials
    pub fn test() -> Self {
        Self::new("Test Notification", "Notifications from your countdown timer are working.")
    }
}

/// What happened to a dispatch attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// No service selected, nothing sent
    Skipped,
    Delivered,
    Failed { reason: String },
}

impl DispatchOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, DispatchOutcome::Failed { .. })
    }
}

/// Base URLs of the push services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub bark_base: String,
    pub serverchan_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            bark_base: DEFAULT_BARK_BASE.to_string(),
            serverchan_base: DEFAULT_SERVERCHAN_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// `GET <base>/<key>/<message>?level=critical&volume=5`
    pub fn bark_url(&self, key: &str, message: &str) -> Result<Url, String> {
        let mut url = Url::parse(&self.bark_base)
            .map_err(|e| format!("Invalid Bark base URL {}: {}", self.bark_base, e))?;
        url.path_segments_mut()
            .map_err(|_| format!("Bark base URL cannot carry a path: {}", self.bark_base))?
            .pop_if_empty()
            .push(key)
            .push(message);
        url.query_pairs_mut()
            .append_pair("level", "critical")
            .append_pair("volume", "5");
        Ok(url)
    }

    /// `GET https://<id>.<host>/send/<key>.send?title=<title>&desp=<body>`
    pub fn serverchan_url(
        &self,
        credential: &ServerChanCredential,
        message: &Message,
    ) -> Result<Url, String> {
        let id = credential.id.trim();
        if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(format!("Invalid ServerChan id: {}", id));
        }

        let base = self.serverchan_base.replace("{id}", id);
        let mut url = Url::parse(&base)
            .map_err(|e| format!("Invalid ServerChan base URL {}: {}", base, e))?;
        url.path_segments_mut()
            .map_err(|_| format!("ServerChan base URL cannot carry a path: {}", base))?
            .pop_if_empty()
            .push("send")
            .push(&format!("{}.send", credential.key.trim()));
        url.query_pairs_mut()
            .append_pair("title", &message.title)
            .append_pair("desp", &message.body);
        Ok(url)
    }
}

/// Sends push notifications for the selected service
#[derive(Debug, Clone)]
pub struct Notifier {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl Notifier {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoints,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Build the request URL for the selected service.
    /// `Ok(None)` means no service is selected.
    pub fn request_url(
        &self,
        settings: &NotificationSettings,
        message: &Message,
    ) -> Result<Option<Url>, String> {
        match settings.service {
            NotificationService::None => Ok(None),
            NotificationService::Bark => {
                let key = settings
                    .bark_key()
                    .ok_or_else(|| "Bark key is not configured".to_string())?;
                self.endpoints.bark_url(key, &message.body).map(Some)
            }
            NotificationService::ServerChan => {
                let credential = settings
                    .serverchan()
                    .ok_or_else(|| "ServerChan id and key are not configured".to_string())?;
                self.endpoints.serverchan_url(credential, message).map(Some)
            }
        }
    }

    /// Send `message` through the selected service. Never fails; problems
    /// are reported in the outcome.
    pub async fn dispatch(
        &self,
        settings: &NotificationSettings,
        message: &Message,
    ) -> DispatchOutcome {
        let service = settings.service.as_str();
        let url = match self.request_url(settings, message) {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug!("No notification service selected, skipping dispatch");
                return DispatchOutcome::Skipped;
            }
            Err(reason) => {
                warn!("Cannot notify via {}: {}", service, reason);
                return DispatchOutcome::Failed { reason };
            }
        };

        debug!("Sending {} notification: {}", service, message.title);
        match self.client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                info!("{} notification delivered", service);
                DispatchOutcome::Delivered
            }
            Ok(response) => {
                let reason = format!("{} responded with HTTP {}", service, response.status());
                warn!("{}", reason);
                DispatchOutcome::Failed { reason }
            }
            Err(e) => {
                let reason = format!("{} request failed: {}", service, e);
                warn!("{}", reason);
                DispatchOutcome::Failed { reason }
            }
        }
    }

    /// Send the fixed test message
    pub async fn test(&self, settings: &NotificationSettings) -> DispatchOutcome {
        self.dispatch(settings, &Message::test()).await
    }

    /// Dispatch in the background; nobody has to await the handle
    pub fn dispatch_detached(
        &self,
        settings: NotificationSettings,
        message: Message,
    ) -> JoinHandle<DispatchOutcome> {
        let notifier = self.clone();
        tokio::spawn(async move { notifier.dispatch(&settings, &message).await })
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(Endpoints::default())
    }
}

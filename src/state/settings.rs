//! Notification settings record

use serde::{Deserialize, Serialize};

/// Push service chosen by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationService {
    #[default]
    None,
    Bark,
    ServerChan,
}

impl NotificationService {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationService::None => "none",
            NotificationService::Bark => "bark",
            NotificationService::ServerChan => "serverchan",
        }
    }
}

/// ServerChan needs both a per-user id (part of the host) and a send key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerChanCredential {
    pub id: String,
    pub key: String,
}

/// Persisted notification preferences.
///
/// Credentials for the service that is not selected are kept as-is and
/// simply ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    #[serde(default)]
    pub service: NotificationService,
    #[serde(default)]
    pub bark_key: Option<String>,
    #[serde(default)]
    pub serverchan: Option<ServerChanCredential>,
}

impl NotificationSettings {
    /// Bark key, if one is set and non-blank
    pub fn bark_key(&self) -> Option<&str> {
        self.bark_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// ServerChan credential, if both fields are non-blank
    pub fn serverchan(&self) -> Option<&ServerChanCredential> {
        self.serverchan
            .as_ref()
            .filter(|c| !c.id.trim().is_empty() && !c.key.trim().is_empty())
    }
}

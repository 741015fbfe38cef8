//! State management module
//! 
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod countdown_state;
pub mod settings;
pub mod settings_store;

// Re-export main types
pub use app_state::AppState;
pub use countdown_state::{CountdownState, Phase, TickOutcome};
pub use settings::{NotificationService, NotificationSettings, ServerChanCredential};
pub use settings_store::SettingsStore;

//! External notification module
//! 
//! This module contains the push notification dispatcher and the local
//! desktop notification used when a countdown completes.

pub mod desktop;
pub mod notifier;

// Re-export main items
pub use desktop::show_desktop_notification;
pub use notifier::{DispatchOutcome, Endpoints, Message, Notifier};

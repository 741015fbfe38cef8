//! Countdown Bell - A countdown timer service with push notifications
//! 
//! This library provides the countdown engine, `HH:MM:SS` duration model,
//! persisted notification settings and the Bark/ServerChan dispatcher,
//! exposed through an HTTP API.

pub mod config;
pub mod duration;
pub mod engine;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use engine::{CompletionListener, CountdownEngine, EngineEvent};
pub use state::AppState;
pub use api::create_router;
pub use utils::signals::shutdown_signal;

//! Background tasks module
//! 
//! This module contains the countdown tick loop and the completion hook
//! that runs alongside the HTTP server.

pub mod completion;
pub mod ticker;

// Re-export main items
pub use completion::CompletionNotifier;
pub(crate) use ticker::ticker_task;

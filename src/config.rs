//! Configuration and CLI argument handling

use std::path::PathBuf;
use clap::Parser;
use directories::ProjectDirs;

use crate::{
    services::notifier::{DEFAULT_BARK_BASE, DEFAULT_SERVERCHAN_BASE},
    services::Endpoints,
    state::settings_store::record_file_name,
};

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "countdown-bell")]
#[command(about = "A countdown timer service with push notifications on completion")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Directory holding the persisted notification settings
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Do not show a desktop notification when a countdown completes
    #[arg(long)]
    pub no_desktop_notify: bool,

    /// Base URL of the Bark push service
    #[arg(long, default_value = DEFAULT_BARK_BASE)]
    pub bark_base: String,

    /// Base URL of the ServerChan push service; `{id}` is replaced by the user id
    #[arg(long, default_value = DEFAULT_SERVERCHAN_BASE)]
    pub serverchan_base: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Location of the settings record: `--data-dir`, else the platform
    /// data directory, else the working directory
    pub fn settings_path(&self) -> PathBuf {
        let dir = self
            .data_dir
            .clone()
            .or_else(|| {
                ProjectDirs::from("dev", "countdown-bell", "countdown-bell")
                    .map(|dirs| dirs.data_dir().to_path_buf())
            })
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(record_file_name())
    }

    /// Push service endpoints
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            bark_base: self.bark_base.clone(),
            serverchan_base: self.serverchan_base.clone(),
        }
    }

    pub fn desktop_notifications(&self) -> bool {
        !self.no_desktop_notify
    }
}

#![allow(clippy::collapsible_if)]

// Core modules
pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

// Re-export commonly used types outside of crate
pub use app::App;
pub use config::{API_URL_ENV, PERSISTENCE, SyncSettings};
pub use engine::{AccountSnapshot, SyncOrchestrator, SyncRuntime};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL. Empty means the dashboard's own origin.
    #[arg(long, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Location the dashboard was opened at (carries the post-login marker)
    #[arg(long, default_value = "http://localhost:5173/")]
    pub launch_url: String,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> App {
    App::new(cc, args)
}

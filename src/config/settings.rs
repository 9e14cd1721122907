//! Runtime settings handed to the sync engine.
use std::time::Duration;

use crate::{
    Cli,
    config::{BACKEND, POLLING},
    domain::SeriesId,
};

/// Everything the orchestrator needs to know about cadence and location.
/// Built from the CLI in the binary; tests construct it directly.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Configured backend base URL. Empty means "same origin as the dashboard".
    pub api_base: String,
    pub token_price_interval: Duration,
    pub token_history_interval: Duration,
    pub characters_interval: Duration,
    pub wealth_history_interval: Duration,
    pub watchlist_interval: Duration,
    pub recipes_interval: Duration,
    pub burst_poll_interval: Duration,
    pub burst_max_duration: Duration,
    pub http_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            token_price_interval: POLLING.steady.token_price,
            token_history_interval: POLLING.steady.token_history,
            characters_interval: POLLING.steady.characters,
            wealth_history_interval: POLLING.steady.wealth_history,
            watchlist_interval: POLLING.steady.watchlist,
            recipes_interval: POLLING.steady.recipes,
            burst_poll_interval: POLLING.burst.poll_interval,
            burst_max_duration: POLLING.burst.max_duration,
            http_timeout: Duration::from_millis(BACKEND.client.timeout_ms),
        }
    }
}

impl SyncSettings {
    pub fn from_cli(args: &Cli) -> Self {
        Self {
            api_base: args.api_url.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Steady-state cadence of `series`.
    pub fn interval_for(&self, series: SeriesId) -> Duration {
        match series {
            SeriesId::TokenPrice => self.token_price_interval,
            SeriesId::TokenHistory => self.token_history_interval,
            SeriesId::Characters => self.characters_interval,
            SeriesId::WealthHistory => self.wealth_history_interval,
            SeriesId::Watchlist => self.watchlist_interval,
            SeriesId::Recipes => self.recipes_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_polling_table() {
        let settings = SyncSettings::default();
        assert!(settings.api_base.is_empty());
        assert_eq!(settings.interval_for(SeriesId::TokenPrice), Duration::from_secs(60));
        assert_eq!(settings.interval_for(SeriesId::Characters), Duration::from_secs(300));
        assert!(settings.burst_poll_interval < settings.interval_for(SeriesId::Characters));
        assert_eq!(settings.burst_max_duration, Duration::from_secs(90));
    }

    #[test]
    fn cli_base_overrides_default() {
        let args = Cli {
            api_url: Some("https://api.example.com".to_string()),
            launch_url: "http://localhost:5173/".to_string(),
        };
        assert_eq!(SyncSettings::from_cli(&args).api_base, "https://api.example.com");
    }
}

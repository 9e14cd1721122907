//! Refresh cadences for every data series.
use std::time::Duration;

/// Steady-state cadence, one entry per series.
pub struct SteadyIntervals {
    pub token_price: Duration,
    pub token_history: Duration,
    pub characters: Duration,
    pub wealth_history: Duration,
    pub watchlist: Duration,
    pub recipes: Duration,
}

/// Faster cadence applied for a bounded window after an external login.
pub struct BurstConfig {
    pub poll_interval: Duration,
    pub max_duration: Duration,
}

pub struct PollingConfig {
    pub steady: SteadyIntervals,
    pub burst: BurstConfig,
}

pub const POLLING: PollingConfig = PollingConfig {
    steady: SteadyIntervals {
        token_price: Duration::from_secs(60),
        token_history: Duration::from_secs(60),
        characters: Duration::from_secs(5 * 60),
        wealth_history: Duration::from_secs(5 * 60),
        watchlist: Duration::from_secs(60),
        recipes: Duration::from_secs(5 * 60),
    },
    burst: BurstConfig {
        poll_interval: Duration::from_secs(3),
        // Background character sync on the backend has no completion callback
        max_duration: Duration::from_secs(90),
    },
};

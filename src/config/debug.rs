//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Every primary/fallback attempt made by the resilient fetcher.
    pub log_fetch_attempts: bool,

    /// Completions dropped because a newer one was already applied.
    pub log_stale_writes: bool,

    /// Arm / reset / expiry of the burst sync session.
    pub log_burst_sync: bool,

    /// Refresh loop start and stop.
    pub log_loop_lifecycle: bool,

    /// Navigation marker inspection at startup.
    pub log_trigger: bool,

    /// User actions dispatched by the dashboard and persistence saves.
    pub log_ui_actions: bool,
}

pub const DF: LogFlags = LogFlags {
    log_fetch_attempts: false,
    log_stale_writes: true,
    log_burst_sync: true,
    log_loop_lifecycle: false,
    log_trigger: true,
    log_ui_actions: false,
};

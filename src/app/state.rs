use crate::{domain::SeriesId, engine::SyncStatus};

#[derive(Clone)]
pub(crate) struct RunningState;

pub(crate) enum AppState {
    Bootstrapping(BootstrapState),
    Running(RunningState),
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Bootstrapping(BootstrapState::default())
    }
}

/// Startup screen model: one row per steady series.
#[derive(Default, Clone)]
pub(crate) struct BootstrapState {
    pub(crate) rows: Vec<(SeriesId, SyncStatus)>,
    pub(crate) completed: usize,
    pub(crate) failed: usize,
}

impl BootstrapState {
    pub(crate) fn total(&self) -> usize {
        self.rows.len()
    }
}

mod phases;
mod root;
mod state;

pub(crate) use {
    phases::PhaseView,
    state::{AppState, BootstrapState, RunningState},
};

pub use root::App;

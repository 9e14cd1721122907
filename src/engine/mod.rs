mod burst;
mod core;
mod feeds;
mod refresh_loop;
mod runtime;
mod snapshot;
mod trigger;

pub use {
    burst::BurstSyncController,
    core::SyncOrchestrator,
    refresh_loop::{Liveness, LoopState, RefreshLoop, RefreshTask},
    runtime::SyncRuntime,
    snapshot::{AccountSnapshot, Completion, SeriesState, SharedSnapshot, SyncStatus},
    trigger::{LoginReturn, TriggerDetector},
};

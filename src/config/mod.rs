//! Configuration module for the dashboard.

// Can all be private now because we have a public re-export.
mod backend;
mod debug;
mod persistence;
mod polling;
mod settings;

// Re-export commonly used items
pub use backend::{API_URL_ENV, BACKEND, BackendConfig};
pub use debug::DF;
pub use persistence::PERSISTENCE;
pub use polling::POLLING;
pub use settings::SyncSettings;

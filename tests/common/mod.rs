#![allow(dead_code)]

use {
    realm_guardian::{
        SyncOrchestrator, SyncSettings,
        data::{LaunchContext, LoginNavigator},
        testing::ScriptedTransport,
    },
    std::sync::{Arc, Mutex},
    tokio::runtime::Handle,
};

pub const PRIMARY: &str = "https://api.example.com";
pub const FALLBACK: &str = "http://localhost:8000";
pub const DASHBOARD: &str = "http://localhost:5173/";

pub const ROSTER: &str = r#"{"characters": [{"id": 1, "blizzard_id": 99, "name": "Jaina", "realm": "Proudmoore", "level": 80, "item_level": 620, "gold": 12345670000}], "total_gold": 12345670000}"#;

#[derive(Default)]
pub struct RecordingNavigator {
    pub visited: Mutex<Vec<String>>,
}

impl LoginNavigator for RecordingNavigator {
    fn navigate(&self, url: &str) {
        self.visited.lock().unwrap().push(url.to_string());
    }
}

pub struct Dashboard {
    pub backend: Arc<ScriptedTransport>,
    pub navigation: Arc<LaunchContext>,
    pub navigator: Arc<RecordingNavigator>,
    pub sync: SyncOrchestrator,
}

pub fn dashboard(
    backend: Arc<ScriptedTransport>,
    settings: SyncSettings,
    launch_url: &str,
) -> Dashboard {
    let navigation = Arc::new(LaunchContext::parse(launch_url).unwrap());
    let navigator = Arc::new(RecordingNavigator::default());
    let sync = SyncOrchestrator::new(
        settings,
        backend.clone(),
        navigation.clone(),
        navigator.clone(),
        Handle::current(),
    );
    Dashboard {
        backend,
        navigation,
        navigator,
        sync,
    }
}

/// Let spawned tasks run without moving the paused clock.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

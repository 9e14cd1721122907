use {
    anyhow::Result,
    std::{
        collections::HashMap,
        future::Future,
        sync::{
            Arc, Mutex, MutexGuard, PoisonError,
            atomic::{AtomicBool, Ordering},
        },
    },
    tokio::runtime::Handle,
};

use crate::{
    config::SyncSettings,
    data::{
        BackendApi, Endpoints, HttpTransport, LoginNavigator, NavigationContext, ResilientFetcher,
    },
    domain::{DashboardTab, HistoryRange, SeriesId},
    engine::{
        AccountSnapshot, BurstSyncController, Liveness, RefreshLoop, SharedSnapshot,
        feeds::{SeriesFeed, refresh_item_history, refresh_recipe_search, refresh_series},
        trigger::TriggerDetector,
    },
};

/// Owns the snapshot, every steady refresh loop and the burst controller.
///
/// All fetch work runs on `handle`; the methods here only schedule it and return.
pub struct SyncOrchestrator {
    settings: SyncSettings,
    api: Arc<BackendApi>,
    snapshot: SharedSnapshot,
    navigation: Arc<dyn NavigationContext>,
    navigator: Arc<dyn LoginNavigator>,
    handle: Handle,

    /// At most one loop per series. Replacing an entry drops (stops) the old loop.
    loops: Mutex<HashMap<SeriesId, RefreshLoop>>,
    burst: BurstSyncController,

    /// Guards out-of-band fetches. `None` while unmounted.
    mounted: Mutex<Option<Liveness>>,
    trigger_checked: AtomicBool,
}

impl SyncOrchestrator {
    pub fn new(
        settings: SyncSettings,
        transport: Arc<dyn HttpTransport>,
        navigation: Arc<dyn NavigationContext>,
        navigator: Arc<dyn LoginNavigator>,
        handle: Handle,
    ) -> Self {
        let fetcher = ResilientFetcher::new(transport, settings.api_base.clone(), navigation.clone());
        let api = Arc::new(BackendApi::new(fetcher));
        let snapshot = SharedSnapshot::new();
        let burst = BurstSyncController::new(
            api.clone(),
            snapshot.clone(),
            handle.clone(),
            settings.burst_poll_interval,
            settings.burst_max_duration,
        );

        Self {
            settings,
            api,
            snapshot,
            navigation,
            navigator,
            handle,
            loops: Mutex::new(HashMap::new()),
            burst,
            mounted: Mutex::new(None),
            trigger_checked: AtomicBool::new(false),
        }
    }

    /// Start every steady loop (each fetches immediately) and run the trigger
    /// detector on the first mount.
    pub fn mount(&self) {
        {
            let mut mounted = lock(&self.mounted);
            if mounted.is_some() {
                log::warn!("Sync orchestrator already mounted");
                return;
            }
            *mounted = Some(Liveness::new());
        }

        let endpoints = self.api.endpoints();
        log::info!(
            "Mounting sync: primary {}, fallback {}",
            endpoints.primary,
            endpoints.fallback
        );

        for series in SeriesId::STEADY {
            self.start_loop(series);
        }

        if !self.trigger_checked.swap(true, Ordering::SeqCst) {
            self.check_login_return();
        }
    }

    /// Stop every loop and the burst session. Once this returns, no fetch that
    /// is still in flight can touch the snapshot.
    pub fn unmount(&self) {
        // Unmounted first, so no action can arm a new burst behind the disarm below
        if let Some(alive) = lock(&self.mounted).take() {
            alive.kill();
        }
        let stopped: Vec<RefreshLoop> = lock(&self.loops).drain().map(|(_, l)| l).collect();
        drop(stopped);
        self.burst.disarm();
        // Wait out any completion that passed its liveness check before the kill
        drop(self.snapshot.write());
        log::info!("Sync orchestrator unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        lock(&self.mounted).is_some()
    }

    /// Current state of every series.
    pub fn snapshot(&self) -> AccountSnapshot {
        self.snapshot.snapshot()
    }

    pub fn shared_snapshot(&self) -> SharedSnapshot {
        self.snapshot.clone()
    }

    pub fn endpoints(&self) -> Endpoints {
        self.api.endpoints()
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Leave for the backend's authorization entry point. Returns the URL navigated to.
    pub fn request_login(&self, hint: DashboardTab) -> Result<String> {
        let url = self.api.login_url(hint)?;
        log::info!("Redirecting to login: {}", url);
        self.navigator.navigate(&url);
        Ok(url)
    }

    /// The view the login round-trip asked for, handed out once.
    pub fn take_view_hint(&self) -> Option<DashboardTab> {
        self.snapshot.write().view_hint.take()
    }

    pub fn burst_armed(&self) -> bool {
        self.burst.is_armed()
    }

    /// Arm (or re-arm) the burst session by hand. Ignored while unmounted.
    pub fn arm_burst(&self) {
        let mounted = lock(&self.mounted);
        if mounted.is_none() {
            log::debug!("Sync orchestrator not mounted; ignoring burst request");
            return;
        }
        self.burst.arm();
    }

    /// External "sync finished" signal for the burst session.
    pub fn disarm_burst(&self) {
        self.burst.disarm();
    }

    pub fn burst(&self) -> &BurstSyncController {
        &self.burst
    }

    /// One out-of-band fetch, alongside whatever loop owns the series.
    pub fn refresh_now(&self, series: SeriesId) {
        let api = self.api.clone();
        let snapshot = self.snapshot.clone();
        self.spawn_mounted(move |alive| async move {
            refresh_series(series, &api, &snapshot, &alive).await;
        });
    }

    /// Switch the token history window. The new loop fetches immediately;
    /// results from the old window can no longer land.
    pub fn set_token_range(&self, range: HistoryRange) {
        {
            let mut snapshot = self.snapshot.write();
            if snapshot.token_range == range {
                return;
            }
            snapshot.token_range = range;
        }
        if self.is_mounted() {
            self.start_loop(SeriesId::TokenHistory);
        }
    }

    pub fn add_watched_item(&self, item_id: i64) {
        let api = self.api.clone();
        let snapshot = self.snapshot.clone();
        self.spawn_mounted(move |alive| async move {
            let outcome = api.add_watched_item(item_id).await;
            let ok = outcome.is_ok();
            snapshot.update(&alive, |s| {
                s.watchlist_notice = outcome.err().map(|e| e.notice("Failed to add item"));
            });
            if ok {
                refresh_series(SeriesId::Watchlist, &api, &snapshot, &alive).await;
            }
        });
    }

    pub fn remove_watched_item(&self, item_id: i64) {
        let api = self.api.clone();
        let snapshot = self.snapshot.clone();
        self.spawn_mounted(move |alive| async move {
            let outcome = api.remove_watched_item(item_id).await;
            let ok = outcome.is_ok();
            snapshot.update(&alive, |s| {
                s.watchlist_notice = outcome.err().map(|e| e.notice("Failed to remove item"));
                if ok && s.expanded_item.is_some_and(|(id, _)| id == item_id) {
                    s.expanded_item = None;
                    s.item_history.clear();
                }
            });
            if ok {
                refresh_series(SeriesId::Watchlist, &api, &snapshot, &alive).await;
            }
        });
    }

    /// Expand one watched item's price history. Replaces any other expanded item.
    pub fn show_item_history(&self, item_id: i64, range: HistoryRange) {
        {
            let mut snapshot = self.snapshot.write();
            if snapshot.expanded_item.is_some_and(|(id, _)| id != item_id) {
                snapshot.item_history.clear();
            }
            snapshot.expanded_item = Some((item_id, range));
        }
        let api = self.api.clone();
        let snapshot = self.snapshot.clone();
        self.spawn_mounted(move |alive| async move {
            refresh_item_history(item_id, range, &api, &snapshot, &alive).await;
        });
    }

    pub fn hide_item_history(&self) {
        let mut snapshot = self.snapshot.write();
        snapshot.expanded_item = None;
        snapshot.item_history.clear();
    }

    /// Blank queries clear the results instead of searching.
    pub fn search_recipes(&self, query: &str) {
        let query = query.trim().to_string();
        if query.is_empty() {
            self.snapshot.write().recipe_search.clear();
            return;
        }
        let api = self.api.clone();
        let snapshot = self.snapshot.clone();
        self.spawn_mounted(move |alive| async move {
            refresh_recipe_search(&query, &api, &snapshot, &alive).await;
        });
    }

    pub fn add_recipe(&self, recipe_id: i64) {
        let api = self.api.clone();
        let snapshot = self.snapshot.clone();
        self.spawn_mounted(move |alive| async move {
            let outcome = api.add_recipe(recipe_id).await;
            let ok = outcome.is_ok();
            snapshot.update(&alive, |s| {
                s.recipe_notice = outcome.err().map(|e| e.notice("Failed to add recipe"));
                if ok {
                    s.recipe_search.clear();
                }
            });
            if ok {
                refresh_series(SeriesId::Recipes, &api, &snapshot, &alive).await;
            }
        });
    }

    pub fn remove_recipe(&self, id: i64) {
        let api = self.api.clone();
        let snapshot = self.snapshot.clone();
        self.spawn_mounted(move |alive| async move {
            let outcome = api.remove_recipe(id).await;
            let ok = outcome.is_ok();
            snapshot.update(&alive, |s| {
                s.recipe_notice = outcome.err().map(|e| e.notice("Failed to remove recipe"));
            });
            if ok {
                refresh_series(SeriesId::Recipes, &api, &snapshot, &alive).await;
            }
        });
    }

    /// Loops currently registered, for diagnostics.
    pub fn active_loops(&self) -> Vec<SeriesId> {
        let mut active: Vec<SeriesId> = lock(&self.loops).keys().copied().collect();
        active.sort();
        active
    }

    fn start_loop(&self, series: SeriesId) {
        let feed = SeriesFeed::new(series, self.api.clone(), self.snapshot.clone());
        let mut refresh = RefreshLoop::new(Arc::new(feed), self.settings.interval_for(series));
        refresh.start(&self.handle);
        // The replaced loop (if any) stops when dropped here
        lock(&self.loops).insert(series, refresh);
    }

    fn check_login_return(&self) {
        let Some(found) = TriggerDetector::detect(self.navigation.as_ref()) else {
            return;
        };

        // 1. Restore the view the user left from
        self.snapshot.write().view_hint = found.view;

        // 2. Poll fast while the backend pulls the new account in
        self.arm_burst();

        // 3. Don't wait for the first burst tick to show characters
        self.refresh_now(SeriesId::Characters);
    }

    fn spawn_mounted<F, Fut>(&self, job: F)
    where
        F: FnOnce(Liveness) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Some(alive) = lock(&self.mounted).clone() else {
            log::debug!("Sync orchestrator not mounted; ignoring request");
            return;
        };
        self.handle.spawn(job(alive));
    }
}

impl Drop for SyncOrchestrator {
    fn drop(&mut self) {
        if self.is_mounted() {
            self.unmount();
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

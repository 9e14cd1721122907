use {
    chrono::{DateTime, Utc},
    std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    data::SeriesError,
    domain::{
        Character, CharacterRoster, DashboardTab, GoldHistoryPoint, HistoryRange, ItemHistory,
        PricePoint, Recipe, RecipeSearchResult, SeriesId, TokenPrice, WatchedItem,
    },
    engine::Liveness,
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Per-series progress as shown on the startup screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Pending,
    Syncing,
    Completed(usize),
    Failed(String),
}

/// What happened to one completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer fetch for the same slot was already applied.
    Stale,
    /// The owner stopped before the fetch resolved.
    Cancelled,
}

/// Latest known state of one series.
///
/// `data` is the front buffer: replaced wholesale on success, never mutated in place,
/// so readers can hold on to the `Arc` after the lock is gone.
#[derive(Debug)]
pub struct SeriesState<T> {
    pub data: Option<Arc<T>>,
    /// Only ever true before the first result lands.
    pub loading: bool,
    pub last_error: Option<SeriesError>,
    pub refreshed_at: Option<DateTime<Utc>>,
    issued_seq: u64,
    applied_seq: u64,
}

impl<T> Default for SeriesState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            last_error: None,
            refreshed_at: None,
            issued_seq: 0,
            applied_seq: 0,
        }
    }
}

impl<T> Clone for SeriesState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            loading: self.loading,
            last_error: self.last_error.clone(),
            refreshed_at: self.refreshed_at,
            issued_seq: self.issued_seq,
            applied_seq: self.applied_seq,
        }
    }
}

impl<T> SeriesState<T> {
    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    pub fn has_data(&self) -> bool {
        self.data.is_some()
    }

    /// Has this series produced any outcome yet (data or error)?
    pub fn is_settled(&self) -> bool {
        self.data.is_some() || self.last_error.is_some()
    }

    pub fn status(&self, count: impl Fn(&T) -> usize) -> SyncStatus {
        match (&self.data, &self.last_error) {
            (Some(data), None) => SyncStatus::Completed(count(data)),
            (_, Some(err)) => SyncStatus::Failed(err.to_string()),
            (None, None) if self.loading => SyncStatus::Syncing,
            (None, None) => SyncStatus::Pending,
        }
    }

    /// Tag a new fetch. Only the very first fetch raises `loading`.
    pub(crate) fn begin(&mut self) -> u64 {
        self.issued_seq += 1;
        if self.data.is_none() {
            self.loading = true;
        }
        self.issued_seq
    }

    /// Apply a completion unless something newer already landed.
    /// Failures count as applied too: the newest issued fetch decides what is shown.
    pub(crate) fn apply(&mut self, seq: u64, outcome: Result<T, SeriesError>) -> Completion {
        if seq <= self.applied_seq {
            return Completion::Stale;
        }
        self.applied_seq = seq;
        self.loading = false;
        match outcome {
            Ok(value) => {
                self.data = Some(Arc::new(value));
                self.last_error = None;
                self.refreshed_at = Some(Utc::now());
            }
            Err(err) => self.last_error = Some(err),
        }
        Completion::Applied
    }

    /// Forget the shown value and discard everything still in flight.
    pub(crate) fn clear(&mut self) {
        self.data = None;
        self.loading = false;
        self.last_error = None;
        self.refreshed_at = None;
        self.applied_seq = self.issued_seq;
    }
}

/// Everything the dashboard shows. Each slot is updated atomically on its own;
/// no ordering between slots is implied.
#[derive(Debug, Clone, Default)]
pub struct AccountSnapshot {
    pub token_price: SeriesState<TokenPrice>,
    pub token_history: SeriesState<Vec<PricePoint>>,
    pub characters: SeriesState<CharacterRoster>,
    pub wealth_history: SeriesState<Vec<GoldHistoryPoint>>,
    pub watchlist: SeriesState<Vec<WatchedItem>>,
    pub recipes: SeriesState<Vec<Recipe>>,
    pub item_history: SeriesState<ItemHistory>,
    pub recipe_search: SeriesState<Vec<RecipeSearchResult>>,

    pub token_range: HistoryRange,
    /// Watched item whose history is expanded, with its range.
    pub expanded_item: Option<(i64, HistoryRange)>,
    /// View requested by the login round-trip. Taken once by the shell.
    pub view_hint: Option<DashboardTab>,
    pub watchlist_notice: Option<String>,
    pub recipe_notice: Option<String>,
    pub burst_active: bool,
}

impl AccountSnapshot {
    /// Empty when the characters series never populated.
    pub fn characters(&self) -> &[Character] {
        self.characters
            .data()
            .map(|r| r.characters.as_slice())
            .unwrap_or_default()
    }

    pub fn total_gold(&self) -> i64 {
        self.characters.data().map(|r| r.total_gold).unwrap_or(0)
    }

    pub fn sync_status(&self, series: SeriesId) -> SyncStatus {
        match series {
            SeriesId::TokenPrice => self.token_price.status(|_| 1),
            SeriesId::TokenHistory => self.token_history.status(Vec::len),
            SeriesId::Characters => self.characters.status(|r| r.characters.len()),
            SeriesId::WealthHistory => self.wealth_history.status(Vec::len),
            SeriesId::Watchlist => self.watchlist.status(Vec::len),
            SeriesId::Recipes => self.recipes.status(Vec::len),
        }
    }

    pub fn last_error(&self, series: SeriesId) -> Option<&SeriesError> {
        match series {
            SeriesId::TokenPrice => self.token_price.last_error.as_ref(),
            SeriesId::TokenHistory => self.token_history.last_error.as_ref(),
            SeriesId::Characters => self.characters.last_error.as_ref(),
            SeriesId::WealthHistory => self.wealth_history.last_error.as_ref(),
            SeriesId::Watchlist => self.watchlist.last_error.as_ref(),
            SeriesId::Recipes => self.recipes.last_error.as_ref(),
        }
    }

    /// True once every steady series has shown data or an error.
    pub fn is_settled(&self) -> bool {
        SeriesId::STEADY
            .iter()
            .all(|s| !matches!(self.sync_status(*s), SyncStatus::Pending | SyncStatus::Syncing))
    }

    /// Banner text when any series lost contact with both endpoints.
    pub fn transport_banner(&self) -> Option<String> {
        SeriesId::STEADY.iter().find_map(|s| match self.last_error(*s) {
            Some(SeriesError::Transport(failure)) => Some(format!(
                "Error loading data: {}. Check if Backend is running at {}",
                failure.primary_error, failure.primary
            )),
            _ => None,
        })
    }
}

/// Field accessor for one slot of the snapshot.
pub(crate) type Slot<T> = fn(&mut AccountSnapshot) -> &mut SeriesState<T>;

/// The one snapshot shared between the sync runtime and the UI.
#[derive(Debug, Clone, Default)]
pub struct SharedSnapshot {
    inner: Arc<RwLock<AccountSnapshot>>,
}

impl SharedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn read(&self) -> RwLockReadGuard<'_, AccountSnapshot> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, AccountSnapshot> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Immutable copy for consumers. Payloads are shared, not copied.
    pub fn snapshot(&self) -> AccountSnapshot {
        self.read().clone()
    }

    /// Run `f` under the write lock, but only while `alive`.
    pub(crate) fn update(&self, alive: &Liveness, f: impl FnOnce(&mut AccountSnapshot)) -> bool {
        let mut guard = self.write();
        if !alive.is_alive() {
            return false;
        }
        f(&mut guard);
        true
    }

    pub(crate) fn begin<T>(&self, slot: Slot<T>, alive: &Liveness) -> Option<u64> {
        let mut guard = self.write();
        if !alive.is_alive() {
            return None;
        }
        Some(slot(&mut guard).begin())
    }

    pub(crate) fn complete<T>(
        &self,
        label: &str,
        slot: Slot<T>,
        seq: u64,
        alive: &Liveness,
        outcome: Result<T, SeriesError>,
    ) -> Completion {
        let mut guard = self.write();
        if !alive.is_alive() {
            return Completion::Cancelled;
        }
        let completion = slot(&mut guard).apply(seq, outcome);

        #[cfg(debug_assertions)]
        if DF.log_stale_writes && completion == Completion::Stale {
            log::info!("[seq] discarded stale {} completion #{}", label, seq);
        }
        #[cfg(not(debug_assertions))]
        let _ = label;

        completion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{FetchFailure, TransportError};

    fn unreachable() -> SeriesError {
        SeriesError::Transport(FetchFailure {
            primary: "https://api.example.com".to_string(),
            fallback: "http://localhost:8000".to_string(),
            primary_error: TransportError("connection refused".to_string()),
            fallback_error: TransportError("connection refused".to_string()),
        })
    }

    #[test]
    fn later_issued_fetch_wins_regardless_of_completion_order() {
        let mut state = SeriesState::<i64>::default();
        let first = state.begin();
        let second = state.begin();

        assert_eq!(state.apply(second, Ok(2)), Completion::Applied);
        assert_eq!(state.apply(first, Ok(1)), Completion::Stale);
        assert_eq!(state.data(), Some(&2));
    }

    #[test]
    fn loading_only_before_first_data() {
        let mut state = SeriesState::<i64>::default();
        let seq = state.begin();
        assert!(state.loading);
        state.apply(seq, Ok(5));

        state.begin();
        assert!(!state.loading);
    }

    #[test]
    fn failure_keeps_previous_data() {
        let mut state = SeriesState::<i64>::default();
        let seq = state.begin();
        state.apply(seq, Ok(5));

        let seq = state.begin();
        state.apply(seq, Err(unreachable()));
        assert_eq!(state.data(), Some(&5));
        assert!(state.last_error.as_ref().is_some_and(SeriesError::is_transport));

        let seq = state.begin();
        state.apply(seq, Ok(6));
        assert!(state.last_error.is_none());
    }

    #[test]
    fn clear_discards_in_flight_results() {
        let mut state = SeriesState::<i64>::default();
        let seq = state.begin();
        state.clear();
        assert_eq!(state.apply(seq, Ok(1)), Completion::Stale);
        assert!(state.data().is_none());
    }

    #[test]
    fn dead_owner_cannot_write() {
        let shared = SharedSnapshot::new();
        let alive = Liveness::new();
        let seq = shared.begin(|s| &mut s.token_price, &alive).unwrap();

        alive.kill();
        let outcome = shared.complete(
            "token_price",
            |s| &mut s.token_price,
            seq,
            &alive,
            Ok(TokenPrice::default()),
        );
        assert_eq!(outcome, Completion::Cancelled);
        assert!(shared.read().token_price.data().is_none());
        assert!(shared.begin(|s| &mut s.token_price, &alive).is_none());
    }

    #[test]
    fn banner_names_primary_endpoint() {
        let mut snapshot = AccountSnapshot::default();
        assert!(snapshot.transport_banner().is_none());

        let seq = snapshot.watchlist.begin();
        snapshot.watchlist.apply(seq, Err(unreachable()));
        let banner = snapshot.transport_banner().unwrap();
        assert!(banner.starts_with("Error loading data: connection refused"));
        assert!(banner.ends_with("https://api.example.com"));
    }

    #[test]
    fn settled_once_every_steady_series_reports() {
        let mut snapshot = AccountSnapshot::default();
        assert_eq!(snapshot.sync_status(SeriesId::Recipes), SyncStatus::Pending);
        for series in SeriesId::STEADY {
            match series {
                SeriesId::TokenPrice => {
                    let seq = snapshot.token_price.begin();
                    assert_eq!(snapshot.sync_status(series), SyncStatus::Syncing);
                    snapshot.token_price.apply(seq, Ok(TokenPrice::default()));
                }
                SeriesId::TokenHistory => {
                    let seq = snapshot.token_history.begin();
                    snapshot.token_history.apply(seq, Ok(vec![]));
                }
                SeriesId::Characters => {
                    let seq = snapshot.characters.begin();
                    snapshot.characters.apply(seq, Ok(CharacterRoster::default()));
                }
                SeriesId::WealthHistory => {
                    let seq = snapshot.wealth_history.begin();
                    snapshot.wealth_history.apply(seq, Err(unreachable()));
                }
                SeriesId::Watchlist => {
                    let seq = snapshot.watchlist.begin();
                    snapshot.watchlist.apply(seq, Ok(vec![]));
                }
                SeriesId::Recipes => {
                    assert!(!snapshot.is_settled());
                    let seq = snapshot.recipes.begin();
                    snapshot.recipes.apply(seq, Ok(vec![]));
                }
            }
        }
        assert!(snapshot.is_settled());
        assert_eq!(snapshot.sync_status(SeriesId::Characters), SyncStatus::Completed(0));
        assert!(snapshot.characters().is_empty());
    }
}

use {
    async_trait::async_trait,
    std::{future::Future, sync::Arc},
};

use crate::{
    data::{BackendApi, SeriesError},
    domain::{HistoryRange, SeriesId},
    engine::{
        Liveness, RefreshTask, SharedSnapshot,
        snapshot::{Completion, Slot},
    },
};

/// Tag, fetch, then apply into one slot. Nothing is written once `alive` is cleared.
pub(crate) async fn fetch_into<T, F>(
    snapshot: &SharedSnapshot,
    label: &str,
    slot: Slot<T>,
    alive: &Liveness,
    fetch: F,
) -> Option<Completion>
where
    F: Future<Output = Result<T, SeriesError>>,
{
    let seq = snapshot.begin(slot, alive)?;
    let outcome = fetch.await;
    Some(snapshot.complete(label, slot, seq, alive, outcome))
}

/// One fetch of one steady series into its slot.
pub(crate) async fn refresh_series(
    series: SeriesId,
    api: &BackendApi,
    snapshot: &SharedSnapshot,
    alive: &Liveness,
) -> Option<Completion> {
    let label: &'static str = series.into();
    match series {
        SeriesId::TokenPrice => {
            fetch_into(snapshot, label, |s| &mut s.token_price, alive, api.token_latest()).await
        }
        SeriesId::TokenHistory => {
            let range = snapshot.read().token_range;
            fetch_into(
                snapshot,
                label,
                |s| &mut s.token_history,
                alive,
                api.token_history(range),
            )
            .await
        }
        SeriesId::Characters => {
            fetch_into(snapshot, label, |s| &mut s.characters, alive, api.characters()).await
        }
        SeriesId::WealthHistory => {
            fetch_into(
                snapshot,
                label,
                |s| &mut s.wealth_history,
                alive,
                api.gold_history(),
            )
            .await
        }
        SeriesId::Watchlist => {
            fetch_into(snapshot, label, |s| &mut s.watchlist, alive, api.watchlist()).await
        }
        SeriesId::Recipes => {
            fetch_into(snapshot, label, |s| &mut s.recipes, alive, api.recipes()).await
        }
    }
}

pub(crate) async fn refresh_item_history(
    item_id: i64,
    range: HistoryRange,
    api: &BackendApi,
    snapshot: &SharedSnapshot,
    alive: &Liveness,
) -> Option<Completion> {
    fetch_into(
        snapshot,
        "item_history",
        |s| &mut s.item_history,
        alive,
        api.item_history(item_id, range),
    )
    .await
}

pub(crate) async fn refresh_recipe_search(
    query: &str,
    api: &BackendApi,
    snapshot: &SharedSnapshot,
    alive: &Liveness,
) -> Option<Completion> {
    fetch_into(
        snapshot,
        "recipe_search",
        |s| &mut s.recipe_search,
        alive,
        api.search_recipes(query),
    )
    .await
}

/// Steady-state refresh task for one series.
pub(crate) struct SeriesFeed {
    series: SeriesId,
    label: &'static str,
    api: Arc<BackendApi>,
    snapshot: SharedSnapshot,
}

impl SeriesFeed {
    pub(crate) fn new(series: SeriesId, api: Arc<BackendApi>, snapshot: SharedSnapshot) -> Self {
        Self {
            series,
            label: series.into(),
            api,
            snapshot,
        }
    }
}

#[async_trait]
impl RefreshTask for SeriesFeed {
    fn label(&self) -> &'static str {
        self.label
    }

    async fn run_once(&self, alive: &Liveness) {
        refresh_series(self.series, &self.api, &self.snapshot, alive).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::{LaunchContext, ResilientFetcher},
        testing::ScriptedTransport,
    };
    use std::time::Duration;

    const ROSTER: &str = r#"{"characters": [{"id": 1, "name": "Thrall", "realm": "Draenor", "gold": 100}], "total_gold": 100}"#;

    fn api(transport: Arc<ScriptedTransport>) -> BackendApi {
        let nav = Arc::new(LaunchContext::parse("http://localhost:5173/").unwrap());
        BackendApi::new(ResilientFetcher::new(transport, "", nav))
    }

    #[tokio::test(start_paused = true)]
    async fn slower_older_fetch_never_overwrites_newer() {
        let transport = ScriptedTransport::new();
        transport.respond_once_after("/api/token/latest", Duration::from_secs(8), 200, r#"{"price": 1}"#);
        transport.respond_once_after("/api/token/latest", Duration::from_secs(1), 200, r#"{"price": 2}"#);
        let api = api(transport);
        let snapshot = SharedSnapshot::new();
        let alive = Liveness::new();

        let (older, newer) = tokio::join!(
            refresh_series(SeriesId::TokenPrice, &api, &snapshot, &alive),
            async {
                tokio::task::yield_now().await;
                refresh_series(SeriesId::TokenPrice, &api, &snapshot, &alive).await
            }
        );

        assert_eq!(newer, Some(Completion::Applied));
        assert_eq!(older, Some(Completion::Stale));
        assert_eq!(snapshot.read().token_price.data().map(|t| t.price), Some(2));
    }

    #[tokio::test]
    async fn characters_404_is_an_empty_roster_not_an_error() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/user/characters", 404, r#"{"detail": "Not connected"}"#);
        let snapshot = SharedSnapshot::new();

        refresh_series(SeriesId::Characters, &api(transport), &snapshot, &Liveness::new()).await;

        let view = snapshot.read();
        assert!(view.characters().is_empty());
        assert!(view.characters.last_error.is_none());
        assert!(view.characters.has_data());
    }

    #[tokio::test]
    async fn transport_failure_keeps_previous_roster() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/user/characters", 200, ROSTER);
        let api = api(transport.clone());
        let snapshot = SharedSnapshot::new();
        let alive = Liveness::new();

        refresh_series(SeriesId::Characters, &api, &snapshot, &alive).await;
        transport.unreachable("http://localhost");
        refresh_series(SeriesId::Characters, &api, &snapshot, &alive).await;

        let view = snapshot.read();
        assert_eq!(view.characters()[0].name, "Thrall");
        assert!(view.characters.last_error.as_ref().is_some_and(SeriesError::is_transport));
    }

    #[tokio::test]
    async fn token_history_uses_selected_range() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/token/history", 200, "[]");
        let snapshot = SharedSnapshot::new();
        snapshot.write().token_range = HistoryRange::Month;

        refresh_series(SeriesId::TokenHistory, &api(transport.clone()), &snapshot, &Liveness::new()).await;

        assert_eq!(transport.calls()[0].query[0].1, "30d");
    }
}

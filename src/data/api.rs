use {
    anyhow::{Context, Result},
    reqwest::Url,
    serde::de::DeserializeOwned,
};

use crate::{
    config::BACKEND,
    data::{ApiResponse, Endpoints, FetchFailure, FetchOptions, ResilientFetcher},
    domain::{
        CharacterRoster, DashboardTab, ErrorDetail, GoldHistoryPoint, GoldHistoryResponse,
        HistoryRange, ItemHistory, PricePoint, Recipe, RecipeSearchResult, TokenPrice,
        WatchedItem,
    },
};

/// Why a series has no fresh data. Stored in the snapshot, never thrown at the UI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    /// Neither the primary nor the fallback endpoint answered.
    #[error(transparent)]
    Transport(#[from] FetchFailure),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {}", detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    /// The backend answered 2xx with a body we could not read.
    #[error("unreadable response: {0}")]
    Decode(String),
}

impl SeriesError {
    pub fn is_transport(&self) -> bool {
        matches!(self, SeriesError::Transport(_))
    }

    /// Short text for an inline notice next to a form.
    /// Prefers the backend's own `detail` message.
    pub fn notice(&self, generic: &str) -> String {
        match self {
            SeriesError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            SeriesError::Status { detail: None, .. } | SeriesError::Decode(_) => {
                "Server returned an invalid response. Ensure backend is running.".to_string()
            }
            SeriesError::Transport(_) => generic.to_string(),
        }
    }
}

/// Typed calls for every backend route, each going through the resilient fetcher.
pub struct BackendApi {
    fetcher: ResilientFetcher,
}

impl BackendApi {
    pub fn new(fetcher: ResilientFetcher) -> Self {
        Self { fetcher }
    }

    pub fn endpoints(&self) -> Endpoints {
        self.fetcher.endpoints()
    }

    pub async fn token_latest(&self) -> Result<TokenPrice, SeriesError> {
        self.get(BACKEND.paths.token_latest, FetchOptions::get())
            .await
    }

    pub async fn token_history(&self, range: HistoryRange) -> Result<Vec<PricePoint>, SeriesError> {
        self.get(
            BACKEND.paths.token_history,
            FetchOptions::get().query("range", range),
        )
        .await
    }

    /// A non-success status means "no connected account", which is an empty roster.
    pub async fn characters(&self) -> Result<CharacterRoster, SeriesError> {
        let path = BACKEND.paths.user_characters;
        let response = self.fetcher.fetch(path, FetchOptions::get()).await?;
        if !response.is_success() {
            log::info!(
                "No connected account ({} returned HTTP {})",
                path,
                response.status
            );
            return Ok(CharacterRoster::default());
        }
        decode(path, &response)
    }

    pub async fn gold_history(&self) -> Result<Vec<GoldHistoryPoint>, SeriesError> {
        let body: GoldHistoryResponse = self
            .get(BACKEND.paths.user_gold_history, FetchOptions::get())
            .await?;
        Ok(body.history)
    }

    /// Watched items, most valuable first.
    pub async fn watchlist(&self) -> Result<Vec<WatchedItem>, SeriesError> {
        let mut items: Vec<WatchedItem> = self.get(BACKEND.paths.items, FetchOptions::get()).await?;
        items.sort_by(|a, b| b.current_price.cmp(&a.current_price));
        Ok(items)
    }

    pub async fn add_watched_item(&self, item_id: i64) -> Result<(), SeriesError> {
        self.send(
            BACKEND.paths.items,
            FetchOptions::post(serde_json::json!({ "item_id": item_id })),
        )
        .await
    }

    pub async fn remove_watched_item(&self, item_id: i64) -> Result<(), SeriesError> {
        let path = format!("{}/{}", BACKEND.paths.items, item_id);
        self.send(&path, FetchOptions::delete()).await
    }

    pub async fn item_history(
        &self,
        item_id: i64,
        range: HistoryRange,
    ) -> Result<ItemHistory, SeriesError> {
        let path = format!("{}/{}/history", BACKEND.paths.items, item_id);
        let points = self
            .get(&path, FetchOptions::get().query("range", range))
            .await?;
        Ok(ItemHistory {
            item_id,
            range,
            points,
        })
    }

    pub async fn recipes(&self) -> Result<Vec<Recipe>, SeriesError> {
        self.get(BACKEND.paths.recipes, FetchOptions::get()).await
    }

    pub async fn search_recipes(&self, query: &str) -> Result<Vec<RecipeSearchResult>, SeriesError> {
        self.get(
            BACKEND.paths.recipe_search,
            FetchOptions::get().query("query", query),
        )
        .await
    }

    pub async fn add_recipe(&self, recipe_id: i64) -> Result<(), SeriesError> {
        self.send(
            BACKEND.paths.recipes,
            FetchOptions::post(serde_json::json!({ "recipe_id": recipe_id })),
        )
        .await
    }

    pub async fn remove_recipe(&self, id: i64) -> Result<(), SeriesError> {
        let path = format!("{}/{}", BACKEND.paths.recipes, id);
        self.send(&path, FetchOptions::delete()).await
    }

    /// Authorization entry point on the primary endpoint, carrying the view to restore.
    pub fn login_url(&self, hint: DashboardTab) -> Result<String> {
        let raw = self.endpoints().primary_url(BACKEND.paths.auth_login);
        let url = Url::parse_with_params(&raw, &[("tab", hint.to_string())])
            .with_context(|| format!("Cannot build login URL from {}", raw))?;
        Ok(url.to_string())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, options: FetchOptions) -> Result<T, SeriesError> {
        let response = self.fetcher.fetch(path, options).await?;
        decode(path, &response)
    }

    async fn send(&self, path: &str, options: FetchOptions) -> Result<(), SeriesError> {
        let method = options.method;
        let response = self.fetcher.fetch(path, options).await?;
        if response.is_success() {
            Ok(())
        } else {
            Err(status_error(&format!("{} {}", method, path), &response))
        }
    }
}

fn decode<T: DeserializeOwned>(path: &str, response: &ApiResponse) -> Result<T, SeriesError> {
    if !response.is_success() {
        return Err(status_error(path, response));
    }
    response.json().map_err(|e| {
        log::warn!("Could not decode {} from {}: {}", path, response.url, e);
        SeriesError::Decode(e.to_string())
    })
}

fn status_error(what: &str, response: &ApiResponse) -> SeriesError {
    let detail = response.json::<ErrorDetail>().ok().map(|e| e.detail);
    log::warn!(
        "{} returned HTTP {}{}",
        what,
        response.status,
        detail.as_deref().map(|d| format!(": {}", d)).unwrap_or_default()
    );
    SeriesError::Status {
        status: response.status,
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::LaunchContext, testing::ScriptedTransport};
    use std::sync::Arc;

    fn api(transport: Arc<ScriptedTransport>, base: &str) -> BackendApi {
        let nav = Arc::new(LaunchContext::parse("http://localhost:5173/").unwrap());
        BackendApi::new(ResilientFetcher::new(transport, base, nav))
    }

    #[tokio::test]
    async fn missing_account_reads_as_empty_roster() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/user/characters", 404, r#"{"detail": "Not connected"}"#);

        let roster = api(transport, "").characters().await.unwrap();
        assert!(roster.is_empty());
        assert_eq!(roster.total_gold, 0);
    }

    #[tokio::test]
    async fn status_failure_keeps_backend_detail() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/items", 400, r#"{"detail": "Item already in watchlist"}"#);

        let err = api(transport, "").add_watched_item(190321).await.unwrap_err();
        assert_eq!(
            err,
            SeriesError::Status {
                status: 400,
                detail: Some("Item already in watchlist".to_string())
            }
        );
        assert_eq!(err.notice("Failed to add item"), "Item already in watchlist");
    }

    #[tokio::test]
    async fn html_error_page_gets_generic_notice() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/recipes", 502, "<html>Bad Gateway</html>");

        let err = api(transport, "").add_recipe(42).await.unwrap_err();
        assert!(err.notice("Failed to add recipe").contains("invalid response"));
    }

    #[tokio::test]
    async fn watchlist_is_sorted_by_price_descending() {
        let transport = ScriptedTransport::new();
        transport.respond(
            "/api/items",
            200,
            r#"[{"id": 1, "item_id": 10, "name": "Ore", "current_price": 50},
                {"id": 2, "item_id": 20, "name": "Herb", "current_price": 900},
                {"id": 3, "item_id": 30, "name": "Cloth"}]"#,
        );

        let items = api(transport, "").watchlist().await.unwrap();
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Herb", "Ore", "Cloth"]);
    }

    #[tokio::test]
    async fn history_range_is_sent_as_query() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/token/history", 200, "[]");

        api(transport.clone(), "")
            .token_history(HistoryRange::Week)
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].query, vec![("range".to_string(), "7d".to_string())]);
    }

    #[tokio::test]
    async fn gold_history_without_key_is_empty() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/user/gold-history", 200, "{}");

        assert!(api(transport, "").gold_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn garbage_body_is_a_decode_error() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/token/latest", 200, "not json");

        let err = api(transport, "").token_latest().await.unwrap_err();
        assert!(matches!(err, SeriesError::Decode(_)));
        assert!(!err.is_transport());
    }

    #[test]
    fn login_url_targets_primary_and_encodes_hint() {
        let transport = ScriptedTransport::new();
        let url = api(transport, "https://api.example.com/")
            .login_url(DashboardTab::Characters)
            .unwrap();
        assert_eq!(url, "https://api.example.com/api/auth/login?tab=characters");
    }
}

use {
    serde::de::DeserializeOwned,
    std::{fmt, sync::Arc},
};

use crate::data::{
    Endpoints, HttpMethod, HttpRequest, HttpResponse, HttpTransport, NavigationContext,
    TransportError, endpoint::EndpointResolver,
};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Which endpoint produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedBy {
    Primary,
    Fallback,
}

/// A transport-level success. The status may still be 4xx/5xx; callers must check.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
    pub served_by: ServedBy,
    pub url: String,
}

impl ApiResponse {
    fn new(response: HttpResponse, served_by: ServedBy, url: String) -> Self {
        Self {
            status: response.status,
            body: response.body,
            served_by,
            url,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Method, query and body of one logical call. The address is filled in per attempt.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub method: HttpMethod,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl FetchOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn delete() -> Self {
        Self {
            method: HttpMethod::Delete,
            ..Self::default()
        }
    }

    pub fn query(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }
}

/// Both the primary and the fallback endpoint failed at the transport level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("backend unreachable at {primary} ({primary_error}) and at {fallback} ({fallback_error})")]
pub struct FetchFailure {
    pub primary: String,
    pub fallback: String,
    pub primary_error: TransportError,
    pub fallback_error: TransportError,
}

/// Single-shot primary → fallback wrapper around one HTTP call.
/// No backoff and no further retries; the refresh loops provide eventual retry.
pub struct ResilientFetcher {
    transport: Arc<dyn HttpTransport>,
    configured_base: String,
    navigation: Arc<dyn NavigationContext>,
}

impl ResilientFetcher {
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        configured_base: impl Into<String>,
        navigation: Arc<dyn NavigationContext>,
    ) -> Self {
        Self {
            transport,
            configured_base: configured_base.into(),
            navigation,
        }
    }

    /// Resolved fresh on every call from the current navigation context.
    pub fn endpoints(&self) -> Endpoints {
        EndpointResolver::resolve(&self.configured_base, &self.navigation.current())
    }

    pub async fn fetch(&self, path: &str, options: FetchOptions) -> Result<ApiResponse, FetchFailure> {
        let endpoints = self.endpoints();

        // 1. Primary
        let primary_url = endpoints.primary_url(path);
        let primary_error = match self.attempt(&primary_url, &options).await {
            Ok(response) => return Ok(ApiResponse::new(response, ServedBy::Primary, primary_url)),
            Err(e) => e,
        };

        log::warn!(
            "{} {} unreachable ({}). Retrying once via {}",
            options.method,
            primary_url,
            primary_error,
            endpoints.fallback
        );

        // 2. Fallback, exactly once
        let fallback_url = endpoints.fallback_url(path);
        match self.attempt(&fallback_url, &options).await {
            Ok(response) => Ok(ApiResponse::new(response, ServedBy::Fallback, fallback_url)),
            Err(fallback_error) => {
                let failure = FetchFailure {
                    primary: endpoints.primary,
                    fallback: endpoints.fallback,
                    primary_error,
                    fallback_error,
                };
                log::error!("{} {}: {}", options.method, path, failure);
                Err(failure)
            }
        }
    }

    async fn attempt(&self, url: &str, options: &FetchOptions) -> Result<HttpResponse, TransportError> {
        #[cfg(debug_assertions)]
        if DF.log_fetch_attempts {
            log::info!("[fetch] {} {} {:?}", options.method, url, options.query);
        }

        self.transport
            .send(HttpRequest {
                method: options.method,
                url: url.to_string(),
                query: options.query.clone(),
                body: options.body.clone(),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LaunchContext;
    use crate::testing::ScriptedTransport;

    const PRIMARY: &str = "https://api.example.com";
    const FALLBACK: &str = "http://localhost:8000";

    fn fetcher(transport: Arc<ScriptedTransport>) -> ResilientFetcher {
        let nav = Arc::new(LaunchContext::parse("http://localhost:5173/").unwrap());
        ResilientFetcher::new(transport, PRIMARY, nav)
    }

    #[tokio::test]
    async fn primary_success_never_touches_fallback() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/token/latest", 200, r#"{"price": 1}"#);

        let response = fetcher(transport.clone())
            .fetch("/api/token/latest", FetchOptions::get())
            .await
            .unwrap();

        assert_eq!(response.served_by, ServedBy::Primary);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_primary_falls_back_on_first_call() {
        let transport = ScriptedTransport::new();
        transport.unreachable(PRIMARY);
        transport.respond("/api/token/latest", 200, r#"{"price": 1}"#);

        let response = fetcher(transport.clone())
            .fetch("/api/token/latest", FetchOptions::get())
            .await
            .unwrap();

        assert_eq!(response.served_by, ServedBy::Fallback);
        assert_eq!(response.url, format!("{}/api/token/latest", FALLBACK));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn http_error_status_is_not_retried() {
        let transport = ScriptedTransport::new();
        transport.respond("/api/user/characters", 404, r#"{"detail": "no account"}"#);

        let response = fetcher(transport.clone())
            .fetch("/api/user/characters", FetchOptions::get())
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn both_unreachable_is_a_fetch_failure_naming_both() {
        let transport = ScriptedTransport::new();
        transport.unreachable(PRIMARY);
        transport.unreachable(FALLBACK);

        let failure = fetcher(transport.clone())
            .fetch("/api/items", FetchOptions::get())
            .await
            .unwrap_err();

        assert_eq!(failure.primary, PRIMARY);
        assert_eq!(failure.fallback, FALLBACK);
        assert!(failure.to_string().contains(FALLBACK));
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn request_shape_is_carried_to_both_attempts() {
        let transport = ScriptedTransport::new();
        transport.unreachable(PRIMARY);
        transport.respond("/api/items", 200, "{}");

        fetcher(transport.clone())
            .fetch("/api/items", FetchOptions::post(serde_json::json!({"item_id": 190321})))
            .await
            .unwrap();

        let calls = transport.calls();
        assert!(calls.iter().all(|c| c.method == HttpMethod::Post));
        assert_eq!(calls[1].body, Some(serde_json::json!({"item_id": 190321})));
    }
}

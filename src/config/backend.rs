//! Backend service locations and HTTP client defaults.

/// Every backend route the dashboard consumes.
pub struct ApiPaths {
    pub token_latest: &'static str,
    pub token_history: &'static str,
    pub user_characters: &'static str,
    pub user_gold_history: &'static str,
    pub items: &'static str,
    pub recipes: &'static str,
    pub recipe_search: &'static str,
    pub auth_login: &'static str,
}

/// Same-machine fallback used when the configured endpoint cannot be reached.
pub struct FallbackConfig {
    pub scheme: &'static str,
    pub port: u16,
    /// Used when the navigation context carries no hostname (e.g. a `file:` launch).
    pub default_host: &'static str,
}

pub struct ClientDefaults {
    pub timeout_ms: u64,
    pub connect_timeout_ms: u64,
}

pub struct BackendConfig {
    pub paths: ApiPaths,
    pub fallback: FallbackConfig,
    pub client: ClientDefaults,
}

pub const BACKEND: BackendConfig = BackendConfig {
    paths: ApiPaths {
        token_latest: "/api/token/latest",
        token_history: "/api/token/history",
        user_characters: "/api/user/characters",
        user_gold_history: "/api/user/gold-history",
        items: "/api/items",
        recipes: "/api/recipes",
        recipe_search: "/api/recipes/search",
        auth_login: "/api/auth/login",
    },
    fallback: FallbackConfig {
        scheme: "http",
        port: 8000,
        default_host: "localhost",
    },
    client: ClientDefaults {
        timeout_ms: 10_000,
        connect_timeout_ms: 3_000,
    },
};

/// Environment variable consulted when `--api-url` is not given.
pub const API_URL_ENV: &str = "REALM_GUARDIAN_API_URL";

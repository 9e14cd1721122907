use reqwest::Url;

use crate::config::BACKEND;

/// Where to call: the preferred base and the same-machine fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub primary: String,
    pub fallback: String,
}

impl Endpoints {
    pub fn primary_url(&self, path: &str) -> String {
        format!("{}{}", self.primary, path)
    }

    pub fn fallback_url(&self, path: &str) -> String {
        format!("{}{}", self.fallback, path)
    }
}

pub struct EndpointResolver;

impl EndpointResolver {
    /// Pure function of (configured base, current origin). Recomputed per call,
    /// so a failure on one call never sticks to the next.
    ///
    /// * `primary`: the configured base when non-empty, otherwise the origin's root.
    /// * `fallback`: always `http://<origin host>:8000`.
    pub fn resolve(configured_base: &str, origin: &Url) -> Endpoints {
        let fallback = Self::fallback_for(origin);

        let configured = configured_base.trim().trim_end_matches('/');
        let primary = if !configured.is_empty() {
            configured.to_string()
        } else {
            let same_origin = origin.origin();
            if same_origin.is_tuple() {
                same_origin.ascii_serialization()
            } else {
                // Opaque origins (file:, data:) have no root to be relative to
                fallback.clone()
            }
        };

        Endpoints { primary, fallback }
    }

    fn fallback_for(origin: &Url) -> String {
        let host = origin
            .host_str()
            .filter(|h| !h.is_empty())
            .unwrap_or(BACKEND.fallback.default_host);
        format!(
            "{}://{}:{}",
            BACKEND.fallback.scheme, host, BACKEND.fallback.port
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn configured_base_wins_and_fallback_uses_origin_host() {
        let ep = EndpointResolver::resolve(
            "https://api.example.com/",
            &origin("http://100.64.0.7:5173/dashboard?x=1"),
        );
        assert_eq!(ep.primary, "https://api.example.com");
        assert_eq!(ep.fallback, "http://100.64.0.7:8000");
    }

    #[test]
    fn empty_base_means_same_origin_root() {
        let ep = EndpointResolver::resolve("  ", &origin("http://localhost:5173/settings"));
        assert_eq!(ep.primary, "http://localhost:5173");
        assert_eq!(ep.fallback, "http://localhost:8000");
        assert_eq!(ep.primary_url("/api/items"), "http://localhost:5173/api/items");
    }

    #[test]
    fn opaque_origin_falls_back_to_localhost() {
        let ep = EndpointResolver::resolve("", &origin("file:///opt/dashboard/index.html"));
        assert_eq!(ep.fallback, "http://localhost:8000");
        assert_eq!(ep.primary, ep.fallback);
    }
}

//! In-memory backend for tests. Enabled for integration tests through the
//! `test-support` feature.
use {
    async_trait::async_trait,
    reqwest::Url,
    std::{
        collections::{HashMap, VecDeque},
        sync::{Arc, Mutex},
        time::Duration,
    },
};

use crate::data::{HttpRequest, HttpResponse, HttpTransport, TransportError};

#[derive(Clone)]
struct Reply {
    status: u16,
    body: String,
    delay: Duration,
}

#[derive(Default)]
struct Script {
    /// Consumed in call order before falling back to `standing`.
    queued: HashMap<String, VecDeque<Reply>>,
    standing: HashMap<String, Reply>,
    unreachable: Vec<String>,
    calls: Vec<HttpRequest>,
}

/// Replies keyed by URL path, so the same script answers on either base.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Script>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every steady series answers with a valid body; no account is connected.
    pub fn healthy() -> Arc<Self> {
        let transport = Self::new();
        transport.respond(
            "/api/token/latest",
            200,
            r#"{"price": 2500000, "last_updated": 1771000000, "formatted": "250g"}"#,
        );
        transport.respond("/api/token/history", 200, "[]");
        transport.respond("/api/user/characters", 404, r#"{"detail": "Not connected"}"#);
        transport.respond("/api/user/gold-history", 200, r#"{"history": []}"#);
        transport.respond("/api/items", 200, "[]");
        transport.respond("/api/recipes", 200, "[]");
        transport
    }

    /// Answer every call to `path` with this reply.
    pub fn respond(&self, path: &str, status: u16, body: &str) {
        self.script.lock().unwrap().standing.insert(
            path.to_string(),
            Reply {
                status,
                body: body.to_string(),
                delay: Duration::ZERO,
            },
        );
    }

    /// Answer the next not-yet-scripted call to `path` after `delay`.
    pub fn respond_once_after(&self, path: &str, delay: Duration, status: u16, body: &str) {
        self.script
            .lock()
            .unwrap()
            .queued
            .entry(path.to_string())
            .or_default()
            .push_back(Reply {
                status,
                body: body.to_string(),
                delay,
            });
    }

    /// Every request whose URL starts with `base` fails at the transport level.
    pub fn unreachable(&self, base: &str) {
        self.script.lock().unwrap().unreachable.push(base.to_string());
    }

    /// Undo [`Self::unreachable`] for `base`.
    pub fn reachable(&self, base: &str) {
        self.script.lock().unwrap().unreachable.retain(|b| b != base);
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.script.lock().unwrap().calls.clone()
    }

    /// Requests to `path` on any base, in call order.
    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.calls()
            .into_iter()
            .filter(|c| path_of(&c.url) == path)
            .collect()
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.requests_to(path).len()
    }
}

fn path_of(url: &str) -> String {
    Url::parse(url)
        .map(|u| u.path().to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = {
            let mut script = self.script.lock().unwrap();
            script.calls.push(request.clone());
            if script.unreachable.iter().any(|b| request.url.starts_with(b)) {
                return Err(TransportError(format!("connection refused: {}", request.url)));
            }
            let path = path_of(&request.url);
            script
                .queued
                .get_mut(&path)
                .and_then(|q| q.pop_front())
                .or_else(|| script.standing.get(&path).cloned())
        };

        let Some(reply) = reply else {
            return Ok(HttpResponse {
                status: 404,
                body: r#"{"detail": "Not Found"}"#.to_string(),
            });
        };
        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }
        Ok(HttpResponse {
            status: reply.status,
            body: reply.body,
        })
    }
}

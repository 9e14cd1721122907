use {
    anyhow::{Context, Result},
    reqwest::Url,
    std::sync::{Mutex, PoisonError},
};

/// The location the dashboard is currently showing. Supplies the origin for
/// endpoint resolution and the query the login round-trip comes back with.
pub trait NavigationContext: Send + Sync {
    fn current(&self) -> Url;

    /// Rewrite the visible location without navigating (history replace).
    fn replace(&self, url: Url);
}

/// Performs a full navigation away from the dashboard (e.g. into the OAuth flow).
pub trait LoginNavigator: Send + Sync {
    fn navigate(&self, url: &str);
}

/// Navigation context for the native shell: the URL the app was launched with.
pub struct LaunchContext {
    url: Mutex<Url>,
}

impl LaunchContext {
    pub fn new(url: Url) -> Self {
        Self {
            url: Mutex::new(url),
        }
    }

    pub fn parse(launch_url: &str) -> Result<Self> {
        let url = Url::parse(launch_url)
            .with_context(|| format!("Invalid launch URL: {}", launch_url))?;
        Ok(Self::new(url))
    }
}

impl NavigationContext for LaunchContext {
    fn current(&self) -> Url {
        self.url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, url: Url) {
        *self.url.lock().unwrap_or_else(PoisonError::into_inner) = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_is_visible_to_later_reads() {
        let ctx = LaunchContext::parse("http://localhost:5173/?connected=1").unwrap();
        ctx.replace(Url::parse("http://localhost:5173/").unwrap());
        assert_eq!(ctx.current().query(), None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(LaunchContext::parse("not a url").is_err());
    }
}

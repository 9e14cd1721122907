use std::str::FromStr;

use crate::{data::NavigationContext, domain::DashboardTab};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Query parameter the backend appends after a successful authorization.
const CONNECTED_PARAM: &str = "connected";
/// Query parameter carrying the view to restore.
const TAB_PARAM: &str = "tab";

/// What the login round-trip left behind in the navigation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginReturn {
    pub view: Option<DashboardTab>,
}

pub struct TriggerDetector;

impl TriggerDetector {
    /// Look for the post-login marker. When found, strip the marker and the view
    /// hint from the visible location so a reload cannot re-trigger.
    pub fn detect(navigation: &dyn NavigationContext) -> Option<LoginReturn> {
        let mut url = navigation.current();

        let connected = url
            .query_pairs()
            .any(|(k, v)| k == CONNECTED_PARAM && !v.is_empty());
        if !connected {
            #[cfg(debug_assertions)]
            if DF.log_trigger {
                log::info!("[trigger] no login marker in {}", url);
            }
            return None;
        }

        let tab = url
            .query_pairs()
            .find(|(k, _)| k == TAB_PARAM)
            .map(|(_, v)| v.into_owned());
        let view = tab.as_deref().and_then(|t| match DashboardTab::from_str(t) {
            Ok(view) => Some(view),
            Err(_) => {
                log::warn!("Ignoring unknown view hint '{}'", t);
                None
            }
        });

        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != CONNECTED_PARAM && k != TAB_PARAM)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(kept);
        }
        navigation.replace(url);

        log::info!("Login round-trip detected (view hint: {:?})", view);
        Some(LoginReturn { view })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LaunchContext;

    #[test]
    fn consumes_marker_and_hint() {
        let nav = LaunchContext::parse("http://localhost:5173/?connected=1&tab=characters").unwrap();

        let found = TriggerDetector::detect(&nav).unwrap();
        assert_eq!(found.view, Some(DashboardTab::Characters));
        assert_eq!(nav.current().as_str(), "http://localhost:5173/");

        assert!(TriggerDetector::detect(&nav).is_none());
    }

    #[test]
    fn keeps_unrelated_parameters() {
        let nav = LaunchContext::parse("http://localhost:5173/?lang=de&connected=1").unwrap();

        let found = TriggerDetector::detect(&nav).unwrap();
        assert_eq!(found.view, None);
        assert_eq!(nav.current().query(), Some("lang=de"));
    }

    #[test]
    fn empty_marker_is_not_a_login() {
        let nav = LaunchContext::parse("http://localhost:5173/?connected=&tab=settings").unwrap();
        assert!(TriggerDetector::detect(&nav).is_none());
        assert_eq!(nav.current().query(), Some("connected=&tab=settings"));
    }

    #[test]
    fn unknown_hint_still_arms() {
        let nav = LaunchContext::parse("http://localhost:5173/?connected=1&tab=auction").unwrap();
        assert_eq!(TriggerDetector::detect(&nav), Some(LoginReturn { view: None }));
    }
}

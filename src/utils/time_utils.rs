use chrono::{DateTime, Local, NaiveDateTime, Utc};

pub struct TimeUtils;

impl TimeUtils {
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
    pub const SHORT_TIME_FORMAT: &str = "%H:%M";
}

/// Unix seconds (backend clock) -> local wall time for labels.
pub fn epoch_sec_to_local(epoch_sec: i64) -> String {
    match DateTime::from_timestamp(epoch_sec, 0) {
        Some(dt) => dt
            .with_timezone(&Local)
            .format(TimeUtils::STANDARD_TIME_FORMAT)
            .to_string(),
        None => "-".to_string(),
    }
}

/// Backend timestamps are naive UTC.
pub fn naive_utc_to_local(ts: &NaiveDateTime) -> String {
    ts.and_utc()
        .with_timezone(&Local)
        .format(TimeUtils::STANDARD_TIME_FORMAT)
        .to_string()
}

/// "just now", "4m ago", "2h ago", "3d ago".
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    match secs {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

pub fn format_duration(ms: i64) -> String {
    let secs = ms / 1000;
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m {}s", mins, secs % 60);
    }
    format!("{}h {}m", mins / 60, mins % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now, now), "just now");
        assert_eq!(time_ago(now - Duration::minutes(4), now), "4m ago");
        assert_eq!(time_ago(now - Duration::hours(2), now), "2h ago");
        assert_eq!(time_ago(now - Duration::days(3), now), "3d ago");
        // Clock skew never goes negative
        assert_eq!(time_ago(now + Duration::minutes(1), now), "just now");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(42_000), "42s");
        assert_eq!(format_duration(90_000), "1m 30s");
        assert_eq!(format_duration(3_720_000), "1h 2m");
    }

    #[test]
    fn bad_epoch_is_a_dash() {
        assert_eq!(epoch_sec_to_local(i64::MAX), "-");
    }
}

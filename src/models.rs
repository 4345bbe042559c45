use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub url: Option<String>,
    pub author: Option<String>,
    pub comment_count: i64,
    pub points: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl Story {
    // Host part of the story URL, shown next to the title
    pub fn domain(&self) -> Option<&str> {
        let url = self.url.as_deref()?;
        let rest = url.split_once("://").map(|(_, rest)| rest).unwrap_or(url);
        let host = rest.split(['/', '?', '#']).next()?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        if host.is_empty() {
            None
        } else {
            Some(host)
        }
    }

    pub fn time_ago(&self, now: DateTime<Utc>) -> Option<String> {
        self.created_at.map(|created| format_time_ago(created, now))
    }
}

/// Everything the view needs to render the result list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchState {
    pub items: Vec<Story>,
    pub is_loading: bool,
    pub is_error: bool,
}

impl FetchState {
    pub fn new() -> Self {
        Self::default()
    }
}

pub fn format_time_ago(created: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(created);

    let (amount, unit) = if elapsed.num_days() > 0 {
        (elapsed.num_days(), "day")
    } else if elapsed.num_hours() > 0 {
        (elapsed.num_hours(), "hour")
    } else if elapsed.num_minutes() > 0 {
        (elapsed.num_minutes(), "minute")
    } else {
        return "just now".to_string();
    };

    if amount == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", amount, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn story_with_url(url: Option<&str>) -> Story {
        Story {
            id: "1".to_string(),
            title: "Redux".to_string(),
            url: url.map(str::to_string),
            author: None,
            comment_count: 0,
            points: 0,
            created_at: None,
        }
    }

    #[test]
    fn domain_strips_scheme_path_and_www() {
        let story = story_with_url(Some("https://www.redux.js.org/introduction?x=1"));
        assert_eq!(story.domain(), Some("redux.js.org"));
    }

    #[test]
    fn domain_is_none_without_url() {
        assert_eq!(story_with_url(None).domain(), None);
        assert_eq!(story_with_url(Some("https://")).domain(), None);
    }

    #[test]
    fn time_ago_picks_largest_unit() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(format_time_ago(now - Duration::seconds(20), now), "just now");
        assert_eq!(format_time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(format_time_ago(now - Duration::hours(5), now), "5 hours ago");
        assert_eq!(format_time_ago(now - Duration::days(3), now), "3 days ago");
    }

    #[test]
    fn time_ago_needs_a_timestamp() {
        let now = Utc::now();
        assert_eq!(story_with_url(None).time_ago(now), None);
    }

    #[test]
    fn new_fetch_state_is_idle() {
        let state = FetchState::new();
        assert!(state.items.is_empty());
        assert!(!state.is_loading);
        assert!(!state.is_error);
    }
}

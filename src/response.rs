use std::sync::LazyLock;

use regex::Regex;
use reqwest::StatusCode;
use serde_json::Value;

/// Longest excerpt carried by a strict-path error.
pub const ERROR_EXCERPT_LEN: usize = 500;
/// Longest excerpt contributed by one probe to the aggregate leaderboard error.
pub const PROBE_EXCERPT_LEN: usize = 200;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag pattern"));

/// Lichess may label JSON with a `+json` suffix or its own `vnd.lichess`
/// media type instead of plain `application/json`.
pub fn is_json_like(content_type: Option<&str>) -> bool {
    match content_type {
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            ct.contains("application/json") || ct.contains("+json") || ct.contains("vnd.lichess")
        }
        None => false,
    }
}

pub fn strip_tags(text: &str) -> String {
    TAG.replace_all(text, "").into_owned()
}

/// Tag-stripped, trimmed and truncated to `max` characters.
pub fn excerpt(text: &str, max: usize) -> String {
    strip_tags(text).trim().chars().take(max).collect()
}

/// What a lenient fetch saw. Never an error on its own: the caller decides
/// whether a non-JSON answer means "try the next endpoint".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Json {
        status: StatusCode,
        value: Value,
    },
    Text {
        status: StatusCode,
        body: String,
        // only set when the header itself was not JSON-like
        content_type: Option<String>,
    },
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        match self {
            FetchOutcome::Json { status, .. } | FetchOutcome::Text { status, .. } => {
                status.is_success()
            }
        }
    }

    pub fn json(&self) -> Option<&Value> {
        match self {
            FetchOutcome::Json { value, .. } => Some(value),
            FetchOutcome::Text { .. } => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            FetchOutcome::Json { value, .. } => Some(value),
            FetchOutcome::Text { .. } => None,
        }
    }

    /// Short human-readable account of a non-JSON answer: a body excerpt,
    /// else the offending content-type. `None` when there is nothing to say.
    pub fn describe(&self, max: usize) -> Option<String> {
        match self {
            FetchOutcome::Json { .. } => None,
            FetchOutcome::Text {
                body, content_type, ..
            } => {
                let text = if body.is_empty() {
                    content_type.clone().unwrap_or_default()
                } else {
                    excerpt(body, max)
                };
                Some(text).filter(|s| !s.is_empty())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_json_like_content_types() {
        assert!(is_json_like(Some("application/json; charset=utf-8")));
        assert!(is_json_like(Some("application/vnd.lichess.v3+json")));
        assert!(is_json_like(Some("application/problem+json")));
        assert!(is_json_like(Some("Application/JSON")));
        assert!(!is_json_like(Some("text/html; charset=utf-8")));
        assert!(!is_json_like(Some("text/plain")));
        assert!(!is_json_like(None));
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(
            strip_tags("<html><body>Not found</body></html>"),
            "Not found"
        );
        assert_eq!(strip_tags("a < b and c > d"), "a  d");
        assert_eq!(strip_tags("plain"), "plain");
    }

    #[test]
    fn test_excerpt_trims_and_truncates_by_chars() {
        assert_eq!(excerpt("  <p> hi </p>\n", 500), "hi");
        let long = "é".repeat(600);
        let cut = excerpt(&long, 500);
        assert_eq!(cut.chars().count(), 500);
    }

    #[test]
    fn test_describe_prefers_body_then_content_type() {
        let html = FetchOutcome::Text {
            status: StatusCode::OK,
            body: "<h1>down</h1>".into(),
            content_type: Some("text/html".into()),
        };
        assert_eq!(html.describe(PROBE_EXCERPT_LEN).as_deref(), Some("down"));

        let empty = FetchOutcome::Text {
            status: StatusCode::BAD_GATEWAY,
            body: String::new(),
            content_type: Some("text/plain".into()),
        };
        assert_eq!(empty.describe(PROBE_EXCERPT_LEN).as_deref(), Some("text/plain"));
        assert!(!empty.is_success());

        let unparsed = FetchOutcome::Text {
            status: StatusCode::OK,
            body: String::new(),
            content_type: None,
        };
        assert_eq!(unparsed.describe(PROBE_EXCERPT_LEN), None);

        let json = FetchOutcome::Json {
            status: StatusCode::OK,
            value: json!({"a": 1}),
        };
        assert_eq!(json.describe(PROBE_EXCERPT_LEN), None);
        assert_eq!(json.json(), Some(&json!({"a": 1})));
    }
}

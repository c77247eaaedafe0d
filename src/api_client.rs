use std::env;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Response, Url};
use serde_json::{Map, Value};

use crate::client::Client;
use crate::error::{EnvVarError, Error, JSONError};
use crate::response::{excerpt, is_json_like, FetchOutcome, ERROR_EXCERPT_LEN, PROBE_EXCERPT_LEN};
use crate::types::Category;

pub const DEFAULT_BASE_URL: &str = "https://lichess.org/api";
pub const BASE_URL_VAR: &str = "LICHESS_API_BASE";

const ACCEPT_JSON: &str = "application/json, application/vnd.lichess.v3+json, */*";

pub struct LichessClient {
    client: reqwest::Client,
    base_url: Url,
}

impl LichessClient {
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let invalid = |reason: String| Error::BaseUrl {
            url: base_url.into(),
            reason,
        };
        let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("cannot be a base".into()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));

        Ok(Self {
            client: reqwest::Client::builder()
                .default_headers(headers)
                .build()?,
            base_url: parsed,
        })
    }

    // LICHESS_API_BASE overrides the public API
    // can use dotenv
    pub fn from_env() -> Result<Self, Error> {
        match env::var(BASE_URL_VAR) {
            Ok(url) => Self::new(&url),
            Err(env::VarError::NotPresent) => Self::new(DEFAULT_BASE_URL),
            Err(e) => Err(EnvVarError::new(BASE_URL_VAR, e).into()),
        }
    }

    /// Appends percent-encoded path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, url: Url) -> Result<Response, Error> {
        debug!("GET {url}");
        Ok(self.client.get(url).send().await?)
    }

    /// Fails on a non-2xx status or a body that is not labelled as JSON, with
    /// a tag-stripped excerpt of whatever came back.
    pub async fn fetch_strict_json(&self, url: Url) -> Result<Value, Error> {
        let location = url.to_string();
        let res = self.send(url).await?;
        let status = res.status();
        let content_type = content_type(&res);

        if !status.is_success() {
            let body = res.text().await?;
            let mut message = excerpt(&body, ERROR_EXCERPT_LEN);
            if message.is_empty() {
                message = status
                    .canonical_reason()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            }
            return Err(Error::Status { status, message });
        }

        if !is_json_like(content_type.as_deref()) {
            let body = res.text().await?;
            return Err(Error::ContentType {
                content_type: content_type.unwrap_or_default(),
                excerpt: excerpt(&body, ERROR_EXCERPT_LEN),
            });
        }

        let body = res.text().await?;
        serde_json::from_str(&body).map_err(|e| JSONError::new(location, e).into())
    }

    /// Classifies the answer instead of judging it. Only transport failures
    /// are errors here.
    pub async fn fetch_lenient(&self, url: Url) -> Result<FetchOutcome, Error> {
        let res = self.send(url).await?;
        let status = res.status();
        let content_type = content_type(&res);
        let body = res.text().await?;

        if is_json_like(content_type.as_deref()) {
            return Ok(match serde_json::from_str(&body) {
                Ok(value) => FetchOutcome::Json { status, value },
                Err(e) => {
                    debug!("unparsable JSON body ({status}): {e}");
                    FetchOutcome::Text {
                        status,
                        body,
                        content_type: None,
                    }
                }
            });
        }

        Ok(FetchOutcome::Text {
            status,
            body,
            content_type,
        })
    }

    async fn probe(&self, url: Url) -> Option<Value> {
        let location = url.to_string();
        match self.fetch_lenient(url).await {
            Ok(outcome) => {
                if outcome.json().is_none() {
                    debug!(
                        "{location} gave no JSON (success: {}): {}",
                        outcome.is_success(),
                        outcome.describe(PROBE_EXCERPT_LEN).unwrap_or_default()
                    );
                }
                outcome.into_json()
            }
            Err(e) => {
                warn!("{location}: {e}");
                None
            }
        }
    }

    async fn user_profile(&self, username: &str) -> Result<Value, Error> {
        let username = username.trim();
        // dot segments would be collapsed out of the URL path
        if username.is_empty() || username == "." || username == ".." {
            return Err(Error::Validation("username"));
        }
        self.fetch_strict_json(self.endpoint(&["user", username]))
            .await
    }

    async fn tournaments(&self) -> Result<Value, Error> {
        self.fetch_strict_json(self.endpoint(&["tournament"])).await
    }

    /// The leaderboard endpoint has moved between API versions, so this walks
    /// every known shape and returns the first one that answers with JSON.
    async fn leaderboards(&self) -> Result<Value, Error> {
        if let Some(value) = self.probe(self.endpoint(&["player"])).await {
            return Ok(value);
        }

        let probes = join_all(Category::ALL.map(|category| {
            self.fetch_lenient(self.endpoint(&["player", "top", "100", category.as_str()]))
        }))
        .await;

        let excerpts = match combine_categories(probes) {
            Ok(boards) => return Ok(Value::Object(boards)),
            Err(excerpts) => excerpts,
        };

        let mut top = self.endpoint(&["player", "top"]);
        if let Some(value) = self.probe(top.clone()).await {
            return Ok(value);
        }
        top.query_pairs_mut()
            .append_pair("perf", Category::Blitz.as_str());
        if let Some(value) = self.probe(top).await {
            return Ok(value);
        }

        let summary = if excerpts.is_empty() {
            "no response".to_string()
        } else {
            excerpts.join(" | ")
        };
        Err(Error::LeaderboardsExhausted(summary))
    }
}

fn content_type(res: &Response) -> Option<String> {
    res.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Every category that answered with JSON, keyed by name. When none did, the
/// error side holds one descriptor per failed probe, in category order.
fn combine_categories(
    probes: Vec<Result<FetchOutcome, Error>>,
) -> Result<Map<String, Value>, Vec<String>> {
    let mut boards = Map::new();
    let mut excerpts = Vec::new();

    for (category, probe) in Category::ALL.iter().zip(probes) {
        match probe {
            Ok(FetchOutcome::Json { value, .. }) => {
                boards.insert(category.as_str().to_owned(), value);
            }
            Ok(outcome) => {
                debug!("no JSON for {}", category.as_str());
                excerpts.extend(outcome.describe(PROBE_EXCERPT_LEN));
            }
            Err(e) => {
                warn!("{} leaderboard: {e}", category.as_str());
                excerpts.push(excerpt(&e.to_string(), PROBE_EXCERPT_LEN));
            }
        }
    }

    if boards.is_empty() {
        excerpts.retain(|e| !e.is_empty());
        Err(excerpts)
    } else {
        Ok(boards)
    }
}

#[async_trait]
impl Client for LichessClient {
    async fn get_user_profile(&self, username: &str) -> Result<Value, Error> {
        self.user_profile(username).await
    }
    async fn get_leaderboards(&self) -> Result<Value, Error> {
        self.leaderboards().await
    }
    async fn get_tournaments(&self) -> Result<Value, Error> {
        self.tournaments().await
    }
}

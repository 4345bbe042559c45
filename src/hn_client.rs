use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::FetchError;
use crate::models::Story;

pub type SearchFuture = Pin<Box<dyn Future<Output = Result<Vec<Story>, FetchError>> + Send>>;

/// Where a round-trip goes: the endpoint prefix followed by the committed term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    endpoint: String,
    term: String,
}

impl RequestTarget {
    pub fn new(endpoint: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            term: term.into(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Prefix and term concatenated as-is. This is the identity used for change detection.
    pub fn as_url(&self) -> String {
        format!("{}{}", self.endpoint, self.term)
    }

    /// The URL actually sent over the wire.
    pub fn encoded_url(&self) -> String {
        format!("{}{}", self.endpoint, urlencoding::encode(&self.term))
    }
}

/// Anything that can answer a search round-trip.
pub trait SearchApi {
    fn search(&self, target: RequestTarget) -> SearchFuture;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "objectID")]
    object_id: String,
    title: Option<String>,
    url: Option<String>,
    author: Option<String>,
    num_comments: Option<i64>,
    points: Option<i64>,
    created_at_i: Option<i64>,
}

impl From<Hit> for Story {
    fn from(hit: Hit) -> Self {
        Self {
            id: hit.object_id,
            title: hit.title.unwrap_or_default(),
            // Algolia sends "" for self posts
            url: hit.url.filter(|url| !url.is_empty()),
            author: hit.author,
            comment_count: hit.num_comments.unwrap_or(0),
            points: hit.points.unwrap_or(0),
            created_at: hit
                .created_at_i
                .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)),
        }
    }
}

/// Maps a raw search response body into stories, keeping response order.
pub fn decode_hits(body: &[u8]) -> Result<Vec<Story>, FetchError> {
    let response: SearchResponse = serde_json::from_slice(body)?;
    Ok(response.hits.into_iter().map(Story::from).collect())
}

#[derive(Clone)]
pub struct HackerNewsClient {
    client: Client,
}

impl HackerNewsClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client })
    }

    async fn fetch_stories(client: Client, target: RequestTarget) -> Result<Vec<Story>, FetchError> {
        let url = target.encoded_url();
        debug!(%url, "requesting stories");

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport { url: url.clone(), source })?;

        let stories = decode_hits(&body)?;
        debug!(%url, count = stories.len(), "decoded stories");
        Ok(stories)
    }
}

impl SearchApi for HackerNewsClient {
    fn search(&self, target: RequestTarget) -> SearchFuture {
        Box::pin(Self::fetch_stories(self.client.clone(), target))
    }
}

//! Shared fixtures for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use crate::error::FetchError;
use crate::hn_client::{RequestTarget, SearchApi, SearchFuture};
use crate::models::Story;
use crate::storage::KeyValueStore;

pub const PREFIX: &str = "https://hn.algolia.com/api/v1/search?query=";

pub fn story(id: &str, title: &str) -> Story {
    Story {
        id: id.to_string(),
        title: title.to_string(),
        url: Some(format!("https://example.com/{}", id)),
        author: Some("someone".to_string()),
        comment_count: 0,
        points: 0,
        created_at: None,
    }
}

pub fn server_error() -> FetchError {
    FetchError::Status {
        url: PREFIX.to_string(),
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn with(key: &str, value: &str) -> Self {
        let mut store = Self::default();
        store.values.insert(key.to_string(), value.to_string());
        store
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.writes += 1;
        self.values.insert(key.to_string(), value);
    }
}

enum Scripted {
    Ready(Result<Vec<Story>, FetchError>),
    Gated(oneshot::Receiver<Result<Vec<Story>, FetchError>>),
}

/// Search capability that records every request and answers from a script.
/// Unscripted requests succeed with an empty list.
#[derive(Clone, Default)]
pub struct MockSearchApi {
    calls: Arc<Mutex<Vec<String>>>,
    script: Arc<Mutex<VecDeque<Scripted>>>,
}

impl MockSearchApi {
    pub fn respond(&self, result: Result<Vec<Story>, FetchError>) {
        self.script.lock().unwrap().push_back(Scripted::Ready(result));
    }

    /// The next request waits until the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<Result<Vec<Story>, FetchError>> {
        let (tx, rx) = oneshot::channel();
        self.script.lock().unwrap().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl SearchApi for MockSearchApi {
    fn search(&self, target: RequestTarget) -> SearchFuture {
        self.calls.lock().unwrap().push(target.as_url());
        let scripted = self.script.lock().unwrap().pop_front();

        Box::pin(async move {
            match scripted {
                None => Ok(Vec::new()),
                Some(Scripted::Ready(result)) => result,
                Some(Scripted::Gated(rx)) => rx.await.unwrap_or_else(|_| Err(server_error())),
            }
        })
    }
}

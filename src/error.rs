//! Error types for the search client

use thiserror::Error;

/// Why a round-trip failed. The orchestrator collapses all of these into
/// a single `FetchFailure` transition after logging them.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("could not decode search response: {0}")]
    Decode(#[from] serde_json::Error),
}

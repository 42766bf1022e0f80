//! Errors raised while fetching from an upstream feed

use thiserror::Error;

/// Everything that can go wrong inside a single feed fetch.
///
/// All variants are local to one fetch: the scheduler reports them and moves on.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network failure, timeout or a non-success HTTP status.
    #[error("transport error: {0}")]
    Transport(String),
    /// The body was not the JSON shape the feed publishes.
    #[error("decode error: {0}")]
    Decode(String),
    /// The body decoded but its content is unusable.
    #[error("data error: {0}")]
    Data(String),
    /// The task running the fetch panicked or was cancelled.
    #[error("feed task aborted: {0}")]
    Aborted(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FeedError::Decode(err.to_string())
        } else {
            FeedError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Decode(err.to_string())
    }
}

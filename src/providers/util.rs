use crate::core::FeedError;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "fxfeed/0.1";

/// Builds the HTTP client used by a feed. `None` means no request timeout.
pub fn http_client(timeout: Option<Duration>) -> Result<reqwest::Client, FeedError> {
    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Sends `request` and decodes the whole body as `T`.
///
/// The body is fully decoded before anything is returned, so callers never act on a
/// partially parsed payload.
pub async fn fetch_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, FeedError> {
    let response = request.send().await?;
    let status = response.status();
    debug!(%status, url = %response.url().path(), "Received feed response");

    if !status.is_success() {
        return Err(FeedError::Transport(format!("HTTP error: {status}")));
    }

    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

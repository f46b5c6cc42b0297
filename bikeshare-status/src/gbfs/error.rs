//! GBFS client error types.

/// Errors from fetching or reading a GBFS feed.
///
/// Each variant is one distinct way a fetch can fail, so callers that care
/// can tell a network outage from a feed that changed shape.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// HTTP request failed (DNS, connection refused, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed returned a non-success status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body is not JSON
    #[error(
        "JSON parse error: {message}{}",
        .body.as_deref().map(|b| format!(" (body: {b})")).unwrap_or_default()
    )]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Response is JSON but lacks the expected structure
    #[error("unexpected feed structure: {message}")]
    Schema { message: String },
}

impl FeedError {
    /// Build a [`FeedError::Json`], keeping the start of the offending body.
    pub(crate) fn json(err: &serde_json::Error, body: &str) -> Self {
        FeedError::Json {
            message: err.to_string(),
            body: Some(body.chars().take(500).collect()),
        }
    }

    pub(crate) fn schema(message: impl Into<String>) -> Self {
        FeedError::Schema {
            message: message.into(),
        }
    }
}

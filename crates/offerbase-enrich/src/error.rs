use thiserror::Error;

/// Errors returned by the enrichment client.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the provider; the caller should rotate models.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The provider returned a non-2xx status with an error payload.
    #[error("API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

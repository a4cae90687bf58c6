//! Error types for backend submission.

/// Errors that can occur while talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A `find` response that is not JSON.
    #[error("response from {url} is not valid JSON: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A document could not be written as JSON.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Configuration that cannot produce a usable client.
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),

    /// Operations need a collection name.
    #[error("collection name must not be empty")]
    EmptyCollection,
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

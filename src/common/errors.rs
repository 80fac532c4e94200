//! Error types for the application

use thiserror::Error;

/// Result type alias using our WatcherError
pub type Result<T> = std::result::Result<T, WatcherError>;

/// Main error type for watcher operations
#[derive(Error, Debug)]
pub enum WatcherError {
    /// Market directory resolution errors (fatal at startup)
    #[error("market resolution error: {0}")]
    Resolution(String),

    /// Deployment manifest errors
    #[error("deployment manifest error: {0}")]
    Manifest(String),

    /// Error responses from the JSON-RPC node
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// HTTP request errors
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// WebSocket connection or communication errors
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// Event log decoding errors
    #[error("log decode error: {0}")]
    Decode(String),

    /// Fixed-point to decimal conversion errors
    #[error("numeric conversion error: {0}")]
    Conversion(String),

    /// Flavor corpus errors (missing or empty corpus file)
    #[error("flavor corpus error: {0}")]
    Corpus(String),

    /// Notification sink errors
    #[error("sink error: {0}")]
    Sink(String),

    /// Authentication errors
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Channel send errors
    #[error("channel send error: {0}")]
    ChannelSend(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for WatcherError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        WatcherError::WebSocket(err.to_string())
    }
}

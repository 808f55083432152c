//! Error types shared across the crate.
use thiserror::Error;

/// Result type alias for `groupstats` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// An error reported while talking to the Graph API.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The Graph API answered with an application-level error.
    #[error("Graph returned an error: {message}")]
    Response {
        code: Option<i64>,
        kind: Option<String>,
        message: String,
    },

    /// The request never produced a usable response: transport failures,
    /// undecodable payloads, or a request rejected before it was sent.
    #[error("Graph client returned an error: {0}")]
    Client(String),
}

impl From<reqwest::Error> for GraphError {
    fn from(err: reqwest::Error) -> Self {
        GraphError::Client(err.to_string())
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        GraphError::Client(err.to_string())
    }
}

/// Top-level error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A fetch against the Graph API failed. Everything fetched by the failing
    /// operation is discarded.
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the underlying Graph failure, if this error came from a fetch.
    pub fn as_graph(&self) -> Option<&GraphError> {
        match self {
            Error::Graph(err) => Some(err),
            _ => None,
        }
    }
}

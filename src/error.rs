/// Result type alias for the application
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the application
#[derive(Debug)]
pub enum Error {
    /// The credential was rejected by the remote host (HTTP 401).
    AuthFailure,
    /// The requested path does not exist in the repository (HTTP 404).
    NotFound { path: String },
    /// Network failure, timeout, or an unexpected HTTP status.
    Transport { detail: String },
    /// Every candidate routes-file path was exhausted.
    RoutesFileNotFound { attempted: Vec<String> },
    IoError(std::io::Error),
    SerializationError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::AuthFailure => write!(
                f,
                "authentication failed: the token was rejected or lacks the 'repo' scope"
            ),
            Error::NotFound { path } => write!(f, "not found in repository: {}", path),
            Error::Transport { detail } => write!(f, "transport error: {}", detail),
            Error::RoutesFileNotFound { attempted } => write!(
                f,
                "no routes file found; attempted paths: {}",
                attempted.join(", ")
            ),
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::SerializationError(msg) => write!(f, "serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport {
            detail: err.to_string(),
        }
    }
}

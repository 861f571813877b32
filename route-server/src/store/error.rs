//! Route store error types.

use std::path::PathBuf;

/// Errors that can occur when reading or writing route storage.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication failed
    #[error("unauthorized: check FIRESTORE_TOKEN")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse or produce JSON
    #[error("JSON error: {message}")]
    Json { message: String },

    /// File operation failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Collection name cannot be used as a file name
    #[error("invalid collection name {name:?}")]
    InvalidCollection { name: String },

    /// Store could not be reached or configured
    #[error("store unavailable: {message}")]
    Unavailable { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::Unauthorized;
        assert_eq!(err.to_string(), "unauthorized: check FIRESTORE_TOKEN");

        let err = StoreError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: Service Unavailable");

        let err = StoreError::Io {
            path: PathBuf::from("data/routes.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.to_string(), "I/O error on data/routes.json: denied");

        let err = StoreError::Json {
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("expected value"));
    }
}

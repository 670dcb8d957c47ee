//! Site activation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SitesError {
    /// The URL could not be parsed or has no host.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_error() {
        let err = SitesError::InvalidUrl("not a url".to_string());
        assert_eq!(err.to_string(), "Invalid URL: not a url");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = SitesError::from(io_err);
        assert!(err.to_string().contains("read-only"));
    }
}

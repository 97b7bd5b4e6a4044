//! Text generation errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generator not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Generator returned no text")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured() {
        let err = GenerationError::NotConfigured("missing api key".to_string());
        assert!(err.to_string().contains("not configured"));
        assert!(err.to_string().contains("missing api key"));
    }

    #[test]
    fn test_api_error() {
        let err = GenerationError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_empty_response() {
        let err = GenerationError::EmptyResponse;
        assert_eq!(err.to_string(), "Generator returned no text");
    }

    #[test]
    fn test_timeout() {
        let err = GenerationError::Timeout(30);
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_debug() {
        let err = GenerationError::Network("refused".to_string());
        assert!(format!("{:?}", err).contains("Network"));
    }
}

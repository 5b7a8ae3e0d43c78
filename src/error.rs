//! Startup errors.

use crate::config::RateLimitConfigError;

/// Errors that abort server startup
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid rate limit policy '{policy}': {source}")]
    InvalidPolicy {
        policy: String,
        #[source]
        source: RateLimitConfigError,
    },

    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

impl From<StartupError> for std::io::Error {
    fn from(err: StartupError) -> Self {
        std::io::Error::other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_policy_message_names_policy() {
        let err = StartupError::InvalidPolicy {
            policy: "video_upload".to_string(),
            source: RateLimitConfigError::ZeroLimit,
        };
        assert_eq!(
            err.to_string(),
            "invalid rate limit policy 'video_upload': rate limit quota must be greater than zero"
        );

        let io: std::io::Error = err.into();
        assert!(io.to_string().contains("video_upload"));
    }
}

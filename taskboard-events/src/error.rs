//! Error types for the taskboard-events crate.

/// Errors that can occur when building or driving an event session.
///
/// Poll failures during a running session never surface here; they are
/// published on the `error` channel so subscribers see them in stream order.
#[derive(Debug, thiserror::Error)]
pub enum EventsError {
    /// A call to the board API failed
    #[error("API error: {0}")]
    Api(#[from] taskboard_api::ApiError),

    /// Invalid configuration provided
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Convenience type alias for Results using EventsError.
pub type Result<T> = std::result::Result<T, EventsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_api::ApiError;

    #[test]
    fn test_error_display() {
        let error = EventsError::Configuration("poll interval must be greater than 0".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: poll interval must be greater than 0"
        );

        let error = EventsError::Api(ApiError::Http(503));
        assert_eq!(error.to_string(), "API error: HTTP error: status 503");
    }

    #[test]
    fn test_error_conversion_from_api_error() {
        let api_error = ApiError::Network("connection refused".to_string());
        let events_error: EventsError = api_error.into();

        match events_error {
            EventsError::Api(e) => {
                assert_eq!(e.to_string(), "Network error: connection refused");
            }
            _ => panic!("Expected Api variant"),
        }
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}

use thiserror::Error;

/// High-level API errors for board operations
///
/// This enum abstracts away the underlying HTTP details and provides
/// meaningful error information for the failure scenarios callers actually
/// need to distinguish: transport problems, HTTP-level rejections, and
/// application-level errors carried inside the reply envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network communication error
    ///
    /// Connection refused, DNS failures, timeouts, or any other failure to
    /// complete the request at the transport level.
    #[error("Network error: {0}")]
    Network(String),

    /// Unexpected HTTP status returned by the server
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// Application error carried inside the reply envelope
    ///
    /// The server answered with 200 OK but the envelope's reply code
    /// indicates the operation failed (bad board id, expired session, ...).
    #[error("API error: code {code}: {text}")]
    Api {
        /// Reply code from the envelope
        code: u16,
        /// Reply text from the envelope
        text: String,
    },

    /// Response body could not be decoded into the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid credentials or client options at construction time
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

/// Convert from reqwest errors to ApiError at the transport boundary
impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ApiError::Decode(error.to_string())
        } else {
            ApiError::Network(error.to_string())
        }
    }
}

/// Client-specific result type
pub type Result<T> = std::result::Result<T, SttError>;

/// Errors from the Speech to Text client
#[derive(Debug, thiserror::Error)]
pub enum SttError {
    /// A precondition on an argument failed before any request was built
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned an error response
    #[error("service error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Remote-supplied error message
        message: String,
    },

    /// Failed to parse a response body
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// Invalid client configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

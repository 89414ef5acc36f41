use thiserror::Error;

/// A convenience `Result` alias using [`AskMeError`].
pub type AskMeResult<T> = Result<T, AskMeError>;

/// Top-level error type for the AskMe backend.
///
/// Each variant corresponds to a subsystem that can produce errors. Session
/// lookup misses are deliberately *not* represented here: "not found or
/// expired" is a recoverable outcome handled as control flow by callers of the
/// session store, never a propagated failure.
#[derive(Debug, Error)]
pub enum AskMeError {
    /// An error from the generative model backend (API call or response shape).
    #[error("Model error: {0}")]
    Model(String),

    /// An error from the API gateway layer.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from an outbound HTTP request.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

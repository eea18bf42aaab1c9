//! Error types for the digit pad

use thiserror::Error;

/// Result type alias for digit pad operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while drawing or recognizing
#[derive(Error, Debug)]
pub enum Error {
    /// Recognition was triggered on a blank canvas; no model call is made
    #[error("Canvas is empty. Please draw a digit first.")]
    EmptyCanvas,

    /// The canvas snapshot could not be produced
    #[error("Could not get image data from canvas: {0}")]
    ExportUnavailable(String),

    /// The encoded image did not match the `<tag>,<payload>` data-URL shape
    #[error("Invalid image data URL format: {0}")]
    MalformedInput(String),

    /// The external model call failed at the transport or service level.
    /// The underlying cause is logged, not carried here.
    #[error("An error occurred while communicating with the AI service.")]
    RecognitionFailed,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The recognizer worker thread is gone
    #[error("Recognizer worker unavailable: {0}")]
    WorkerGone(String),

    /// Creating or updating the demo window failed
    #[error("Window error: {0}")]
    Window(String),
}

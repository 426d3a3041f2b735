use thiserror::Error;

/// Why a question fetch (or configuration load) failed.
#[derive(Debug, Error)]
pub enum QuestionError {
    /// Transport-level failure, including the request deadline.
    #[error("question request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("question service returned {0}")]
    Status(reqwest::StatusCode),

    /// The payload had no usable `id` and `text` pair.
    #[error("question payload missing id or text")]
    MalformedPayload,

    /// An environment variable could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),
}

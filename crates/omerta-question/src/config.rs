//! Question service configuration.
//!
//! Loaded from environment variables; every knob has a default so the
//! server runs with no environment at all.

use std::time::Duration;

use crate::error::QuestionError;

/// Where the question service lives when nothing is configured.
pub const DEFAULT_URL: &str = "http://localhost:9000/question";

const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// How to reach the external question service.
#[derive(Debug, Clone)]
pub struct QuestionConfig {
    /// Full URL of the "get a question" endpoint.
    pub url: String,
    /// Per-request deadline. A round never waits longer than this.
    pub timeout: Duration,
}

impl Default for QuestionConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_owned(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl QuestionConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional variables:
    /// - `OMERTA_QUESTION_URL` -- endpoint URL (default
    ///   `http://localhost:9000/question`)
    /// - `OMERTA_QUESTION_TIMEOUT_MS` -- request deadline in
    ///   milliseconds (default 5000)
    pub fn from_env() -> Result<Self, QuestionError> {
        let url = std::env::var("OMERTA_QUESTION_URL")
            .unwrap_or_else(|_| DEFAULT_URL.to_owned());

        let timeout_ms: u64 = std::env::var("OMERTA_QUESTION_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_MS.to_string())
            .parse()
            .map_err(|e| {
                QuestionError::Config(format!(
                    "invalid OMERTA_QUESTION_TIMEOUT_MS: {e}"
                ))
            })?;

        Ok(Self {
            url,
            timeout: Duration::from_millis(timeout_ms),
        })
    }
}

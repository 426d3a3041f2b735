//! HTTP client for the external question service.
//!
//! The service has exactly one operation: GET the configured URL, no
//! parameters, and get back `{"id": "...", "text": "..."}`. Anything
//! else counts as a failure, and the caller substitutes the local
//! fallback question so a round never stalls on this dependency.

use std::time::Duration;

use crate::config::QuestionConfig;
use crate::error::QuestionError;

/// Text used whenever the service does not deliver.
const FALLBACK_TEXT: &str =
    "Who is most likely to survive a zombie apocalypse?";

/// One side question for a night round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: String,
    pub text: String,
}

impl Question {
    /// The locally generated stand-in for a failed fetch. Its id is
    /// derived from the round so answers still key to something stable.
    pub fn fallback(round: u32) -> Self {
        Self {
            id: format!("q-{round}"),
            text: FALLBACK_TEXT.to_owned(),
        }
    }
}

/// Client for the question service.
///
/// Holds one connection pool for the process; the per-request deadline
/// comes from [`QuestionConfig`].
#[derive(Debug, Clone)]
pub struct QuestionClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl QuestionClient {
    pub fn new(config: QuestionConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: config.url,
            timeout: config.timeout,
        }
    }

    /// The configured endpoint, for logging.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch one question.
    ///
    /// # Errors
    ///
    /// Any transport failure, timeout, non-2xx status, or payload
    /// without a non-empty `id` and `text` is an error. Callers are
    /// expected to recover with [`Question::fallback`].
    pub async fn fetch(&self) -> Result<Question, QuestionError> {
        let response = self
            .http
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuestionError::Status(status));
        }

        let json: serde_json::Value = response.json().await?;
        extract_question(&json)
    }
}

/// Pull `id` and `text` out of a service payload. Both must be present,
/// string-typed, and non-empty.
fn extract_question(json: &serde_json::Value) -> Result<Question, QuestionError> {
    let id = json.get("id").and_then(serde_json::Value::as_str);
    let text = json.get("text").and_then(serde_json::Value::as_str);

    match (id, text) {
        (Some(id), Some(text)) if !id.is_empty() && !text.is_empty() => {
            Ok(Question {
                id: id.to_owned(),
                text: text.to_owned(),
            })
        }
        _ => Err(QuestionError::MalformedPayload),
    }
}

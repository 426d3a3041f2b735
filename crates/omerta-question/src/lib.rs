//! Client for the external question service.
//!
//! Each night round, the server asks this service for one multiple
//! choice question to put to the players. The dependency is strictly
//! best-effort: the fetch is time-bounded and every failure mode maps
//! to a deterministic local fallback, so game flow never blocks on it.

mod client;
mod config;
mod error;

pub use client::{Question, QuestionClient};
pub use config::{DEFAULT_URL, QuestionConfig};
pub use error::QuestionError;

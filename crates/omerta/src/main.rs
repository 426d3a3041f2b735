//! Server entry point.
//!
//! Reads the bind address and question-service settings from the
//! environment, then runs the accept loop until the process is killed.

use tracing::info;
use tracing_subscriber::EnvFilter;

use omerta::OmertaServer;
use omerta_question::QuestionConfig;

const DEFAULT_ADDR: &str = "0.0.0.0:8000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let addr = std::env::var("OMERTA_ADDR")
        .unwrap_or_else(|_| DEFAULT_ADDR.to_owned());
    let question = QuestionConfig::from_env()?;
    info!(
        addr,
        question_url = question.url,
        question_timeout_ms = question.timeout.as_millis() as u64,
        "configuration loaded"
    );

    let server = OmertaServer::builder()
        .bind(&addr)
        .question_config(question)
        .build()
        .await?;
    info!("accepting player and control connections");

    server.run().await?;
    Ok(())
}

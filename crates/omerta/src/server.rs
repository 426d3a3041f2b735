//! `OmertaServer` builder and accept loop.
//!
//! This is the entry point for running a game server. It ties the
//! layers together: transport → protocol → game registry, plus the
//! question service client for night rounds.

use std::sync::Arc;

use omerta_game::Registry;
use omerta_protocol::JsonCodec;
use omerta_question::{QuestionClient, QuestionConfig};
use omerta_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::OmertaError;
use crate::handler::handle_connection;
use crate::hub::Hub;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry and hub each sit behind their own `Mutex`; handlers take
/// them one at a time and never hold either across network I/O.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<Registry>,
    pub(crate) hub: Mutex<Hub>,
    pub(crate) question: QuestionClient,
    pub(crate) codec: JsonCodec,
}

/// Builder for configuring and starting an Omerta server.
///
/// # Example
///
/// ```rust,no_run
/// use omerta::OmertaServer;
///
/// # async fn run() -> Result<(), omerta::OmertaError> {
/// let server = OmertaServer::builder()
///     .bind("0.0.0.0:8000")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct OmertaServerBuilder {
    bind_addr: String,
    question: QuestionConfig,
}

impl OmertaServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            question: QuestionConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the question service configuration.
    pub fn question_config(mut self, config: QuestionConfig) -> Self {
        self.question = config;
        self
    }

    /// Builds the server: binds the listener and assembles the state.
    ///
    /// The wire speaks JSON, so the codec is fixed to [`JsonCodec`].
    pub async fn build(self) -> Result<OmertaServer, OmertaError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            registry: Mutex::new(Registry::new()),
            hub: Mutex::new(Hub::new()),
            question: QuestionClient::new(self.question),
            codec: JsonCodec,
        });

        Ok(OmertaServer { transport, state })
    }
}

impl Default for OmertaServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Omerta server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct OmertaServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl OmertaServer {
    /// Creates a new builder.
    pub fn builder() -> OmertaServerBuilder {
        OmertaServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    ///
    /// Needed when binding to port 0 and the OS picks the port.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, OmertaError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections on both upgrade paths and spawns a
    /// handler task for each. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), OmertaError> {
        tracing::info!(
            question_url = self.state.question.url(),
            "Omerta server running"
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

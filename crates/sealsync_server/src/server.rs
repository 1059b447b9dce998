//! Main server.

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::handler::{HandlerContext, RequestHandler};
use crate::router::router;
use crate::store::RecordStore;
use axum::Router;
use sealsync_protocol::{HttpRequest, HttpResponse, Record};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// The record server.
///
/// Serves the authoritative record over HTTP, or handles requests
/// in-process through [`SyncServer::handle`].
///
/// # Example
///
/// ```
/// use sealsync_protocol::Record;
/// use sealsync_server::{ServerConfig, SyncServer};
///
/// let config = ServerConfig::default().with_initial_record(Record::new("seed"));
/// let server = SyncServer::new(config);
/// assert_eq!(server.record().data, "seed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncServer {
    handler: Arc<RequestHandler>,
    context: Arc<HandlerContext>,
}

impl SyncServer {
    /// Creates a server holding the configured initial record.
    pub fn new(config: ServerConfig) -> Self {
        let store = Arc::new(RecordStore::new(config.initial_record.clone()));
        Self::with_store(config, store)
    }

    /// Creates a server over an existing store.
    pub fn with_store(config: ServerConfig, store: Arc<RecordStore>) -> Self {
        let context = Arc::new(HandlerContext::new(config, store));
        let handler = Arc::new(RequestHandler::new(Arc::clone(&context)));

        Self { handler, context }
    }

    /// Handles a request in-process.
    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        self.handler.handle(request)
    }

    /// Returns the current authoritative record.
    pub fn record(&self) -> Record {
        self.context.store.get()
    }

    /// Replaces the authoritative record directly, bypassing the gate.
    pub fn replace_record(&self, record: Record) -> Record {
        self.context.store.replace(record)
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.context.config
    }

    /// Returns the HTTP router.
    pub fn router(&self) -> Router {
        router(Arc::clone(&self.handler))
    }

    /// Binds the configured address and serves until the task is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the listener fails.
    pub async fn run(&self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.context.config.bind_addr).await?;
        self.serve(listener).await
    }

    /// Serves on an already bound listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails.
    pub async fn serve(&self, listener: TcpListener) -> ServerResult<()> {
        info!(addr = %listener.local_addr()?, "record server listening");
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

//! Request handling shared by the HTTP router and in-process callers.

use crate::auth::AuthGate;
use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::store::RecordStore;
use sealsync_protocol::{
    HttpRequest, HttpResponse, Record, AUTHORIZATION_HEADER, CONTENT_TYPE_HEADER,
    JSON_CONTENT_TYPE, SIGNATURE_HEADER,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error};

/// Context for request handling.
#[derive(Debug)]
pub struct HandlerContext {
    /// Server configuration.
    pub config: ServerConfig,
    /// The authoritative record (shared across all handlers).
    pub store: Arc<RecordStore>,
}

impl HandlerContext {
    /// Creates a handler context.
    pub fn new(config: ServerConfig, store: Arc<RecordStore>) -> Self {
        Self { config, store }
    }
}

/// Handler for record requests.
#[derive(Debug)]
pub struct RequestHandler {
    context: Arc<HandlerContext>,
}

impl RequestHandler {
    /// Creates a request handler.
    pub fn new(context: Arc<HandlerContext>) -> Self {
        Self { context }
    }

    /// Returns the context.
    pub fn context(&self) -> &HandlerContext {
        &self.context
    }

    /// Handles `GET /`.
    pub fn handle_get(&self) -> Record {
        self.context.store.get()
    }

    /// Handles `POST /`, replacing the record with the JSON `body`.
    ///
    /// # Errors
    ///
    /// [`ServerError::InvalidRequest`] if `body` is not a record.
    pub fn handle_post(&self, body: &[u8]) -> ServerResult<Record> {
        let record: Record = serde_json::from_slice(body)
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
        Ok(self.context.store.replace(record))
    }

    /// Handles a complete exchange: gate, route, respond.
    ///
    /// Rejected requests get `401` with no `x-signature`; every admitted
    /// request's response echoes the token.
    pub fn handle(&self, request: &HttpRequest) -> HttpResponse {
        let token = match AuthGate::admit(request.header(AUTHORIZATION_HEADER)) {
            Ok(token) => token,
            Err(e) => return error_response(&e),
        };

        let body = request.body.as_deref().unwrap_or_default();
        self.route(request.method.as_str(), request.path(), body)
            .with_header(SIGNATURE_HEADER, token)
    }

    /// Routes an admitted request.
    ///
    /// `GET /` and `POST /` are served; any other method on `/` is `405`,
    /// any other path `404`.
    pub fn route(&self, method: &str, path: &str, body: &[u8]) -> HttpResponse {
        debug!(method, path, "handling request");
        match (method, path) {
            ("GET", "/") => json_response(200, &self.handle_get()),
            ("POST", "/") => match self.handle_post(body) {
                Ok(record) => json_response(201, &record),
                Err(e) => error_response(&e),
            },
            (_, "/") => error_response(&ServerError::MethodNotAllowed(method.to_string())),
            _ => error_response(&ServerError::NotFound(path.to_string())),
        }
    }
}

fn json_response<T: Serialize>(status: u16, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => {
            HttpResponse::new(status, bytes).with_header(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE)
        }
        Err(e) => HttpResponse::new(500, e.to_string().into_bytes()),
    }
}

pub(crate) fn error_response(err: &ServerError) -> HttpResponse {
    if err.is_server_error() {
        error!(error = %err, "request failed");
    } else if err.is_client_error() && !err.is_auth_rejection() {
        debug!(error = %err, "request refused");
    }
    json_response(err.status_code(), &err.body())
}

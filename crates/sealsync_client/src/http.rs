//! HTTP client implementations.

use crate::config::ChannelConfig;
use crate::transport::HttpClient;
use sealsync_protocol::{HttpRequest, HttpResponse, Method};
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Upper bound on a response body.
const MAX_BODY_BYTES: u64 = 1024 * 1024;

/// Blocking HTTP client backed by a `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    /// Creates a client honouring the configured timeouts.
    pub fn new(config: &ChannelConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout)
            .timeout_read(config.timeout)
            .timeout_write(config.timeout)
            .build();
        Self { agent }
    }
}

impl HttpClient for UreqClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        let mut req = self.agent.request(request.method.as_str(), &request.url);
        for (name, value) in &request.headers {
            req = req.set(name, value);
        }

        let result = match &request.body {
            Some(body) => req.send_bytes(body),
            None => req.call(),
        };
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => {
                return Err(format!("transport error: {err}"));
            }
        };

        let status = response.status();
        let headers = response
            .headers_names()
            .into_iter()
            .filter_map(|name| {
                let value = response.header(&name)?.to_string();
                Some((name, value))
            })
            .collect();
        let body = read_body(response.into_reader(), MAX_BODY_BYTES)?;

        debug!(method = request.method.as_str(), url = %request.url, status, "http exchange");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Reads at most `limit` bytes, failing if the body is longer.
fn read_body(reader: impl Read, limit: u64) -> Result<Vec<u8>, String> {
    let mut body = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut body)
        .map_err(|e| format!("failed to read response body: {e}"))?;
    if body.len() as u64 > limit {
        return Err(format!("response body exceeds {limit} bytes"));
    }
    Ok(body)
}

/// Trait for servers that can answer requests in-process.
pub trait LoopbackServer: Send + Sync {
    /// Handles a request and returns the response.
    fn handle(&self, request: &HttpRequest) -> HttpResponse;
}

impl<S: LoopbackServer + ?Sized> LoopbackServer for Arc<S> {
    fn handle(&self, request: &HttpRequest) -> HttpResponse {
        (**self).handle(request)
    }
}

/// A loopback HTTP client that routes requests directly to a server.
///
/// Useful for testing and embedding without a socket.
pub struct LoopbackClient<S: LoopbackServer> {
    server: S,
}

impl<S: LoopbackServer> LoopbackClient<S> {
    /// Creates a loopback client connected to the given server.
    pub fn new(server: S) -> Self {
        Self { server }
    }

    /// Returns the server.
    pub fn server(&self) -> &S {
        &self.server
    }
}

impl<S: LoopbackServer> HttpClient for LoopbackClient<S> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        debug!(method = request.method.as_str(), path = request.path(), "loopback exchange");
        Ok(self.server.handle(&request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct Echo;

    impl LoopbackServer for Echo {
        fn handle(&self, request: &HttpRequest) -> HttpResponse {
            let status = if request.method == Method::Post { 201 } else { 200 };
            HttpResponse::new(status, request.body.clone().unwrap_or_default())
                .with_header("x-path", request.path())
        }
    }

    #[test]
    fn loopback_routes_to_server() {
        let client = LoopbackClient::new(Echo);
        let response = client
            .execute(
                HttpRequest::new(Method::Post, "http://localhost:3000/?q=1")
                    .with_body(b"hello".to_vec()),
            )
            .unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.body, b"hello");
        assert_eq!(response.header("x-path"), Some("/"));
    }

    #[test]
    fn loopback_over_shared_server() {
        let client = LoopbackClient::new(Arc::new(Echo));
        let response = client
            .execute(HttpRequest::new(Method::Get, "http://localhost/"))
            .unwrap();
        assert_eq!(response.status, 200);
    }

    #[test]
    fn body_within_limit() {
        assert_eq!(read_body(&b"12345"[..], 5).unwrap(), b"12345");
        assert!(read_body(&b""[..], 5).unwrap().is_empty());
    }

    #[test]
    fn oversized_body_is_rejected() {
        let err = read_body(&b"123456"[..], 5).unwrap_err();
        assert_eq!(err, "response body exceeds 5 bytes");
    }

    #[test]
    fn ureq_connection_refused_is_transport_error() {
        let config = ChannelConfig::new("http://127.0.0.1:9/")
            .with_connect_timeout(Duration::from_millis(200))
            .with_timeout(Duration::from_millis(200));
        let client = UreqClient::new(&config);

        let result = client.execute(HttpRequest::new(Method::Get, config.server_url.clone()));
        assert!(result.unwrap_err().starts_with("transport error"));
    }
}

//! HTTP transport abstraction.

use parking_lot::Mutex;
use sealsync_protocol::{HttpRequest, HttpResponse};
use std::collections::VecDeque;
use std::sync::Arc;

/// Executes HTTP exchanges for a secure channel.
///
/// Implement this trait to plug in the actual network layer. A non-2xx status
/// is a response, not an error; `Err` is reserved for transport failures.
pub trait HttpClient: Send + Sync {
    /// Sends a request and returns the response.
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String>;
}

impl<C: HttpClient + ?Sized> HttpClient for Arc<C> {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        (**self).execute(request)
    }
}

/// A client that answers from a script, for testing.
///
/// Every request is recorded. Once the script is exhausted, requests fail
/// as transport errors.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    script: Mutex<VecDeque<Result<HttpResponse, String>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedClient {
    /// Creates a client with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.script.lock().push_back(Ok(response));
    }

    /// Queues a transport failure.
    pub fn push_failure(&self, reason: impl Into<String>) {
        self.script.lock().push_back(Err(reason.into()));
    }

    /// Returns the requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl HttpClient for ScriptedClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, String> {
        self.requests.lock().push(request);
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted response".to_string()))
    }
}

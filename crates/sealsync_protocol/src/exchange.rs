//! Transport-neutral HTTP exchange types.
//!
//! The client pipeline and the loopback server speak these types; real
//! transports translate to and from them at the edge.

/// HTTP method used by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Fetch the authoritative record.
    Get,
    /// Replace the authoritative record.
    Post,
}

impl Method {
    /// Returns the method name as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// An outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Absolute URL, or a path for in-process transports.
    pub url: String,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Request body, if any.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Returns the path component of the URL (`/` when empty).
    #[must_use]
    pub fn path(&self) -> &str {
        let rest = match self.url.find("://") {
            Some(i) => &self.url[i + 3..],
            None => return path_only(&self.url),
        };
        match rest.find('/') {
            Some(i) => path_only(&rest[i..]),
            None => "/",
        }
    }
}

fn path_only(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

/// An incoming response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Header name/value pairs.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response without headers.
    #[must_use]
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the first value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_are_case_insensitive() {
        let response = HttpResponse::new(200, Vec::new()).with_header("X-Signature", "abc=");
        assert_eq!(response.header("x-signature"), Some("abc="));
        assert_eq!(response.header("authorization"), None);
    }

    #[test]
    fn success_range() {
        assert!(HttpResponse::new(200, Vec::new()).is_success());
        assert!(HttpResponse::new(201, Vec::new()).is_success());
        assert!(!HttpResponse::new(401, Vec::new()).is_success());
        assert!(!HttpResponse::new(500, Vec::new()).is_success());
    }

    #[test]
    fn path_extraction() {
        assert_eq!(HttpRequest::new(Method::Get, "http://localhost:3000").path(), "/");
        assert_eq!(HttpRequest::new(Method::Get, "http://localhost:3000/").path(), "/");
        assert_eq!(
            HttpRequest::new(Method::Get, "https://host/records?x=1").path(),
            "/records"
        );
        assert_eq!(HttpRequest::new(Method::Post, "/").path(), "/");
        assert_eq!(HttpRequest::new(Method::Post, "").path(), "/");
    }
}

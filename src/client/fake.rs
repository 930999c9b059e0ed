//! In-process transport for unit tests
//!
//! Routes are matched on method and URL path. Unrouted requests get a 404.
//! Every request is recorded so tests can assert on what went out (or that
//! nothing did).

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use super::transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

#[derive(Clone)]
enum Reply {
    Body(u16, String),
    Fail(TransportError),
}

pub(crate) struct FakeTransport {
    routes: Vec<(Method, String, Reply)>,
    calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self {
            routes: Vec::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn respond(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.route(method, path, Reply::Body(status, body.to_string()))
    }

    pub(crate) fn respond_text(self, method: Method, path: &str, status: u16, body: &str) -> Self {
        self.route(method, path, Reply::Body(status, body.to_string()))
    }

    pub(crate) fn fail(self, method: Method, path: &str, error: TransportError) -> Self {
        self.route(method, path, Reply::Fail(error))
    }

    /// Shared log of every request sent through this transport
    pub(crate) fn calls(&self) -> Arc<Mutex<Vec<HttpRequest>>> {
        Arc::clone(&self.calls)
    }

    fn route(mut self, method: Method, path: &str, reply: Reply) -> Self {
        // Later routes override earlier ones for the same endpoint
        self.routes.retain(|(m, p, _)| !(*m == method && p == path));
        self.routes.push((method, path.to_string(), reply));
        self
    }
}

fn path_of(url: &str) -> &str {
    let after_scheme = url.find("://").map(|i| &url[i + 3..]).unwrap_or(url);
    after_scheme.find('/').map(|i| &after_scheme[i..]).unwrap_or("/")
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let path = path_of(&request.url).to_string();
        let method = request.method;
        self.calls.lock().unwrap().push(request);

        let reply = self
            .routes
            .iter()
            .find(|(m, p, _)| *m == method && *p == path)
            .map(|(_, _, reply)| reply.clone())
            .unwrap_or_else(|| Reply::Body(404, json!({"detail": "Not Found"}).to_string()));

        match reply {
            Reply::Body(status, body) => Ok(HttpResponse { status, body }),
            Reply::Fail(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_of_strips_scheme_and_host() {
        assert_eq!(path_of("http://h:1/api/cycle/prediction"), "/api/cycle/prediction");
        assert_eq!(path_of("http://h"), "/");
    }

    #[tokio::test]
    async fn test_unrouted_request_is_404_and_recorded() {
        let fake = FakeTransport::new().respond(Method::Get, "/api/health", 200, json!({}));
        let calls = fake.calls();
        let request = HttpRequest {
            method: Method::Get,
            url: "http://h/api/missing".to_string(),
            headers: Vec::new(),
            body: None,
        };

        let response = fake.send(request).await.unwrap();
        assert_eq!(response.status, 404);
        assert_eq!(calls.lock().unwrap().len(), 1);
    }
}

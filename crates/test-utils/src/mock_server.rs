//! Local HTTP server with scripted responses.
//!
//! Binds to an ephemeral port on 127.0.0.1 and answers every path with
//! the next scripted [`MockResponse`]; the last response repeats once the
//! script is exhausted. Every request URI is recorded.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderName, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One scripted response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: u16,
    pub body: String,
    pub content_type: &'static str,
    pub headers: Vec<(String, String)>,
    /// Wait this long before answering.
    pub delay: Duration,
}

impl MockResponse {
    /// `200 OK` with a JSON body.
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            content_type: "application/json",
            headers: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    /// An empty response with the given status.
    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: String::new(),
            content_type: "text/plain",
            headers: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    /// `302 Found` pointing elsewhere.
    pub fn redirect(location: impl Into<String>) -> Self {
        Self::status(302).with_header("location", location)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl IntoResponse for MockResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, [(header::CONTENT_TYPE, self.content_type)], self.body).into_response();

        for (name, value) in self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

#[derive(Debug)]
struct MockState {
    script: Mutex<Vec<MockResponse>>,
    requests: Mutex<Vec<Uri>>,
}

impl MockState {
    fn next_response(&self) -> MockResponse {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.remove(0)
        } else {
            script
                .first()
                .cloned()
                .unwrap_or_else(|| MockResponse::status(404))
        }
    }
}

/// A running mock server. Shut down on drop.
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl MockServer {
    /// Serve `response` for every request.
    pub async fn start(response: MockResponse) -> std::io::Result<Self> {
        Self::start_sequence(vec![response]).await
    }

    /// Serve `responses` in order, repeating the last one.
    pub async fn start_sequence(responses: Vec<MockResponse>) -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            script: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(respond).with_state(state.clone());

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state, handle })
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// URIs of all requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Uri> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn respond(State(state): State<Arc<MockState>>, uri: Uri) -> MockResponse {
    state.requests.lock().unwrap().push(uri);

    let response = state.next_response();
    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_sequence() {
        let server = MockServer::start_sequence(vec![
            MockResponse::json("{\"n\":1}"),
            MockResponse::status(503),
        ])
        .await
        .unwrap();

        let client = reqwest::Client::new();
        let first = client.get(server.url("/wms?a=1")).send().await.unwrap();
        assert_eq!(first.status(), 200);
        assert_eq!(first.text().await.unwrap(), "{\"n\":1}");

        for _ in 0..2 {
            let next = client.get(server.url("/wms")).send().await.unwrap();
            assert_eq!(next.status(), 503);
        }

        let requests = server.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].query(), Some("a=1"));
    }

    #[tokio::test]
    async fn test_redirect_header() {
        let server = MockServer::start(MockResponse::redirect("http://example.invalid/"))
            .await
            .unwrap();

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();
        let response = client.get(server.url("/")).send().await.unwrap();
        assert_eq!(response.status(), 302);
        assert_eq!(
            response.headers().get("location").unwrap(),
            "http://example.invalid/"
        );
    }
}

//! In-process fake onebox API for integration testing
//!
//! # How the exchange works
//!
//! Each request arrives on its own TCP connection (the server answers
//! with `Connection: close`, so the client never reuses one):
//!
//! ```text
//!   Client:  GET /api/v1/onebox/list HTTP/1.1
//!            authorization: Bearer abc123
//!            content-type: application/json
//!
//!   Server:  HTTP/1.1 200 OK
//!            Content-Type: application/json
//!            Content-Length: 123
//!            Connection: close
//!
//!            {"status":200,"threads":[...]}
//! ```
//!
//! Request bodies (only the reply endpoint sends one) are read using
//! the `Content-Length` header. Every request is recorded so tests
//! can assert on the method, path, `Authorization` header, and body.

use super::handlers::{handle_delete, handle_get, handle_list, handle_reply, not_found};
use super::io::write_json;
use super::state::{ApiState, RecordedRequest};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use url::Url;

const API_PREFIX: &str = "/api/v1/";

/// A fake onebox API on localhost with an OS-assigned port.
pub struct FakeApiServer {
    port: u16,
    state: Arc<Mutex<ApiState>>,
    /// Accept loop; aborted when the server is dropped.
    handle: tokio::task::JoinHandle<()>,
}

impl FakeApiServer {
    /// Start a new fake API with the given state.
    ///
    /// Binds to `127.0.0.1:0` and spawns a task that accepts
    /// connections until the server is dropped.
    pub async fn start(state: ApiState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(state));

        let shared = state.clone();
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _addr)) = listener.accept().await else {
                    break;
                };
                let state = shared.clone();
                tokio::spawn(async move {
                    handle_connection(stream, &state).await;
                });
            }
        });

        Self {
            port,
            state,
            handle,
        }
    }

    /// The port the server is listening on.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// API base to hand to the client, e.g. `http://127.0.0.1:PORT/api/v1`.
    pub fn base_url(&self) -> Url {
        Url::parse(&format!("http://127.0.0.1:{}/api/v1", self.port)).unwrap()
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Ids of the threads the server still holds.
    pub fn thread_ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .threads
            .iter()
            .filter_map(|t| t["id"].as_str().map(str::to_string))
            .collect()
    }
}

impl Drop for FakeApiServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An API base on a port nothing listens on, so every request fails
/// with a connection error.
pub async fn unreachable_base_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind to ephemeral port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    Url::parse(&format!("http://127.0.0.1:{port}/api/v1")).unwrap()
}

/// Read one request, answer it, and close the connection.
async fn handle_connection(stream: TcpStream, state: &Mutex<ApiState>) {
    let mut reader = BufReader::new(stream);
    let Some(request) = read_request(&mut reader).await else {
        return;
    };

    let (status, body) = {
        let mut state = state.lock().unwrap();
        state.requests.push(request.clone());
        route(&mut state, &request)
    };

    let _ = write_json(reader.get_mut(), status, &body).await;
}

/// Parse the request line, headers, and `Content-Length` body.
async fn read_request(reader: &mut BufReader<TcpStream>) -> Option<RecordedRequest> {
    let mut line = String::new();
    reader.read_line(&mut line).await.ok()?;
    let mut parts = line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header).await {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    let length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    let mut body = vec![0; length];
    reader.read_exact(&mut body).await.ok()?;

    Some(RecordedRequest {
        method,
        path,
        authorization: headers.remove("authorization"),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Dispatch a request to its handler.
fn route(state: &mut ApiState, request: &RecordedRequest) -> (u16, Value) {
    if let Some(status) = state.fail_with {
        return (status, json!({"status": status, "error": "Injected failure"}));
    }

    let Some(rest) = request.path.strip_prefix(API_PREFIX) else {
        return not_found("Route");
    };
    let segments: Vec<&str> = rest.split('/').collect();

    match (request.method.as_str(), segments.as_slice()) {
        ("GET", ["onebox", "list"]) => handle_list(state),
        ("GET", ["onebox", id]) => handle_get(state, id),
        ("DELETE", ["onebox", id]) => handle_delete(state, id),
        ("POST", ["onebox", "reply", id]) => handle_reply(state, id, &request.body),
        _ => not_found("Route"),
    }
}

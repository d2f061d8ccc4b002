//! Test data model for the fake API
//!
//! Provides a builder-style API for constructing server state:
//!
//! ```ignore
//! let state = ApiStateBuilder::new()
//!     .thread(thread_json("1", "Hello", "2024-01-01T10:00:00Z"))
//!     .thread(thread_json("2", "World", "2024-01-02T10:00:00Z"))
//!     .build();
//! ```
//!
//! Threads are kept as raw JSON so tests can serve shapes the client
//! has to normalize (for example a thread without `messages`).

use serde_json::Value;

/// Everything the fake server knows.
#[derive(Debug, Clone, Default)]
pub struct ApiState {
    pub threads: Vec<Value>,
    /// When set, every request is answered with this status.
    pub fail_with: Option<u16>,
    pub requests: Vec<RecordedRequest>,
}

impl ApiState {
    pub fn thread_index(&self, id: &str) -> Option<usize> {
        self.threads.iter().position(|t| t["id"] == id)
    }
}

/// One request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

/// Builder for constructing an `ApiState` step by step.
pub struct ApiStateBuilder {
    state: ApiState,
}

impl ApiStateBuilder {
    pub fn new() -> Self {
        Self {
            state: ApiState::default(),
        }
    }

    /// Serve `thread` from the list and thread endpoints.
    pub fn thread(mut self, thread: Value) -> Self {
        self.state.threads.push(thread);
        self
    }

    /// Answer every request with `status` and an error body.
    pub const fn fail_with(mut self, status: u16) -> Self {
        self.state.fail_with = Some(status);
        self
    }

    /// Consume the builder and return the finished `ApiState`.
    pub fn build(self) -> ApiState {
        self.state
    }
}

/// A minimal thread in the API's JSON shape, without `messages`.
pub fn thread_json(id: &str, subject: &str, date: &str) -> Value {
    serde_json::json!({
        "id": id,
        "subject": subject,
        "from": {"name": format!("Sender {id}"), "email": format!("sender{id}@example.com")},
        "to": "me@example.com",
        "body": format!("Body of {id}"),
        "date": date,
        "status": "unread",
        "labels": ["Interested"],
    })
}

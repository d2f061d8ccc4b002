//! `POST /onebox/reply/{id}`

use super::{Reply, not_found};
use crate::fake_api::state::ApiState;
use serde_json::{Value, json};

/// Accept a reply for a known thread. The body must be a JSON object
/// with at least `from`, `to` and `body`.
pub fn handle_reply(state: &ApiState, id: &str, body: &str) -> Reply {
    if state.thread_index(id).is_none() {
        return not_found("Thread");
    }
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        return (400, json!({"status": 400, "error": "Invalid JSON"}));
    };
    let complete = ["from", "to", "body"]
        .iter()
        .all(|key| payload.get(key).is_some_and(Value::is_string));
    if !complete {
        return (400, json!({"status": 400, "error": "Missing fields"}));
    }
    (200, json!({"status": 200, "message": "Reply sent"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_api::state::{ApiStateBuilder, thread_json};

    fn state() -> ApiState {
        ApiStateBuilder::new()
            .thread(thread_json("7", "Hello", "2024-01-01T00:00:00Z"))
            .build()
    }

    #[test]
    fn accepts_complete_reply() {
        let body = r#"{"fromName":"You","from":"a@x","to":"b@x","subject":"s","body":"hi"}"#;
        assert_eq!(handle_reply(&state(), "7", body).0, 200);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(handle_reply(&state(), "7", "nope").0, 400);
        assert_eq!(handle_reply(&state(), "7", r#"{"from":"a@x"}"#).0, 400);
        assert_eq!(handle_reply(&state(), "9", "{}").0, 404);
    }
}

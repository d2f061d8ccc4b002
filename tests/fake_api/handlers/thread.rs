//! `GET /onebox/{id}` and `DELETE /onebox/{id}`

use super::{Reply, not_found};
use crate::fake_api::state::ApiState;
use serde_json::json;

/// Return one thread under the `thread` key.
pub fn handle_get(state: &ApiState, id: &str) -> Reply {
    state.thread_index(id).map_or_else(
        || not_found("Thread"),
        |i| (200, json!({"status": 200, "thread": state.threads[i]})),
    )
}

/// Remove a thread from the server's state.
pub fn handle_delete(state: &mut ApiState, id: &str) -> Reply {
    let Some(i) = state.thread_index(id) else {
        return not_found("Thread");
    };
    state.threads.remove(i);
    (200, json!({"status": 200, "message": "Thread deleted"}))
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
    fn get_known_and_unknown() {
        let state = state();
        let (status, body) = handle_get(&state, "7");
        assert_eq!(status, 200);
        assert_eq!(body["thread"]["subject"], "Hello");

        assert_eq!(handle_get(&state, "8").0, 404);
    }

    #[test]
    fn delete_removes_once() {
        let mut state = state();
        assert_eq!(handle_delete(&mut state, "7").0, 200);
        assert!(state.threads.is_empty());
        assert_eq!(handle_delete(&mut state, "7").0, 404);
    }
}

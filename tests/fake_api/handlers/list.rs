//! `GET /onebox/list`

use super::Reply;
use crate::fake_api::state::ApiState;
use serde_json::json;

/// Return every thread under the `threads` key.
pub fn handle_list(state: &ApiState) -> Reply {
    (200, json!({"status": 200, "threads": state.threads}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_api::state::{ApiStateBuilder, thread_json};

    #[test]
    fn lists_all_threads() {
        let state = ApiStateBuilder::new()
            .thread(thread_json("1", "a", "2024-01-01T00:00:00Z"))
            .thread(thread_json("2", "b", "2024-01-02T00:00:00Z"))
            .build();

        let (status, body) = handle_list(&state);
        assert_eq!(status, 200);
        assert_eq!(body["threads"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn empty_state_lists_nothing() {
        let (_, body) = handle_list(&ApiStateBuilder::new().build());
        assert!(body["threads"].as_array().unwrap().is_empty());
    }
}

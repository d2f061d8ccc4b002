//! Endpoint handlers for the fake API.
//!
//! Each handler takes the shared state and the path parameters and
//! returns a status code plus JSON body. The server writes it out.

mod list;
mod reply;
mod thread;

pub use list::handle_list;
pub use reply::handle_reply;
pub use thread::{handle_delete, handle_get};

use serde_json::{Value, json};

pub type Reply = (u16, Value);

pub fn not_found(what: &str) -> Reply {
    (404, json!({"status": 404, "error": format!("{what} not found")}))
}

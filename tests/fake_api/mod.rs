//! Fake onebox HTTP API for integration testing
//!
//! This module provides an in-process HTTP server that speaks enough
//! HTTP/1.1 to exercise `RemoteClient` and the CLI end-to-end:
//!
//! TCP -> request line -> headers -> body -> route -> response -> close
//!
//! ## Module layout
//!
//! - `server` -- TCP listener, request parsing, and dispatch
//! - `handlers/` -- one file per endpoint family (list, thread, reply)
//! - `state` -- test data model (threads, failure mode, request log)
//! - `io` -- response writer

mod handlers;
mod io;
pub mod server;
pub mod state;

pub use server::{FakeApiServer, unreachable_base_url};
pub use state::ApiStateBuilder;

//! Onebox email client library
//!
//! Talks to the onebox REST API (thread list, thread, delete, reply)
//! with a bearer credential from the Google login hand-off. Keeps a
//! local mirror of the thread list so deletes and replies survive
//! restarts, and serves built-in sample threads when the API cannot
//! be reached. Replies can start from a template and fill
//! `{{FIRST_NAME}}`-style variables from the thread's lead.
//!
//! State goes through a [`KeyValueStore`]; pick [`FileStore`] for a
//! persistent profile or [`MemoryStore`] for tests.

mod auth;
mod compose;
mod config;
mod error;
mod flow;
mod inbox;
mod mirror;
mod mock;
mod model;
mod remote;
mod storage;
mod token;
mod view;

pub use auth::{
    AuthError, CallbackOutcome, TIMEOUT_MESSAGE, complete_login, login_url, parse_callback,
};
pub use compose::{
    ComposeContext, ReplyTemplate, TemplateCategory, Variable, categories, complete, expand,
    find_template, insert_variable, suggest_completion, templates, templates_in, unresolved,
};
pub use config::{DEFAULT_API_BASE, ListFallback, OneboxConfig};
pub use error::{Error, Result};
pub use flow::{ThreadFlow, ThreadMode};
pub use inbox::{Inbox, ListSource, REPLY_SENDER_NAME, ReplyDraft, SyncOutcome};
pub use mirror::LocalMirror;
pub use mock::{find_mock_thread, mock_threads};
pub use model::{Campaign, EmailMessage, Lead, Sender, Thread, ThreadStatus};
pub use remote::{Fetched, Origin, RemoteClient, ReplyPayload};
pub use storage::{
    FileStore, KeyValueStore, MemoryStore, THREADS_KEY, TOKEN_KEY, UnavailableStore,
};
pub use token::{PLACEHOLDER_TOKEN, TokenStore};
pub use view::{SortOrder, arrange, filter, matches, sort};

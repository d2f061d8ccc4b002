//! Inbox state built from the API and the local mirror
//!
//! [`Inbox`] holds the thread list the user is looking at. Reads try
//! the API first; deletes and replies are attempted remotely and then
//! written through the mirror before the call returns.

use crate::config::ListFallback;
use crate::error::{Error, Result};
use crate::mirror::LocalMirror;
use crate::model::{EmailMessage, Sender, Thread};
use crate::remote::{Origin, RemoteClient, ReplyPayload};
use crate::view::{SortOrder, arrange};
use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{info, warn};

/// Display name given to replies written from this client.
pub const REPLY_SENDER_NAME: &str = "You";

/// Which source the current thread list was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    Remote,
    Mirror,
    MockDataset,
}

impl fmt::Display for ListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Remote => "remote",
            Self::Mirror => "local mirror",
            Self::MockDataset => "sample threads",
        })
    }
}

/// Result of a delete or reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The API accepted the change and the mirror was updated.
    ConfirmedRemote,
    /// The API call failed; the change exists only in the mirror.
    AppliedLocalOnly { reason: String },
    /// The mirror could not be written; nothing changed locally.
    Failed { reason: String },
}

impl SyncOutcome {
    /// Whether the change is visible in local state.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

/// A reply being composed for a thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyDraft {
    pub from_name: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub references: Option<BTreeMap<String, String>>,
}

impl ReplyDraft {
    /// Address a reply back to the sender of `thread`.
    #[must_use]
    pub fn for_thread(thread: &Thread, body: impl Into<String>) -> Self {
        Self {
            from_name: REPLY_SENDER_NAME.to_string(),
            from: thread.to.clone(),
            to: thread.from.email.clone(),
            subject: thread.subject.clone(),
            body: body.into(),
            references: None,
        }
    }

    fn payload(&self) -> ReplyPayload {
        ReplyPayload {
            from_name: self.from_name.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            references: self.references.clone(),
        }
    }

    fn into_message(self, id: String) -> EmailMessage {
        EmailMessage {
            id,
            from: Sender::new(self.from_name, self.from),
            to: self.to,
            cc: None,
            bcc: None,
            subject: self.subject,
            body: self.body,
            date: Utc::now(),
        }
    }
}

/// The thread list shown to the user.
pub struct Inbox {
    remote: RemoteClient,
    mirror: LocalMirror,
    fallback: ListFallback,
    threads: Vec<Thread>,
}

impl Inbox {
    #[must_use]
    pub const fn new(remote: RemoteClient, mirror: LocalMirror, fallback: ListFallback) -> Self {
        Self {
            remote,
            mirror,
            fallback,
            threads: Vec::new(),
        }
    }

    #[must_use]
    pub const fn remote(&self) -> &RemoteClient {
        &self.remote
    }

    #[must_use]
    pub const fn mirror(&self) -> &LocalMirror {
        &self.mirror
    }

    /// (Re)load the thread list.
    ///
    /// Seeds the mirror on first use. An empty API answer is replaced
    /// by the mirror; a failed API call by the source [`ListFallback`]
    /// names.
    ///
    /// # Errors
    ///
    /// Returns an error if the mirror cannot be read or seeded.
    pub async fn load(&mut self) -> Result<ListSource> {
        self.mirror.initialize_if_empty()?;

        let fetched = self.remote.list().await;
        let (threads, source) = match fetched.origin {
            Origin::Remote if !fetched.value.is_empty() => (fetched.value, ListSource::Remote),
            Origin::Remote => (self.mirror.read()?, ListSource::Mirror),
            Origin::Fallback => match self.fallback {
                ListFallback::MockDataset => (fetched.value, ListSource::MockDataset),
                ListFallback::LocalMirror => (self.mirror.read()?, ListSource::Mirror),
            },
        };

        info!("Loaded {} thread(s) from {}", threads.len(), source);
        self.threads = threads;
        Ok(source)
    }

    #[must_use]
    pub fn threads(&self) -> &[Thread] {
        &self.threads
    }

    /// The loaded threads filtered by `query` and ordered by `order`.
    #[must_use]
    pub fn view(&self, query: &str, order: SortOrder) -> Vec<Thread> {
        arrange(&self.threads, query, order)
    }

    #[must_use]
    pub fn thread(&self, id: &str) -> Option<&Thread> {
        self.threads.iter().find(|t| t.id == id)
    }

    /// Fetch one thread, preferring the loaded list.
    pub async fn open(&self, id: &str) -> Option<Thread> {
        if let Some(thread) = self.thread(id) {
            return Some(thread.clone());
        }
        self.remote.get(id).await.value
    }

    /// Delete a loaded thread remotely and from the mirror.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ThreadNotFound`] if `id` is not loaded.
    pub async fn delete(&mut self, id: &str) -> Result<SyncOutcome> {
        if self.thread(id).is_none() {
            return Err(Error::ThreadNotFound(id.to_string()));
        }

        let remote = self.remote.delete(id).await;

        let remaining: Vec<Thread> = self
            .threads
            .iter()
            .filter(|t| t.id != id)
            .cloned()
            .collect();
        if let Err(e) = self.mirror.write(&remaining) {
            warn!("Failed to persist delete of {}: {}", id, e);
            return Ok(SyncOutcome::Failed {
                reason: e.to_string(),
            });
        }
        self.threads = remaining;

        Ok(settle("delete", id, remote))
    }

    /// Send a reply and append it to the thread.
    ///
    /// The new message is persisted in the mirror before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ThreadNotFound`] if `id` is not loaded.
    pub async fn send_reply(
        &mut self,
        id: &str,
        draft: ReplyDraft,
    ) -> Result<(EmailMessage, SyncOutcome)> {
        let Some(position) = self.threads.iter().position(|t| t.id == id) else {
            return Err(Error::ThreadNotFound(id.to_string()));
        };

        let remote = self.remote.reply(id, &draft.payload()).await;

        let mut updated = self.threads.clone();
        let thread = &mut updated[position];
        let message = draft.into_message(thread.next_message_id());
        thread.messages.push(message.clone());

        if let Err(e) = self.mirror.write(&updated) {
            warn!("Failed to persist reply to {}: {}", id, e);
            return Ok((
                message,
                SyncOutcome::Failed {
                    reason: e.to_string(),
                },
            ));
        }
        self.threads = updated;

        Ok((message, settle("reply", id, remote)))
    }
}

fn settle(action: &str, id: &str, remote: Result<()>) -> SyncOutcome {
    match remote {
        Ok(()) => SyncOutcome::ConfirmedRemote,
        Err(e) => {
            warn!("Remote {} of {} failed, applied locally only: {}", action, id, e);
            SyncOutcome::AppliedLocalOnly {
                reason: e.to_string(),
            }
        }
    }
}

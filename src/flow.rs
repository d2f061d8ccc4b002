//! Reply and delete interaction for a single thread

use crate::error::{Error, Result};
use crate::inbox::{Inbox, ReplyDraft, SyncOutcome};
use crate::model::EmailMessage;
use std::fmt;

/// What the user is doing with the open thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadMode {
    Viewing,
    ComposingReply,
    ConfirmDelete,
    Deleted,
}

impl ThreadMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewing => "viewing",
            Self::ComposingReply => "composing a reply",
            Self::ConfirmDelete => "confirming delete",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for ThreadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drives one thread through `viewing`, `composing-reply`,
/// `confirm-delete` and `deleted`.
#[derive(Debug, Clone)]
pub struct ThreadFlow {
    thread_id: String,
    mode: ThreadMode,
}

impl ThreadFlow {
    #[must_use]
    pub fn new(thread_id: impl Into<String>) -> Self {
        Self {
            thread_id: thread_id.into(),
            mode: ThreadMode::Viewing,
        }
    }

    #[must_use]
    pub fn thread_id(&self) -> &str {
        &self.thread_id
    }

    #[must_use]
    pub const fn mode(&self) -> ThreadMode {
        self.mode
    }

    /// # Errors
    ///
    /// Fails unless viewing.
    pub fn begin_reply(&mut self) -> Result<()> {
        self.step("start a reply", ThreadMode::Viewing, ThreadMode::ComposingReply)
    }

    /// # Errors
    ///
    /// Fails unless composing.
    pub fn cancel_reply(&mut self) -> Result<()> {
        self.step("cancel a reply", ThreadMode::ComposingReply, ThreadMode::Viewing)
    }

    /// Send the composed reply through `inbox`.
    ///
    /// Returns to viewing once the reply is stored locally; stays in
    /// the composer if it could not be.
    ///
    /// # Errors
    ///
    /// Fails unless composing, or if the thread is not loaded.
    pub async fn send_reply(
        &mut self,
        inbox: &mut Inbox,
        draft: ReplyDraft,
    ) -> Result<(EmailMessage, SyncOutcome)> {
        self.require("send a reply", ThreadMode::ComposingReply)?;
        let (message, outcome) = inbox.send_reply(&self.thread_id, draft).await?;
        if outcome.is_applied() {
            self.mode = ThreadMode::Viewing;
        }
        Ok((message, outcome))
    }

    /// # Errors
    ///
    /// Fails unless viewing.
    pub fn request_delete(&mut self) -> Result<()> {
        self.step("delete", ThreadMode::Viewing, ThreadMode::ConfirmDelete)
    }

    /// # Errors
    ///
    /// Fails unless a delete is awaiting confirmation.
    pub fn cancel_delete(&mut self) -> Result<()> {
        self.step("cancel a delete", ThreadMode::ConfirmDelete, ThreadMode::Viewing)
    }

    /// Delete the thread through `inbox`.
    ///
    /// # Errors
    ///
    /// Fails unless a delete is awaiting confirmation, or if the
    /// thread is not loaded.
    pub async fn confirm_delete(&mut self, inbox: &mut Inbox) -> Result<SyncOutcome> {
        self.require("confirm a delete", ThreadMode::ConfirmDelete)?;
        let outcome = inbox.delete(&self.thread_id).await?;
        self.mode = if outcome.is_applied() {
            ThreadMode::Deleted
        } else {
            ThreadMode::Viewing
        };
        Ok(outcome)
    }

    fn require(&self, action: &'static str, required: ThreadMode) -> Result<()> {
        if self.mode == required {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                action,
                state: self.mode.as_str(),
            })
        }
    }

    fn step(&mut self, action: &'static str, from: ThreadMode, to: ThreadMode) -> Result<()> {
        self.require(action, from)?;
        self.mode = to;
        Ok(())
    }
}

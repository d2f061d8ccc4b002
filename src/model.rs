//! Thread and message types
//!
//! These mirror the JSON exchanged with the onebox API and stored in
//! the local mirror. A thread on the wire may omit `messages`; it is
//! normalized on the way in so a [`Thread`] always carries at least
//! one message.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display name and address of a message author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub name: String,
    pub email: String,
}

impl Sender {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            f.write_str(&self.email)
        } else {
            write!(f, "{} <{}>", self.name, self.email)
        }
    }
}

/// A single message inside a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    pub from: Sender,
    #[serde(default)]
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bcc: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub body: String,
    pub date: DateTime<Utc>,
}

/// Whether a thread has been read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadStatus {
    Read,
    #[default]
    Unread,
}

impl ThreadStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Unread => "unread",
        }
    }
}

impl fmt::Display for ThreadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A conversation shown as one inbox row.
///
/// `body` and `date` mirror the first message. `messages` is in
/// conversation order and is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ThreadRecord")]
pub struct Thread {
    pub id: String,
    pub subject: String,
    pub from: Sender,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    pub body: String,
    pub date: DateTime<Utc>,
    pub status: ThreadStatus,
    pub labels: Vec<String>,
    pub messages: Vec<EmailMessage>,
}

impl Thread {
    /// The message a thread without explicit messages stands for.
    fn own_message(&self) -> EmailMessage {
        EmailMessage {
            id: self.id.clone(),
            from: self.from.clone(),
            to: self.to.clone(),
            cc: self.cc.clone(),
            bcc: None,
            subject: self.subject.clone(),
            body: self.body.clone(),
            date: self.date,
        }
    }

    /// The timestamp of the newest message.
    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.messages
            .iter()
            .map(|m| m.date)
            .max()
            .unwrap_or(self.date)
    }

    /// An identifier for the next message that no existing message uses.
    ///
    /// Follows the `<thread id>-<position>` convention, skipping ahead
    /// if that position is already taken.
    #[must_use]
    pub fn next_message_id(&self) -> String {
        let mut index = self.messages.len() + 1;
        loop {
            let candidate = format!("{}-{index}", self.id);
            if self.messages.iter().all(|m| m.id != candidate) {
                return candidate;
            }
            index += 1;
        }
    }
}

/// Thread as it appears on the wire, where `messages` is optional.
#[derive(Deserialize)]
struct ThreadRecord {
    id: String,
    #[serde(default)]
    subject: String,
    from: Sender,
    #[serde(default)]
    to: String,
    #[serde(default)]
    cc: Option<String>,
    #[serde(default)]
    body: String,
    date: DateTime<Utc>,
    #[serde(default)]
    status: ThreadStatus,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    messages: Option<Vec<EmailMessage>>,
}

impl From<ThreadRecord> for Thread {
    fn from(record: ThreadRecord) -> Self {
        let mut thread = Self {
            id: record.id,
            subject: record.subject,
            from: record.from,
            to: record.to,
            cc: record.cc,
            body: record.body,
            date: record.date,
            status: record.status,
            labels: record.labels,
            messages: record.messages.unwrap_or_default(),
        };
        if thread.messages.is_empty() {
            thread.messages.push(thread.own_message());
        }
        thread
    }
}

/// Outreach campaign progress shown alongside a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub name: String,
    pub steps: u32,
    pub days_in_sequence: u32,
    pub current_step: u32,
}

/// Display-only profile of the person behind a thread.
///
/// Derived on demand, never stored with the thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub company: String,
    pub campaign: Campaign,
}

impl Lead {
    /// Build the lead panel for `thread` from its sender.
    ///
    /// Contact and campaign fields are fixed sample values; the API
    /// exposes no lead data.
    #[must_use]
    pub fn for_thread(thread: &Thread) -> Self {
        Self {
            name: thread.from.name.clone(),
            email: thread.from.email.clone(),
            phone: "9999999999".to_string(),
            linkedin: "www.linkedin.com/johndoe".to_string(),
            company: "ReachInbox".to_string(),
            campaign: Campaign {
                name: "Campaign name".to_string(),
                steps: 3,
                days_in_sequence: 5,
                current_step: 2,
            },
        }
    }
}

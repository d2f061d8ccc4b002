//! Search and ordering for the inbox list
//!
//! Pure functions over a slice of threads. Nothing here mutates its
//! input, so the same inputs always produce the same list.

use crate::error::{Error, Result};
use crate::model::Thread;
use std::fmt;
use std::str::FromStr;

/// Inbox ordering by thread date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("newest") {
            Ok(Self::Newest)
        } else if s.eq_ignore_ascii_case("oldest") {
            Ok(Self::Oldest)
        } else {
            Err(Error::Config(format!(
                "Invalid sort order '{s}' (expected newest or oldest)"
            )))
        }
    }
}

/// Case-insensitive substring match on subject, sender address, or
/// sender name. An empty query matches every thread.
#[must_use]
pub fn matches(thread: &Thread, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    [
        thread.subject.as_str(),
        thread.from.email.as_str(),
        thread.from.name.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Threads matching `query`, in input order.
#[must_use]
pub fn filter(threads: &[Thread], query: &str) -> Vec<Thread> {
    threads
        .iter()
        .filter(|t| matches(t, query))
        .cloned()
        .collect()
}

/// Threads ordered by date. Equal dates keep their input order.
#[must_use]
pub fn sort(threads: &[Thread], order: SortOrder) -> Vec<Thread> {
    let mut sorted = threads.to_vec();
    match order {
        SortOrder::Newest => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
        SortOrder::Oldest => sorted.sort_by(|a, b| a.date.cmp(&b.date)),
    }
    sorted
}

/// Filter by `query`, then order by `order`.
#[must_use]
pub fn arrange(threads: &[Thread], query: &str, order: SortOrder) -> Vec<Thread> {
    sort(&filter(threads, query), order)
}

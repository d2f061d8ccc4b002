//! Local copy of the thread list
//!
//! The mirror is the only place where deletes and replies become
//! durable on this machine. It never talks to the network.

use crate::error::Result;
use crate::mock::mock_threads;
use crate::model::Thread;
use crate::storage::{KeyValueStore, THREADS_KEY};
use std::sync::Arc;
use tracing::{debug, info};

/// Persisted thread collection, seeded from the sample threads.
#[derive(Clone)]
pub struct LocalMirror {
    store: Arc<dyn KeyValueStore>,
}

impl LocalMirror {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The persisted threads, or the sample threads if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or holds invalid JSON.
    pub fn read(&self) -> Result<Vec<Thread>> {
        match self.store.get(THREADS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(mock_threads()),
        }
    }

    /// Replace the persisted collection with `threads`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the store write fails.
    pub fn write(&self, threads: &[Thread]) -> Result<()> {
        let raw = serde_json::to_string(threads)?;
        self.store.set(THREADS_KEY, &raw)?;
        debug!("Mirrored {} thread(s)", threads.len());
        Ok(())
    }

    /// Seed the store with the sample threads unless a value exists.
    ///
    /// Any stored value counts, including an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn initialize_if_empty(&self) -> Result<bool> {
        if self.store.get(THREADS_KEY)?.is_some() {
            return Ok(false);
        }
        self.write(&mock_threads())?;
        info!("Seeded local mirror with sample threads");
        Ok(true)
    }

    /// Drop the thread with `id`. Returns whether one was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let mut threads = self.read()?;
        let before = threads.len();
        threads.retain(|t| t.id != id);
        let removed = threads.len() != before;
        if removed {
            self.write(&threads)?;
        }
        Ok(removed)
    }

    /// Replace the stored thread with the same id, or append it.
    ///
    /// # Errors
    ///
    /// Returns an error if the read or write fails.
    pub fn upsert(&self, thread: &Thread) -> Result<()> {
        let mut threads = self.read()?;
        match threads.iter_mut().find(|t| t.id == thread.id) {
            Some(existing) => existing.clone_from(thread),
            None => threads.push(thread.clone()),
        }
        self.write(&threads)
    }
}

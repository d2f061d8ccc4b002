//! Onebox REST API client
//!
//! Every call is a fresh request. Reads fall back to the sample
//! threads when the API is unreachable or answers with an error;
//! writes report the failure so callers can tell a confirmed change
//! from one that only happened locally.

use crate::error::{Error, Result};
use crate::mock::{find_mock_thread, mock_threads};
use crate::model::Thread;
use crate::token::TokenStore;
use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use url::Url;

/// Where a read result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    /// The API call failed and the sample threads were used instead.
    Fallback,
}

/// A read result tagged with its [`Origin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    pub value: T,
    pub origin: Origin,
}

impl<T> Fetched<T> {
    const fn remote(value: T) -> Self {
        Self {
            value,
            origin: Origin::Remote,
        }
    }

    const fn fallback(value: T) -> Self {
        Self {
            value,
            origin: Origin::Fallback,
        }
    }
}

/// Body of `POST /onebox/reply/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyPayload {
    pub from_name: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    /// Threading headers such as `In-Reply-To`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<BTreeMap<String, String>>,
}

#[derive(Deserialize)]
struct ListResponse {
    #[serde(default)]
    threads: Vec<Thread>,
}

#[derive(Deserialize)]
struct ThreadResponse {
    #[serde(default)]
    thread: Option<Thread>,
}

/// HTTP client for the onebox endpoints.
#[derive(Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    api_base: Url,
    tokens: TokenStore,
}

impl RemoteClient {
    #[must_use]
    pub fn new(api_base: Url, tokens: TokenStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base,
            tokens,
        }
    }

    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Fetch the thread list.
    ///
    /// On any failure the sample threads are returned verbatim.
    pub async fn list(&self) -> Fetched<Vec<Thread>> {
        match self.try_list().await {
            Ok(threads) => {
                info!("Fetched {} thread(s)", threads.len());
                Fetched::remote(threads)
            }
            Err(e) => {
                warn!("Listing threads failed, using sample threads: {}", e);
                Fetched::fallback(mock_threads())
            }
        }
    }

    /// Fetch one thread by id.
    ///
    /// On failure the sample threads are searched instead; `None`
    /// means neither source knows the id.
    pub async fn get(&self, id: &str) -> Fetched<Option<Thread>> {
        match self.try_get(id).await {
            Ok(thread) => Fetched::remote(thread),
            Err(e) => {
                warn!("Fetching thread {} failed, using sample threads: {}", id, e);
                Fetched::fallback(find_mock_thread(id))
            }
        }
    }

    /// Delete a thread on the server.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&format!("onebox/{id}"));
        debug!("DELETE {}", url);
        let response = self.authorized(self.http.delete(url)).send().await?;
        check_status("Deleting thread", response)?;
        info!("Deleted thread {}", id);
        Ok(())
    }

    /// Post a reply under a thread.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn reply(&self, id: &str, payload: &ReplyPayload) -> Result<()> {
        let url = self.endpoint(&format!("onebox/reply/{id}"));
        debug!("POST {}", url);
        let response = self
            .authorized(self.http.post(url))
            .json(payload)
            .send()
            .await?;
        check_status("Sending reply", response)?;
        info!("Sent reply to thread {}", id);
        Ok(())
    }

    // -- private helpers --

    async fn try_list(&self) -> Result<Vec<Thread>> {
        let url = self.endpoint("onebox/list");
        debug!("GET {}", url);
        let response = self.authorized(self.http.get(url)).send().await?;
        let body: ListResponse = check_status("Listing threads", response)?.json().await?;
        Ok(body.threads)
    }

    async fn try_get(&self, id: &str) -> Result<Option<Thread>> {
        let url = self.endpoint(&format!("onebox/{id}"));
        debug!("GET {}", url);
        let response = self.authorized(self.http.get(url)).send().await?;
        let body: ThreadResponse = check_status("Fetching thread", response)?.json().await?;
        Ok(body.thread)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_base.as_str().trim_end_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(self.tokens.bearer())
            .header(reqwest::header::CONTENT_TYPE, "application/json")
    }
}

fn check_status(operation: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Status { operation, status })
    }
}

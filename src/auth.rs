//! Google login hand-off
//!
//! The API authenticates the user and redirects back with the bearer
//! credential either in the URL fragment (`#token=...`) or in the
//! query string (`?token=...`). A redirect carrying `?error=...`
//! instead is a refusal.

use crate::token::TokenStore;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

/// Shown when no credential arrives in time.
pub const TIMEOUT_MESSAGE: &str = "No authentication token received. Please try again.";

#[derive(Error, Debug)]
pub enum AuthError {
    /// The provider redirected back with an `error` parameter.
    #[error("{0}")]
    Denied(String),

    #[error("No authentication token received. Please try again.")]
    Timeout,

    #[error("Invalid callback URL: {0}")]
    InvalidCallback(#[from] url::ParseError),

    #[error("Failed to store credential: {0}")]
    Storage(#[from] crate::Error),
}

/// What a redirect URL carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Token(String),
    Denied(String),
    /// Neither a token nor an error.
    Empty,
}

/// URL that starts the Google login and returns to `redirect_to`.
///
/// # Errors
///
/// Returns an error if the API base cannot be extended into a URL.
pub fn login_url(api_base: &Url, redirect_to: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&format!(
        "{}/auth/google-login",
        api_base.as_str().trim_end_matches('/')
    ))?;
    url.query_pairs_mut().append_pair("redirect_to", redirect_to);
    Ok(url)
}

/// Extract the login result from a redirect URL.
///
/// A token in the fragment wins over one in the query. An empty
/// `token=` counts as absent.
#[must_use]
pub fn parse_callback(url: &Url) -> CallbackOutcome {
    let token = fragment_token(url)
        .or_else(|| query_param(url, "token").filter(|t| !t.is_empty()));

    if let Some(token) = token {
        return CallbackOutcome::Token(token);
    }
    query_param(url, "error").map_or(CallbackOutcome::Empty, CallbackOutcome::Denied)
}

/// The text after the first `token=` in the fragment, up to the next
/// `&`. Any key ending in `token` matches (`access_token=` too), and
/// the value is kept exactly as sent, so `+` stays `+`.
fn fragment_token(url: &Url) -> Option<String> {
    let (_, rest) = url.fragment()?.split_once("token=")?;
    let token = rest.split_once('&').map_or(rest, |(token, _)| token);
    (!token.is_empty()).then(|| token.to_string())
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// Wait for the redirect URL and store the credential it carries.
///
/// `callback` resolves to the redirect URL, or `None` if its source
/// closed. Gives up with [`AuthError::Timeout`] after `wait`, or when
/// the redirect carries neither a token nor an error.
///
/// # Errors
///
/// Returns [`AuthError::Denied`] for an `error` parameter,
/// [`AuthError::Timeout`] when no token arrives, and
/// [`AuthError::InvalidCallback`] for an unparseable URL.
pub async fn complete_login<F>(
    tokens: &TokenStore,
    callback: F,
    wait: Duration,
) -> Result<String, AuthError>
where
    F: Future<Output = Option<String>>,
{
    let raw = tokio::time::timeout(wait, callback)
        .await
        .map_err(|_| AuthError::Timeout)?
        .ok_or(AuthError::Timeout)?;
    let url = Url::parse(raw.trim())?;

    match parse_callback(&url) {
        CallbackOutcome::Token(token) => {
            tokens.set_token(&token)?;
            info!("Login completed");
            Ok(token)
        }
        CallbackOutcome::Denied(reason) => {
            warn!("Login refused: {}", reason);
            Err(AuthError::Denied(reason))
        }
        CallbackOutcome::Empty => Err(AuthError::Timeout),
    }
}

//! KAS session authentication
//!
//! A session token is obtained with a plain-password login and only lives
//! for one logical operation. The client never stores it: a caller that
//! wants several calls to share one login passes the token explicitly via
//! [`CallContext::with_session`].

use std::fmt;

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::credentials::KasCredentials;
use crate::decode::decode_response;
use crate::envelope::{AuthRequest, encode_auth_envelope};
use crate::error::{KasError, Result};
use crate::http_client::{Endpoint, HttpUtils};
use crate::utils::log_sanitizer::redact_auth_data;
use crate::value::{map_value, resolve};

/// Opaque KAS session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Per-call options: an optional pre-fetched session and a cancellation signal.
///
/// Without a session every operation performs its own login.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    session: Option<SessionToken>,
    cancel: CancellationToken,
}

impl CallContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuses `token` instead of logging in.
    #[must_use]
    pub fn with_session(mut self, token: SessionToken) -> Self {
        self.session = Some(token);
        self
    }

    /// Aborts flood-control waits and in-flight requests once `cancel` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

/// Performs KAS logins.
#[derive(Debug)]
pub(crate) struct Authenticator {
    pub client: Client,
    pub credentials: KasCredentials,
    pub auth_url: String,
    pub verbose_errors: bool,
}

impl Authenticator {
    /// Returns the context's token, or logs in when it has none.
    pub async fn authenticate(&self, ctx: &CallContext) -> Result<SessionToken> {
        if let Some(token) = ctx.session() {
            return Ok(token.clone());
        }
        self.login(ctx.cancellation()).await
    }

    /// One login round trip.
    pub async fn login(&self, cancel: &CancellationToken) -> Result<SessionToken> {
        let endpoint = Endpoint {
            url: &self.auth_url,
            verbose: self.verbose_errors,
        };

        let request = AuthRequest::plain(self.credentials.login(), self.credentials.password());
        let envelope = encode_auth_envelope(&request)?;
        log::debug!("[kas] Login request: {}", redact_auth_data(&envelope));

        let body = HttpUtils::post_envelope(&self.client, endpoint, envelope, cancel).await?;
        let node = decode_response(&body)
            .map_err(|e| endpoint.with_context(e))?
            .into_result()
            .inspect_err(|e| log::warn!("[kas] Login rejected: {e}"))?;

        let token: String = map_value(resolve(&node))?;
        if token.is_empty() {
            return Err(KasError::mapping("login returned an empty session token"));
        }

        log::debug!("[kas] Login succeeded for {}", self.credentials.login());
        Ok(SessionToken(token))
    }
}

//! all-inkl.com KAS Provider

mod http;
mod provider;
mod types;

use std::time::Duration;

use reqwest::Client;

use crate::credentials::{KasCredentials, verbose_errors_from_env};
use crate::error::{KasError, Result};
use crate::flood::FloodControl;
use crate::session::Authenticator;

pub(crate) use types::{Confirmation, CreatedId, DeleteParams, KasReply, KasRecord, ListParams, RecordParams};

/// KAS SOAP endpoint for record actions.
pub const KAS_API_URL: &str = "https://kasapi.kasserver.com/soap/KasApi.php";
/// KAS SOAP endpoint for logins.
pub const KAS_AUTH_URL: &str = "https://kasapi.kasserver.com/soap/KasAuth.php";

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default timeout of record actions (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
/// Default timeout of logins (seconds).
const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 10;

/// all-inkl.com KAS Provider
///
/// Share one instance (e.g. behind an `Arc`) between tasks: the flood-control
/// deadline is per instance.
#[derive(Debug)]
pub struct KasProvider {
    pub(crate) client: Client,
    pub(crate) api_url: String,
    pub(crate) verbose_errors: bool,
    pub(crate) auth: Authenticator,
    pub(crate) flood: FloodControl,
}

/// KAS Provider Builder
pub struct KasProviderBuilder {
    credentials: KasCredentials,
    api_url: String,
    auth_url: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    auth_timeout: Duration,
    verbose_errors: bool,
}

impl KasProviderBuilder {
    fn new(credentials: KasCredentials) -> Self {
        Self {
            credentials,
            api_url: KAS_API_URL.to_string(),
            auth_url: KAS_AUTH_URL.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            auth_timeout: Duration::from_secs(DEFAULT_AUTH_TIMEOUT_SECS),
            verbose_errors: verbose_errors_from_env(),
        }
    }

    #[must_use]
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    #[must_use]
    pub fn auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    /// Include `POST <url>` in transport errors. Defaults to
    /// `LEGO_DEBUG_CLIENT_VERBOSE_ERROR`.
    #[must_use]
    pub fn verbose_errors(mut self, verbose: bool) -> Self {
        self.verbose_errors = verbose;
        self
    }

    pub fn build(self) -> Result<KasProvider> {
        let client = http_client(self.connect_timeout, self.request_timeout)?;
        let auth_client = http_client(self.connect_timeout, self.auth_timeout)?;

        log::debug!(
            "[kas] Client for {} (api: {}, auth: {})",
            self.credentials.login(),
            self.api_url,
            self.auth_url
        );

        Ok(KasProvider {
            client,
            api_url: self.api_url,
            verbose_errors: self.verbose_errors,
            auth: Authenticator {
                client: auth_client,
                credentials: self.credentials,
                auth_url: self.auth_url,
                verbose_errors: self.verbose_errors,
            },
            flood: FloodControl::new(),
        })
    }
}

/// 创建带超时配置的 HTTP Client
fn http_client(connect_timeout: Duration, timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| KasError::Transport {
            request: None,
            detail: format!("failed to create HTTP client: {e}"),
            timeout: false,
        })
}

impl KasProvider {
    pub fn new(credentials: KasCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: KasCredentials) -> KasProviderBuilder {
        KasProviderBuilder::new(credentials)
    }

    /// Client configured from `ALLINKL_USERNAME` / `ALLINKL_PASSWORD`.
    pub fn from_env() -> Result<Self> {
        Self::new(KasCredentials::from_env()?)
    }

    /// The flood-control state shared by all operations of this client.
    pub fn flood_control(&self) -> &FloodControl {
        &self.flood
    }
}

//! HTTP transport
//!
//! Sends one SOAP envelope and returns the raw response text. No retries:
//! KAS callers pace themselves through flood control and decide on their own
//! whether to resubmit.

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::error::KasError;
use crate::utils::log_sanitizer::truncate_for_log;

/// One SOAP call target.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Endpoint<'a> {
    pub url: &'a str,
    /// Include `POST <url>` in errors.
    pub verbose: bool,
}

impl Endpoint<'_> {
    fn request_line(&self) -> Option<String> {
        self.verbose.then(|| format!("POST {}", self.url))
    }

    /// Attaches request context to a decode error raised for this endpoint.
    pub fn with_context(&self, error: KasError) -> KasError {
        match error {
            KasError::Decode { detail, .. } => KasError::Decode {
                request: self.request_line(),
                detail,
            },
            other => other,
        }
    }
}

/// HTTP tool function set
pub(crate) struct HttpUtils;

impl HttpUtils {
    /// POSTs an envelope and returns the response body.
    ///
    /// # Returns
    /// * `Ok(body)` - 2xx response, body unaltered
    /// * `Err(KasError::Transport)` - request not sent or no response
    /// * `Err(KasError::UnexpectedStatus)` - non-2xx status (body trimmed)
    /// * `Err(KasError::Cancelled)` - `cancel` fired before completion
    pub async fn post_envelope(
        client: &Client,
        endpoint: Endpoint<'_>,
        envelope: String,
        cancel: &CancellationToken,
    ) -> Result<String, KasError> {
        log::debug!("[kas] POST {}", endpoint.url);

        let request = client
            .post(endpoint.url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .body(envelope);

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                log::debug!("[kas] POST {} cancelled", endpoint.url);
                Err(KasError::Cancelled)
            }
            result = Self::execute(request, endpoint) => result,
        }
    }

    async fn execute(
        request: reqwest::RequestBuilder,
        endpoint: Endpoint<'_>,
    ) -> Result<String, KasError> {
        let transport_error = |e: reqwest::Error| KasError::Transport {
            request: endpoint.request_line(),
            timeout: e.is_timeout(),
            detail: e.to_string(),
        };

        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        log::debug!("[kas] Response Status: {}", status.as_u16());

        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            log::warn!("[kas] Unexpected status (HTTP {})", status.as_u16());
            return Err(KasError::UnexpectedStatus {
                request: endpoint.request_line(),
                status: status.as_u16(),
                body: text.trim().to_string(),
            });
        }

        log::debug!("[kas] Response Body: {}", truncate_for_log(&text));

        Ok(text)
    }
}

//! KAS request pipeline

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::decode::decode_response;
use crate::envelope::{AUTH_TYPE_SESSION, KasRequest, encode_api_envelope};
use crate::error::Result;
use crate::http_client::{Endpoint, HttpUtils};
use crate::utils::log_sanitizer::redact_auth_data;
use crate::session::CallContext;
use crate::value::{map_value, resolve};

use super::{KasProvider, KasReply};

impl KasProvider {
    /// Executes one KAS action and returns its `ReturnInfo`.
    ///
    /// authenticate → encode → flood wait → POST → decode → fault check →
    /// resolve → map → record flood delay
    pub(crate) async fn request<T, P>(&self, ctx: &CallContext, action: &str, params: &P) -> Result<T>
    where
        T: DeserializeOwned + Default,
        P: Serialize,
    {
        // 1. Session
        let token = self.auth.authenticate(ctx).await?;

        // 2. Envelope
        let request = KasRequest {
            login: self.auth.credentials.login(),
            auth_type: AUTH_TYPE_SESSION,
            auth_data: token.as_str(),
            action,
            params,
        };
        let envelope = encode_api_envelope(&request)?;
        log::debug!("[kas] {action} request: {}", redact_auth_data(&envelope));

        // 3. Flood control
        self.flood.await_ready(ctx.cancellation()).await?;

        // 4. Transport
        let endpoint = Endpoint {
            url: &self.api_url,
            verbose: self.verbose_errors,
        };
        let body = HttpUtils::post_envelope(&self.client, endpoint, envelope, ctx.cancellation())
            .await?;

        // 5. Decode, faults short-circuit before resolution
        let node = decode_response(&body)
            .map_err(|e| endpoint.with_context(e))?
            .into_result()
            .inspect_err(|e| {
                if e.is_expected() {
                    log::warn!("[kas] {action} failed: {e}");
                } else {
                    log::error!("[kas] {action} failed: {e}");
                }
            })?;

        // 6. Resolve + map
        let reply: KasReply<T> = map_value(resolve(&node))?;

        // 7. Pace the next request
        self.flood.record_delay(reply.response.flood_delay).await;
        log::debug!(
            "[kas] {action}: {} (flood delay {}s)",
            reply.response.return_string,
            reply.response.flood_delay
        );

        Ok(reply.response.return_info)
    }
}

//! KAS DnsRecordProvider trait 实现

use async_trait::async_trait;

use crate::error::{KasError, Result};
use crate::session::{CallContext, SessionToken};
use crate::traits::DnsRecordProvider;
use crate::types::DnsRecord;

use super::{Confirmation, CreatedId, DeleteParams, KasProvider, KasRecord, ListParams, RecordParams};

const GET_DNS_SETTINGS: &str = "get_dns_settings";
const ADD_DNS_SETTINGS: &str = "add_dns_settings";
const UPDATE_DNS_SETTINGS: &str = "update_dns_settings";
const DELETE_DNS_SETTINGS: &str = "delete_dns_settings";

impl KasProvider {
    /// Logs in once and returns the token.
    ///
    /// Attach it with [`CallContext::with_session`] to let several operations
    /// share a session instead of logging in for each of them.
    pub async fn login(&self, ctx: &CallContext) -> Result<SessionToken> {
        self.auth.login(ctx.cancellation()).await
    }
}

#[async_trait]
impl DnsRecordProvider for KasProvider {
    async fn list_records(
        &self,
        ctx: &CallContext,
        zone_host: &str,
        record_id: Option<&str>,
    ) -> Result<Vec<DnsRecord>> {
        let params = ListParams {
            zone_host,
            record_id: record_id.filter(|id| !id.is_empty()),
        };
        let records: Vec<KasRecord> = self.request(ctx, GET_DNS_SETTINGS, &params).await?;

        log::debug!("[kas] {zone_host}: {} record(s)", records.len());
        Ok(records.into_iter().map(DnsRecord::from).collect())
    }

    async fn create_record(&self, ctx: &CallContext, record: &DnsRecord) -> Result<String> {
        let CreatedId(id) = self
            .request(ctx, ADD_DNS_SETTINGS, &RecordParams::create(record))
            .await?;

        if id.is_empty() {
            return Err(KasError::mapping("add_dns_settings returned no record id"));
        }
        log::info!(
            "[kas] Created {} record '{}' in {} (id {id})",
            record.record_type,
            record.record_name,
            record.zone_host
        );
        Ok(id)
    }

    async fn update_record(&self, ctx: &CallContext, record: &DnsRecord) -> Result<String> {
        let Confirmation(confirmation) = self
            .request(ctx, UPDATE_DNS_SETTINGS, &RecordParams::update(record))
            .await?;

        log::info!("[kas] Updated record {} in {}", record.id, record.zone_host);
        Ok(confirmation)
    }

    async fn delete_record(&self, ctx: &CallContext, record_id: &str) -> Result<bool> {
        let deleted: bool = self
            .request(ctx, DELETE_DNS_SETTINGS, &DeleteParams { record_id })
            .await?;

        if deleted {
            log::info!("[kas] Deleted record {record_id}");
        } else {
            log::warn!("[kas] Server did not confirm deletion of record {record_id}");
        }
        Ok(deleted)
    }
}

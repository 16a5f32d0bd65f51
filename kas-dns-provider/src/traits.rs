use async_trait::async_trait;

use crate::error::Result;
use crate::session::CallContext;
use crate::types::DnsRecord;

/// DNS record operations consumed by resource-lifecycle tooling.
///
/// Each call is independent: unless `ctx` carries a session token it logs in
/// first, and it never retries. Cardinality checks (e.g. "exactly one record
/// on read") are left to the caller.
#[async_trait]
pub trait DnsRecordProvider: Send + Sync {
    /// Records of `zone_host`, optionally restricted to one record id.
    ///
    /// No match is an empty list, not an error.
    async fn list_records(
        &self,
        ctx: &CallContext,
        zone_host: &str,
        record_id: Option<&str>,
    ) -> Result<Vec<DnsRecord>>;

    /// Creates `record` (its `id` is ignored) and returns the new record id.
    async fn create_record(&self, ctx: &CallContext, record: &DnsRecord) -> Result<String>;

    /// Replaces the record identified by `record.id`.
    ///
    /// The returned confirmation text is opaque; getting one means success.
    async fn update_record(&self, ctx: &CallContext, record: &DnsRecord) -> Result<String>;

    /// Deletes a record by id and returns the server's success flag.
    async fn delete_record(&self, ctx: &CallContext, record_id: &str) -> Result<bool>;
}

//! KAS API request parameters and response payloads

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::types::{DnsRecord, de};

// ============ Request parameters ============

/// `get_dns_settings` parameters.
#[derive(Debug, Serialize)]
pub struct ListParams<'a> {
    pub zone_host: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<&'a str>,
}

/// `add_dns_settings` / `update_dns_settings` parameters.
#[derive(Debug, Serialize)]
pub struct RecordParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_id: Option<&'a str>,
    pub zone_host: &'a str,
    pub record_type: &'a str,
    pub record_name: &'a str,
    pub record_data: &'a str,
    pub record_aux: i64,
}

impl<'a> RecordParams<'a> {
    /// Parameters for creating `record`; its id is never sent.
    pub fn create(record: &'a DnsRecord) -> Self {
        Self {
            record_id: None,
            ..Self::update(record)
        }
    }

    /// Parameters for updating `record` in place.
    pub fn update(record: &'a DnsRecord) -> Self {
        Self {
            record_id: Some(record.id.as_str()),
            zone_host: &record.zone_host,
            record_type: &record.record_type,
            record_name: &record.record_name,
            record_data: &record.record_data,
            record_aux: record.record_aux,
        }
    }
}

/// `delete_dns_settings` parameters.
#[derive(Debug, Serialize)]
pub struct DeleteParams<'a> {
    pub record_id: &'a str,
}

// ============ Response payloads ============

/// Top-level map every KAS action returns.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
pub struct KasReply<T> {
    #[serde(rename = "Response")]
    pub response: KasResponse<T>,
}

/// The `Response` map of a KAS reply.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned + Default"))]
pub struct KasResponse<T> {
    /// Seconds to wait before the next request.
    #[serde(rename = "KasFloodDelay", default)]
    pub flood_delay: f64,
    /// Action result.
    #[serde(rename = "ReturnInfo", default, deserialize_with = "de::empty_as_default")]
    pub return_info: T,
    /// Status text, usually `TRUE`.
    #[serde(rename = "ReturnString", default)]
    pub return_string: String,
}

/// A record as returned by `get_dns_settings`.
#[derive(Debug, Deserialize)]
pub struct KasRecord {
    #[serde(rename = "record_id", deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(rename = "record_zone", default)]
    pub zone: String,
    #[serde(default)]
    pub record_name: String,
    #[serde(default)]
    pub record_type: String,
    #[serde(default)]
    pub record_data: String,
    #[serde(default, deserialize_with = "de::lenient_i64")]
    pub record_aux: i64,
    #[serde(
        rename = "record_changeable",
        default = "changeable_default",
        deserialize_with = "de::yes_no"
    )]
    pub changeable: bool,
}

fn changeable_default() -> bool {
    true
}

impl From<KasRecord> for DnsRecord {
    fn from(r: KasRecord) -> Self {
        Self {
            id: r.id,
            zone_host: r.zone,
            record_type: r.record_type,
            record_name: r.record_name,
            record_data: r.record_data,
            record_aux: r.record_aux,
            changeable: r.changeable,
        }
    }
}

/// Record ID returned by `add_dns_settings` (string or integer on the wire).
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct CreatedId(#[serde(deserialize_with = "de::string_or_number")] pub String);

/// Opaque confirmation returned by `update_dns_settings`.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct Confirmation(#[serde(deserialize_with = "de::scalar_text")] pub String);

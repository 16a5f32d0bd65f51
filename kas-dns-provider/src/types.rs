use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KasError;

// ============ DNS Record ============

/// A KAS DNS resource record.
///
/// `id` is empty until the server assigns one. Records returned by
/// [`list_records`](crate::DnsRecordProvider::list_records) always carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsRecord {
    /// Record ID assigned by the server.
    pub id: String,
    /// Zone the record belongs to, as a fully-qualified domain name.
    pub zone_host: String,
    /// Record type (`A`, `AAAA`, `MX`, `TXT`, ...).
    pub record_type: String,
    /// Record name relative to the zone.
    pub record_name: String,
    /// Record data.
    pub record_data: String,
    /// Auxiliary value, the priority for `MX`/`SRV` records.
    pub record_aux: i64,
    /// Whether the control panel allows modifying the record.
    pub changeable: bool,
}

impl DnsRecord {
    /// A record that has not been created yet.
    pub fn new(
        zone_host: impl Into<String>,
        record_type: impl Into<String>,
        record_name: impl Into<String>,
        record_data: impl Into<String>,
        record_aux: i64,
    ) -> Self {
        Self {
            id: String::new(),
            zone_host: zone_host.into(),
            record_type: record_type.into(),
            record_name: record_name.into(),
            record_data: record_data.into(),
            record_aux,
            changeable: true,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Identifier for importing this record into external state.
    pub fn import_id(&self) -> ImportId {
        ImportId {
            zone_host: self.zone_host.clone(),
            record_id: self.id.clone(),
        }
    }
}

// ============ Import ID ============

/// `<zone_host>/<record_id>`, the identifier used to import an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportId {
    pub zone_host: String,
    pub record_id: String,
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.zone_host, self.record_id)
    }
}

impl FromStr for ImportId {
    type Err = KasError;

    /// Splits at the first `/`. Both halves must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((zone_host, record_id)) if !zone_host.is_empty() && !record_id.is_empty() => {
                Ok(Self {
                    zone_host: zone_host.to_string(),
                    record_id: record_id.to_string(),
                })
            }
            _ => Err(KasError::InvalidImportId {
                input: s.to_string(),
            }),
        }
    }
}

// ============ Lenient field deserializers ============

/// Field-level deserializers for values KAS types inconsistently.
///
/// An empty element resolves to `""`, and some ids arrive as integers.
pub(crate) mod de {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Int(i64),
        Float(f64),
    }

    /// Accepts a string or a number, yielding its text.
    pub fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match StringOrNumber::deserialize(d)? {
            StringOrNumber::String(s) => s,
            StringOrNumber::Int(i) => i.to_string(),
            StringOrNumber::Float(f) => f.to_string(),
        })
    }

    /// Text of any scalar, booleans included.
    pub fn scalar_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        match serde_json::Value::deserialize(d)? {
            serde_json::Value::Bool(b) => Ok(b.to_string()),
            serde_json::Value::Number(n) => Ok(n.to_string()),
            serde_json::Value::String(s) => Ok(s),
            other => Err(D::Error::custom(format!("expected a scalar, got {other}"))),
        }
    }

    /// Treats `""` (an empty element) as `T::default()`.
    pub fn empty_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = serde_json::Value::deserialize(d)?;
        match value {
            serde_json::Value::String(ref s) if s.is_empty() => Ok(T::default()),
            serde_json::Value::Null => Ok(T::default()),
            other => serde_json::from_value(other).map_err(D::Error::custom),
        }
    }

    /// Integers sent as `int`, integral `float` or numeric `string`; `""` is `0`.
    pub fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        match StringOrNumber::deserialize(d)? {
            StringOrNumber::Int(i) => Ok(i),
            #[allow(clippy::cast_possible_truncation)]
            StringOrNumber::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
            StringOrNumber::String(s) if s.trim().is_empty() => Ok(0),
            StringOrNumber::String(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("invalid integer: {s}"))),
            StringOrNumber::Float(f) => Err(D::Error::custom(format!("invalid integer: {f}"))),
        }
    }

    /// `"Y"` / `"N"` flags; also accepts real booleans.
    pub fn yes_no<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        match serde_json::Value::deserialize(d)? {
            serde_json::Value::Bool(b) => Ok(b),
            serde_json::Value::String(s) => match s.as_str() {
                "Y" | "y" => Ok(true),
                "N" | "n" | "" => Ok(false),
                other => Err(D::Error::custom(format!("invalid Y/N flag: {other}"))),
            },
            other => Err(D::Error::custom(format!("invalid Y/N flag: {other}"))),
        }
    }
}

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all KAS client operations.
///
/// Transport-level variants carry an optional `request` line (`"POST <url>"`).
/// It is only populated when verbose errors are enabled, either through the
/// builder or the `LEGO_DEBUG_CLIENT_VERBOSE_ERROR` environment variable.
///
/// None of these errors are recovered internally and no operation retries.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum KasError {
    /// The request parameters could not be represented as JSON.
    #[error("failed to create request JSON body: {detail}")]
    Encoding {
        /// Serializer error message.
        detail: String,
    },

    /// The request could not be sent or no response was received.
    #[error(
        "unable to communicate with the API server:{} error: {detail}",
        request_suffix(.request)
    )]
    Transport {
        /// `"<METHOD> <URL>"`, verbose mode only.
        request: Option<String>,
        /// Underlying I/O error.
        detail: String,
        /// Whether the failure was a client-side timeout.
        timeout: bool,
    },

    /// The server answered with a non-success HTTP status.
    #[error(
        "unexpected status code:{} [status code: {status}] body: {body}",
        request_suffix(.request)
    )]
    UnexpectedStatus {
        /// `"<METHOD> <URL>"`, verbose mode only.
        request: Option<String>,
        /// HTTP status code.
        status: u16,
        /// Response body with surrounding whitespace trimmed.
        body: String,
    },

    /// The response was not a well-formed SOAP envelope.
    #[error("unable to decode response:{} {detail}", request_suffix(.request))]
    Decode {
        /// `"<METHOD> <URL>"`, verbose mode only.
        request: Option<String>,
        /// Parser error message.
        detail: String,
    },

    /// The decoded value does not fit the expected result shape.
    #[error("response struct decode: {detail}")]
    Mapping {
        /// Mapper error message.
        detail: String,
    },

    /// The server reported a SOAP fault.
    #[error("{actor}: {code}: {message}")]
    RemoteFault {
        /// `faultcode`
        #[serde(rename = "fault_code")]
        code: String,
        /// `faultstring`
        message: String,
        /// `faultactor`
        actor: String,
    },

    /// The caller cancelled the operation while it was waiting.
    #[error("operation cancelled")]
    Cancelled,

    /// A required credential was neither configured nor present in the environment.
    #[error("missing credentials: {variable} is not set")]
    MissingCredentials {
        /// Name of the configuration key or environment variable.
        variable: String,
    },

    /// An import identifier did not have the `zone_host/record_id` form.
    #[error("invalid import id '{input}': expected `zone_host/record_id`")]
    InvalidImportId {
        /// The rejected input.
        input: String,
    },
}

fn request_suffix(request: &Option<String>) -> String {
    match request {
        Some(request) => format!(" [request: {request}]"),
        None => String::new(),
    }
}

impl KasError {
    /// Whether the error is caused by caller input or a remote business rule,
    /// used to pick between `warn` and `error` log levels.
    ///
    /// **Keep this in sync when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::RemoteFault { .. }
                | Self::Cancelled
                | Self::MissingCredentials { .. }
                | Self::InvalidImportId { .. }
        )
    }

    pub(crate) fn mapping(detail: impl ToString) -> Self {
        Self::Mapping {
            detail: detail.to_string(),
        }
    }
}

/// Convenience type alias for `Result<T, KasError>`.
pub type Result<T> = std::result::Result<T, KasError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_transport_plain() {
        let e = KasError::Transport {
            request: None,
            detail: "connection refused".to_string(),
            timeout: false,
        };
        assert_eq!(
            e.to_string(),
            "unable to communicate with the API server: error: connection refused"
        );
    }

    #[test]
    fn display_transport_verbose() {
        let e = KasError::Transport {
            request: Some("POST https://kas.test/soap/KasApi.php".to_string()),
            detail: "connection refused".to_string(),
            timeout: false,
        };
        assert_eq!(
            e.to_string(),
            "unable to communicate with the API server: [request: POST https://kas.test/soap/KasApi.php] error: connection refused"
        );
    }

    #[test]
    fn display_unexpected_status() {
        let e = KasError::UnexpectedStatus {
            request: None,
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "unexpected status code: [status code: 500] body: boom"
        );
    }

    #[test]
    fn display_remote_fault() {
        let e = KasError::RemoteFault {
            code: "1234".to_string(),
            message: "bad credentials".to_string(),
            actor: "login".to_string(),
        };
        assert_eq!(e.to_string(), "login: 1234: bad credentials");
    }

    #[test]
    fn display_missing_credentials() {
        let e = KasError::MissingCredentials {
            variable: "ALLINKL_PASSWORD".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "missing credentials: ALLINKL_PASSWORD is not set"
        );
    }

    #[test]
    fn serialize_carries_code_tag() {
        let e = KasError::UnexpectedStatus {
            request: None,
            status: 502,
            body: String::new(),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"UnexpectedStatus\""));
        assert!(json.contains("\"status\":502"));
    }

    #[test]
    fn remote_fault_code_does_not_shadow_tag() {
        let e = KasError::RemoteFault {
            code: "1234".into(),
            message: "bad credentials".into(),
            actor: "login".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&e).unwrap();
        assert_eq!(json["code"], "RemoteFault");
        assert_eq!(json["fault_code"], "1234");
    }

    #[test]
    fn deserialize_round_trip_keeps_display() {
        let variants = vec![
            KasError::Encoding { detail: "d".into() },
            KasError::Transport {
                request: Some("POST u".into()),
                detail: "d".into(),
                timeout: true,
            },
            KasError::Decode {
                request: None,
                detail: "d".into(),
            },
            KasError::Mapping { detail: "d".into() },
            KasError::RemoteFault {
                code: "c".into(),
                message: "m".into(),
                actor: "a".into(),
            },
            KasError::Cancelled,
            KasError::InvalidImportId { input: "x".into() },
        ];

        for v in &variants {
            let json = serde_json::to_string(v).unwrap();
            let back: KasError = serde_json::from_str(&json).unwrap();
            assert_eq!(back.to_string(), v.to_string());
        }
    }

    #[test]
    fn expected_variants() {
        assert!(KasError::Cancelled.is_expected());
        assert!(
            KasError::RemoteFault {
                code: "c".into(),
                message: "m".into(),
                actor: "a".into(),
            }
            .is_expected()
        );
        assert!(
            !KasError::Decode {
                request: None,
                detail: "d".into(),
            }
            .is_expected()
        );
    }
}

//! Outgoing SOAP envelopes
//!
//! KAS does not use typed SOAP parameters: every call sends a single `Params`
//! element whose text is a JSON document describing the action.

use serde::Serialize;

use crate::error::{KasError, Result};

const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const KAS_NS: &str = "https://kasserver.com/";

/// `kas_auth_type` for calls authenticated with a session token.
pub(crate) const AUTH_TYPE_SESSION: &str = "session";
/// `kas_auth_type` for calls authenticated with the account password.
pub(crate) const AUTH_TYPE_PLAIN: &str = "plain";

/// Requested session lifetime in seconds.
pub(crate) const SESSION_LIFETIME_SECS: u32 = 300;

/// A KAS API action request.
#[derive(Debug, Serialize)]
pub struct KasRequest<'a, P: Serialize> {
    /// Account login.
    #[serde(rename = "kas_login", skip_serializing_if = "str::is_empty")]
    pub login: &'a str,
    /// `session` or `plain`.
    #[serde(rename = "kas_auth_type", skip_serializing_if = "str::is_empty")]
    pub auth_type: &'a str,
    /// Session token for `session`, password for `plain`.
    #[serde(rename = "kas_auth_data", skip_serializing_if = "str::is_empty")]
    pub auth_data: &'a str,
    /// API function to call.
    #[serde(rename = "kas_action", skip_serializing_if = "str::is_empty")]
    pub action: &'a str,
    /// Parameters of the API function.
    #[serde(rename = "KasRequestParams")]
    pub params: &'a P,
}

/// A KAS login request.
#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    #[serde(rename = "kas_login")]
    pub login: &'a str,
    #[serde(rename = "kas_auth_data")]
    pub auth_data: &'a str,
    #[serde(rename = "kas_auth_type")]
    pub auth_type: &'a str,
    pub session_lifetime: u32,
    /// `"Y"` renews the lifetime on every call made with the token.
    pub session_update_lifetime: &'a str,
}

impl<'a> AuthRequest<'a> {
    /// Plain-password login asking for a renewable session.
    pub fn plain(login: &'a str, password: &'a str) -> Self {
        Self {
            login,
            auth_data: password,
            auth_type: AUTH_TYPE_PLAIN,
            session_lifetime: SESSION_LIFETIME_SECS,
            session_update_lifetime: "Y",
        }
    }
}

/// Builds the `KasApi` envelope for an action request.
pub fn encode_api_envelope<P: Serialize>(request: &KasRequest<'_, P>) -> Result<String> {
    Ok(wrap("KasApi", &to_json(request)?))
}

/// Builds the `KasAuth` envelope for a login request.
pub fn encode_auth_envelope(request: &AuthRequest<'_>) -> Result<String> {
    Ok(wrap("KasAuth", &to_json(request)?))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| KasError::Encoding {
        detail: e.to_string(),
    })
}

fn wrap(operation: &str, json: &str) -> String {
    let document = format!(
        r#"
<Envelope xmlns="{SOAP_ENVELOPE_NS}">
    <Body>
        <{operation} xmlns="{KAS_NS}">
            <Params>{}</Params>
        </{operation}>
    </Body>
</Envelope>"#,
        escape_text(json)
    );
    document.trim().to_string()
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn params_text(envelope: &str) -> String {
        let doc = roxmltree::Document::parse(envelope).unwrap();
        doc.descendants()
            .find(|n| n.has_tag_name("Params"))
            .and_then(|n| n.text())
            .unwrap()
            .to_string()
    }

    #[test]
    fn api_envelope_wraps_json_request() {
        let params = BTreeMap::from([("zone_host", "example.com.")]);
        let req = KasRequest {
            login: "w0123456",
            auth_type: AUTH_TYPE_SESSION,
            auth_data: "token",
            action: "get_dns_settings",
            params: &params,
        };
        let envelope = encode_api_envelope(&req).unwrap();

        assert!(envelope.starts_with("<Envelope"));
        assert!(envelope.ends_with("</Envelope>"));
        assert!(envelope.contains(r#"<KasApi xmlns="https://kasserver.com/">"#));

        let json: serde_json::Value = serde_json::from_str(&params_text(&envelope)).unwrap();
        assert_eq!(json["kas_login"], "w0123456");
        assert_eq!(json["kas_auth_type"], "session");
        assert_eq!(json["kas_auth_data"], "token");
        assert_eq!(json["kas_action"], "get_dns_settings");
        assert_eq!(json["KasRequestParams"]["zone_host"], "example.com.");
    }

    #[test]
    fn auth_envelope_requests_renewable_session() {
        let envelope = encode_auth_envelope(&AuthRequest::plain("user", "secret")).unwrap();
        assert!(envelope.contains("<KasAuth"));

        let json: serde_json::Value = serde_json::from_str(&params_text(&envelope)).unwrap();
        assert_eq!(json["kas_auth_type"], "plain");
        assert_eq!(json["kas_auth_data"], "secret");
        assert_eq!(json["session_lifetime"], 300);
        assert_eq!(json["session_update_lifetime"], "Y");
    }

    #[test]
    fn markup_in_params_stays_well_formed() {
        let params = BTreeMap::from([("record_data", "v=spf1 <a> & mx")]);
        let req = KasRequest {
            login: "u",
            auth_type: AUTH_TYPE_SESSION,
            auth_data: "t",
            action: "add_dns_settings",
            params: &params,
        };
        let envelope = encode_api_envelope(&req).unwrap();
        let json: serde_json::Value = serde_json::from_str(&params_text(&envelope)).unwrap();
        assert_eq!(json["KasRequestParams"]["record_data"], "v=spf1 <a> & mx");
    }

    #[test]
    fn unrepresentable_params_fail_with_encoding_error() {
        let params = BTreeMap::from([(vec![1u8], "x")]);
        let req = KasRequest {
            login: "u",
            auth_type: AUTH_TYPE_SESSION,
            auth_data: "t",
            action: "add_dns_settings",
            params: &params,
        };
        assert!(matches!(
            encode_api_envelope(&req),
            Err(KasError::Encoding { .. })
        ));
    }
}

//! 共享测试工具和辅助函数

#![allow(dead_code)]

use kas_dns_provider::KasProvider;
use kas_dns_provider::KasCredentials;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const AUTH_PATH: &str = "/KasAuth.php";
pub const API_PATH: &str = "/KasApi.php";
pub const LOGIN: &str = "w0123456";
pub const PASSWORD: &str = "correct horse";
pub const TOKEN: &str = "b3f1c0ffee";

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping: {} is not set", $var);
                return;
            }
        )+
    };
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

// ============ Response fixtures ============

const ENVELOPE_OPEN: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="https://kasserver.com/" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:SOAP-ENC="http://schemas.xmlsoap.org/soap/encoding/" xmlns:ns2="http://xml.apache.org/xml-soap">
  <SOAP-ENV:Body>
"#;
const ENVELOPE_CLOSE: &str = r"
  </SOAP-ENV:Body>
</SOAP-ENV:Envelope>";

/// Successful `KasAuth` response carrying `token`.
pub fn auth_ok(token: &str) -> String {
    format!(
        r#"{ENVELOPE_OPEN}    <ns1:KasAuthResponse>
      <return xsi:type="xsd:string">{token}</return>
    </ns1:KasAuthResponse>{ENVELOPE_CLOSE}"#
    )
}

/// SOAP fault body.
pub fn fault(code: &str, message: &str, actor: &str) -> String {
    format!(
        r"{ENVELOPE_OPEN}    <SOAP-ENV:Fault>
      <faultcode>{code}</faultcode>
      <faultstring>{message}</faultstring>
      <faultactor>{actor}</faultactor>
    </SOAP-ENV:Fault>{ENVELOPE_CLOSE}"
    )
}

/// `xsd:string` scalar.
pub fn string(text: &str) -> String {
    format!(r#"<value xsi:type="xsd:string">{text}</value>"#)
}

/// `xsd:int` scalar.
pub fn int(value: i64) -> String {
    format!(r#"<value xsi:type="xsd:int">{value}</value>"#)
}

/// Boolean carried in the `nil` marker.
pub fn boolean(value: bool) -> String {
    format!(r#"<value xsi:nil="{value}"/>"#)
}

/// Map entries as `<item><key/><value/></item>`; each value must be a `<value>` element.
pub fn map_items(entries: &[(&str, String)]) -> String {
    entries
        .iter()
        .map(|(key, value)| {
            format!(
                "\n<item>\n  <key xsi:type=\"xsd:string\">{key}</key>\n  {value}\n</item>"
            )
        })
        .collect()
}

/// A `<value>` holding a map.
pub fn map(entries: &[(&str, String)]) -> String {
    format!(r#"<value xsi:type="ns2:Map">{}</value>"#, map_items(entries))
}

/// A `<value>` holding an array of maps.
pub fn array_of_maps(maps: &[Vec<(&str, String)>]) -> String {
    let items: String = maps
        .iter()
        .map(|m| format!("\n<item xsi:type=\"ns2:Map\">{}</item>", map_items(m)))
        .collect();
    format!(r#"<value SOAP-ENC:arrayType="ns2:Map[{}]" xsi:type="SOAP-ENC:Array">{items}</value>"#, maps.len())
}

/// Successful `KasApi` response: `{Response: {KasFloodDelay, ReturnInfo, ReturnString}}`.
pub fn api_reply(flood_delay: f64, return_info: &str) -> String {
    let response = map(&[
        ("KasFloodDelay", format!(r#"<value xsi:type="xsd:float">{flood_delay}</value>"#)),
        ("ReturnInfo", return_info.to_string()),
        ("ReturnString", string("TRUE")),
    ]);
    let outer = map_items(&[("Response", response)]);
    format!(
        r#"{ENVELOPE_OPEN}    <ns1:KasApiResponse>
      <return xsi:type="ns2:Map">{outer}
      </return>
    </ns1:KasApiResponse>{ENVELOPE_CLOSE}"#
    )
}

/// One record map as `get_dns_settings` returns it.
pub fn record_entries<'a>(
    id: &str,
    zone: &str,
    name: &str,
    record_type: &str,
    data: &str,
    aux: i64,
) -> Vec<(&'a str, String)> {
    vec![
        ("record_zone", string(zone)),
        ("record_name", string(name)),
        ("record_type", string(record_type)),
        ("record_data", string(data)),
        ("record_aux", int(aux)),
        ("record_id", string(id)),
        ("record_changeable", string("Y")),
    ]
}

// ============ Mock server ============

/// Mock KAS server with both endpoints on one host.
pub struct MockKas {
    pub server: MockServer,
}

impl MockKas {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Provider pointed at the mock server, verbose errors on.
    pub fn provider(&self) -> KasProvider {
        KasProvider::builder(KasCredentials::new(LOGIN, PASSWORD))
            .api_url(format!("{}{API_PATH}", self.server.uri()))
            .auth_url(format!("{}{AUTH_PATH}", self.server.uri()))
            .verbose_errors(true)
            .build()
            .expect("failed to build provider")
    }

    /// Login succeeds `times` times with [`TOKEN`].
    pub async fn expect_login(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path(AUTH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string(auth_ok(TOKEN)))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// `action` answers with `body` exactly `times` times.
    pub async fn expect_action(&self, action: &str, status: u16, body: String, times: u64) {
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_string_contains(format!("\"kas_action\":\"{action}\"")))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// `action` answers with `body` once, before any other mock for it.
    pub async fn respond_once(&self, action: &str, body: String) {
        Mock::given(method("POST"))
            .and(path(API_PATH))
            .and(body_string_contains(format!("\"kas_action\":\"{action}\"")))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .up_to_n_times(1)
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// JSON request objects sent to `endpoint_path`, in order.
    pub async fn sent_params(&self, endpoint_path: &str) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path() == endpoint_path)
            .map(|r| params_json(&String::from_utf8_lossy(&r.body)))
            .collect()
    }
}

/// Extracts the JSON document inside `<Params>` of a request envelope.
pub fn params_json(envelope: &str) -> serde_json::Value {
    let doc = roxmltree::Document::parse(envelope).expect("request is not XML");
    let text = doc
        .descendants()
        .find(|n| n.has_tag_name("Params"))
        .and_then(|n| n.text())
        .expect("request has no <Params>");
    serde_json::from_str(text).expect("<Params> is not JSON")
}

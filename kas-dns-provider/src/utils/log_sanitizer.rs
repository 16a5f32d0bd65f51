//! Log sanitization utilities
//!
//! KAS responses can be whole zone listings and every request envelope
//! carries a password or session token. Nothing goes to the log without
//! passing through here first.

/// Maximum number of bytes of a response body written to the log.
const TRUNCATE_LIMIT: usize = 512;

const AUTH_DATA_KEY: &str = "\"kas_auth_data\":\"";

/// Truncates `s` to [`TRUNCATE_LIMIT`] bytes on a char boundary.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut end = TRUNCATE_LIMIT;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..end], s.len())
}

/// Masks the JSON string value of `kas_auth_data` inside an encoded envelope.
pub fn redact_auth_data(envelope: &str) -> String {
    let Some(start) = envelope.find(AUTH_DATA_KEY).map(|i| i + AUTH_DATA_KEY.len()) else {
        return envelope.to_string();
    };

    let mut end = envelope.len();
    let mut escaped = false;
    for (i, c) in envelope[start..].char_indices() {
        match c {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                end = start + i;
                break;
            }
            _ => escaped = false,
        }
    }
    format!("{}***{}", &envelope[..start], &envelope[end..])
}

//! Headers attached to every request sent to the API.
//!
//! The reserved headers always win: any caller-supplied header with the same
//! name (in any case) is dropped before the policy values are appended.

use crate::http::HttpRequest;

/// Value of the `User-Agent` header sent with every request.
pub const USER_AGENT: &str = "M2X/1 (Rust ureq)";

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-M2X-KEY";

const JSON: &str = "application/json";

const RESERVED: [&str; 4] = ["user-agent", API_KEY_HEADER, "content-type", "accept"];

/// Apply the header policy to `request` using the client's own `api_key`.
pub fn apply(request: &mut HttpRequest, api_key: &str) {
    request
        .headers
        .retain(|(name, _)| !RESERVED.iter().any(|reserved| name.eq_ignore_ascii_case(reserved)));

    request.headers.extend([
        ("User-Agent".to_string(), USER_AGENT.to_string()),
        (API_KEY_HEADER.to_string(), api_key.to_string()),
        ("Content-Type".to_string(), JSON.to_string()),
        ("Accept".to_string(), JSON.to_string()),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn adds_all_policy_headers() {
        let mut req = HttpRequest::new(HttpMethod::Get, "http://localhost/v1/status");
        apply(&mut req, "secret");
        assert_eq!(req.headers.len(), 4);
        assert_eq!(req.header("user-agent"), Some(USER_AGENT));
        assert_eq!(req.header("x-m2x-key"), Some("secret"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("accept"), Some("application/json"));
    }

    #[test]
    fn overrides_reserved_caller_headers() {
        let mut req = HttpRequest::new(HttpMethod::Post, "http://localhost/v1/keys");
        req.headers.push(("content-type".to_string(), "text/plain".to_string()));
        req.headers.push(("x-m2x-key".to_string(), "stale".to_string()));
        req.headers.push(("X-Request-Id".to_string(), "42".to_string()));
        apply(&mut req, "fresh");

        let keys: Vec<_> = req
            .headers
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(API_KEY_HEADER))
            .collect();
        assert_eq!(keys.len(), 1);
        assert_eq!(req.header("x-m2x-key"), Some("fresh"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("x-request-id"), Some("42"));
        assert_eq!(req.headers[0].0, "X-Request-Id");
    }
}

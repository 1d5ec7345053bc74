//! HAR (HTTP Archive) transaction model
//!
//! Typed, immutable representation of one recorded HTTP transaction as
//! the engine serializes it: a request/response pair with ordered header
//! and cookie lists. Field names follow the HAR wire shape (camelCase).
//!
//! Ordering matters: headers and cookies are kept as vectors, never
//! maps, so a replayed request goes out byte-for-byte except where the
//! caller explicitly mutated it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ZapscanError};

/// Top-level HAR envelope: `{"log": {"entries": [...]}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarLog {
    pub log: HarEntries,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarEntries {
    #[serde(default)]
    pub entries: Vec<HarEntry>,
}

/// One recorded transaction: request plus completed response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarEntry {
    /// When the request was started
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_date_time: Option<DateTime<Utc>>,

    /// Total transaction time in milliseconds
    #[serde(default)]
    pub time: f64,

    pub request: HarRequest,

    pub response: HarResponse,
}

impl HarEntry {
    /// A request with no completed response is not yet a transaction.
    /// The engine encodes "still in flight" as status 0.
    pub fn is_complete(&self) -> bool {
        self.response.status != 0
    }
}

/// Name/value pair used for headers and query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarNameValue {
    pub name: String,
    pub value: String,
}

impl HarNameValue {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Cookie as recorded on a request or response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarCookie {
    pub name: String,

    pub value: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<String>,

    #[serde(default)]
    pub http_only: bool,

    #[serde(default)]
    pub secure: bool,
}

impl HarCookie {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            path: None,
            domain: None,
            expires: None,
            http_only: false,
            secure: false,
        }
    }
}

/// Request body payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarPostData {
    #[serde(default)]
    pub mime_type: String,

    #[serde(default)]
    pub text: String,
}

/// Captured request half of a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarRequest {
    pub method: String,

    pub url: String,

    #[serde(default = "default_http_version")]
    pub http_version: String,

    #[serde(default)]
    pub headers: Vec<HarNameValue>,

    #[serde(default)]
    pub cookies: Vec<HarCookie>,

    #[serde(default)]
    pub query_string: Vec<HarNameValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_data: Option<HarPostData>,

    #[serde(default = "unknown_size")]
    pub headers_size: i64,

    #[serde(default = "unknown_size")]
    pub body_size: i64,
}

/// Captured response half of a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarResponse {
    pub status: u16,

    #[serde(default)]
    pub status_text: String,

    #[serde(default = "default_http_version")]
    pub http_version: String,

    #[serde(default)]
    pub headers: Vec<HarNameValue>,

    #[serde(default)]
    pub cookies: Vec<HarCookie>,

    pub content: HarContent,

    #[serde(default, rename = "redirectURL")]
    pub redirect_url: String,

    #[serde(default = "unknown_size")]
    pub headers_size: i64,

    #[serde(default = "unknown_size")]
    pub body_size: i64,
}

/// Response body with its MIME type and computed size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarContent {
    #[serde(default)]
    pub size: i64,

    #[serde(default)]
    pub mime_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

fn default_http_version() -> String {
    "HTTP/1.1".to_string()
}

fn unknown_size() -> i64 {
    -1
}

impl HarRequest {
    /// Minimal request for manual construction
    pub fn new(method: &str, url: &str) -> Self {
        Self {
            method: method.to_string(),
            url: url.to_string(),
            http_version: default_http_version(),
            headers: Vec::new(),
            cookies: Vec::new(),
            query_string: Vec::new(),
            post_data: None,
            headers_size: -1,
            body_size: -1,
        }
    }

    /// Look up a cookie value by name
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value.as_str())
    }

    /// Return a copy with only the named cookie's value changed.
    ///
    /// Both the structured cookie list and the raw `Cookie` header are
    /// rewritten; every other field, and the order and casing of all
    /// other headers and cookies, is untouched. Errors with `NotFound`
    /// when no cookie with that name exists.
    pub fn with_cookie_value(&self, name: &str, value: &str) -> Result<HarRequest> {
        if self.cookie(name).is_none() {
            return Err(ZapscanError::NotFound(format!("cookie '{}'", name)));
        }

        let mut request = self.clone();
        for cookie in request.cookies.iter_mut() {
            if cookie.name == name {
                cookie.value = value.to_string();
            }
        }
        for header in request.headers.iter_mut() {
            if header.name.eq_ignore_ascii_case("cookie") {
                header.value = replace_cookie_pair(&header.value, name, value);
            }
        }

        Ok(request)
    }
}

/// Rewrite one `name=value` pair inside a raw `Cookie` header, leaving
/// separators, spacing and the other pairs exactly as captured.
fn replace_cookie_pair(header: &str, name: &str, value: &str) -> String {
    header
        .split(';')
        .map(|segment| {
            let trimmed = segment.trim_start();
            let lead = &segment[..segment.len() - trimmed.len()];
            match trimmed.split_once('=') {
                Some((n, _)) if n == name => format!("{}{}={}", lead, n, value),
                _ => segment.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(";")
}

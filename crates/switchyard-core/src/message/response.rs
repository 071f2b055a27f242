//! Read-only response as handed over by a transport.

use std::fmt;

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::StatusCode;

/// Status class of a response (the first digit of the code).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Series {
    Informational,
    Successful,
    Redirection,
    ClientError,
    ServerError,
    /// Codes outside `100..=599`.
    Unknown,
}

impl Series {
    pub fn of(status: StatusCode) -> Self {
        match status.as_u16() {
            100..=199 => Series::Informational,
            200..=299 => Series::Successful,
            300..=399 => Series::Redirection,
            400..=499 => Series::ClientError,
            500..=599 => Series::ServerError,
            _ => Series::Unknown,
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Series::Informational => "1xx",
            Series::Successful => "2xx",
            Series::Redirection => "3xx",
            Series::ClientError => "4xx",
            Series::ServerError => "5xx",
            Series::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// `type/subtype` of a `Content-Type`, lower-cased, parameters dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaType {
    type_: String,
    subtype: String,
}

impl MediaType {
    pub fn new(type_: &str, subtype: &str) -> Self {
        Self {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
        }
    }

    pub fn application_json() -> Self {
        Self::new("application", "json")
    }

    pub fn text_plain() -> Self {
        Self::new("text", "plain")
    }

    /// Parses `type/subtype[; params]`. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        let essence = value.split(';').next()?.trim();
        let (type_, subtype) = essence.split_once('/')?;
        let (type_, subtype) = (type_.trim(), subtype.trim());
        let is_token = |s: &str| {
            !s.is_empty()
                && s.bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b"!#$&-^_.+*".contains(&b))
        };
        if !is_token(type_) || !is_token(subtype) {
            return None;
        }
        Some(Self::new(type_, subtype))
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)
    }
}

/// Status, headers and a fully buffered body.
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn series(&self) -> Series {
        Series::of(self.status)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Parsed `Content-Type`; `None` when absent or malformed.
    pub fn content_type(&self) -> Option<MediaType> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(MediaType::parse)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

//! Immutable description of an outgoing request.

use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use url::Url;

/// Errors raised while turning `RequestArguments` into a concrete URI.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("no base URL configured for relative template {0:?}")]
    MissingBaseUrl(String),

    #[error("template {template:?} has {placeholders} placeholders but {segments} path segments were given")]
    SegmentMismatch {
        template: String,
        placeholders: usize,
        segments: usize,
    },

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Method, URI template with its path segments, headers and body presence.
///
/// Never mutated in place: every `with_*` call returns a new value, so a
/// detector can re-test a rewritten copy while the caller keeps the original.
#[derive(Debug, Clone)]
pub struct RequestArguments {
    method: Method,
    base_url: Option<Url>,
    uri_template: String,
    path_segments: Vec<String>,
    headers: HeaderMap,
    has_body: bool,
}

impl RequestArguments {
    pub fn new(method: Method, uri_template: impl Into<String>) -> Self {
        Self {
            method,
            base_url: None,
            uri_template: uri_template.into(),
            path_segments: Vec::new(),
            headers: HeaderMap::new(),
            has_body: false,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    pub fn uri_template(&self) -> &str {
        &self.uri_template
    }

    pub fn path_segments(&self) -> &[String] {
        &self.path_segments
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn has_body(&self) -> bool {
        self.has_body
    }

    /// First value of `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn with_method(&self, method: Method) -> Self {
        Self {
            method,
            ..self.clone()
        }
    }

    pub fn with_base_url(&self, base_url: Url) -> Self {
        Self {
            base_url: Some(base_url),
            ..self.clone()
        }
    }

    pub fn with_path_segments<I, S>(&self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path_segments: segments.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    /// Appends a header value; existing values for the same name are kept.
    pub fn with_header(&self, name: HeaderName, value: HeaderValue) -> Self {
        let mut headers = self.headers.clone();
        headers.append(name, value);
        Self {
            headers,
            ..self.clone()
        }
    }

    pub fn with_body(&self, has_body: bool) -> Self {
        Self {
            has_body,
            ..self.clone()
        }
    }

    /// Expands `{placeholder}` path components with the path segments (in order,
    /// percent-encoded) and appends the result to the base URL's path.
    ///
    /// An absolute template ignores the base URL and takes no segments.
    pub fn request_uri(&self) -> Result<Url, RequestError> {
        let (path, query) = match self.uri_template.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (self.uri_template.as_str(), None),
        };

        let (mut url, components) = match Url::parse(path) {
            Ok(absolute) => (absolute, Vec::new()),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self
                    .base_url
                    .as_ref()
                    .ok_or_else(|| RequestError::MissingBaseUrl(self.uri_template.clone()))?;
                let components: Vec<&str> = path.split('/').filter(|c| !c.is_empty()).collect();
                (base.clone(), components)
            }
            Err(e) => return Err(e.into()),
        };

        let placeholders = components.iter().filter(|c| is_placeholder(c)).count();
        if placeholders != self.path_segments.len() {
            return Err(RequestError::SegmentMismatch {
                template: self.uri_template.clone(),
                placeholders,
                segments: self.path_segments.len(),
            });
        }

        if !components.is_empty() {
            let mut segments = self.path_segments.iter();
            let expanded = components.iter().map(|c| {
                if is_placeholder(c) {
                    segments.next().map(String::as_str).unwrap_or_default()
                } else {
                    *c
                }
            });
            url.path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithoutBase)?
                .pop_if_empty()
                .extend(expanded);
        }

        url.set_query(query);
        Ok(url)
    }
}

fn is_placeholder(component: &str) -> bool {
    component.len() >= 2 && component.starts_with('{') && component.ends_with('}')
}

//! Navigators: pure extractors of one attribute from a response.
//!
//! Navigators are total. A missing or malformed header yields
//! [`Observed::Unknown`] (or [`Series::Unknown`]) instead of an error, so the
//! level can still fall through to its wildcard binding.

use std::fmt;
use std::hash::Hash;

use http::header::HeaderName;
use http::StatusCode;

use crate::message::{MediaType, Response, Series};

/// What a navigator looks at. Two navigators with the same kind are
/// interchangeable for matching purposes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Series,
    Status,
    ContentType,
    Header(HeaderName),
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Series => write!(f, "series"),
            AttributeKind::Status => write!(f, "status"),
            AttributeKind::ContentType => write!(f, "content-type"),
            AttributeKind::Header(name) => write!(f, "header {}", name),
        }
    }
}

/// A value read from a response, or `Unknown` when it was absent or unusable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Observed<T> {
    Value(T),
    Unknown,
}

impl<T> From<T> for Observed<T> {
    fn from(value: T) -> Self {
        Observed::Value(value)
    }
}

impl From<&str> for Observed<String> {
    fn from(value: &str) -> Self {
        Observed::Value(value.to_string())
    }
}

impl<T> From<Option<T>> for Observed<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Observed::Unknown, Observed::Value)
    }
}

impl<T: fmt::Display> fmt::Display for Observed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observed::Value(v) => fmt::Display::fmt(v, f),
            Observed::Unknown => f.write_str("<unknown>"),
        }
    }
}

pub trait Navigator: Send + Sync + 'static {
    type Attribute: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    fn kind(&self) -> AttributeKind;

    fn attribute_of(&self, response: &Response) -> Self::Attribute;
}

/// Status class (1xx..5xx).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeriesNavigator;

impl Navigator for SeriesNavigator {
    type Attribute = Series;

    fn kind(&self) -> AttributeKind {
        AttributeKind::Series
    }

    fn attribute_of(&self, response: &Response) -> Series {
        response.series()
    }
}

/// Exact status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusNavigator;

impl Navigator for StatusNavigator {
    type Attribute = StatusCode;

    fn kind(&self) -> AttributeKind {
        AttributeKind::Status
    }

    fn attribute_of(&self, response: &Response) -> StatusCode {
        response.status()
    }
}

/// Media type of `Content-Type`, parameters ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentTypeNavigator;

impl Navigator for ContentTypeNavigator {
    type Attribute = Observed<MediaType>;

    fn kind(&self) -> AttributeKind {
        AttributeKind::ContentType
    }

    fn attribute_of(&self, response: &Response) -> Observed<MediaType> {
        response.content_type().into()
    }
}

/// First value of an arbitrary header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderNavigator {
    name: HeaderName,
}

impl HeaderNavigator {
    pub fn new(name: HeaderName) -> Self {
        Self { name }
    }
}

impl Navigator for HeaderNavigator {
    type Attribute = Observed<String>;

    fn kind(&self) -> AttributeKind {
        AttributeKind::Header(self.name.clone())
    }

    fn attribute_of(&self, response: &Response) -> Observed<String> {
        response
            .headers()
            .get(&self.name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .into()
    }
}

pub fn series() -> SeriesNavigator {
    SeriesNavigator
}

pub fn status() -> StatusNavigator {
    StatusNavigator
}

pub fn content_type() -> ContentTypeNavigator {
    ContentTypeNavigator
}

pub fn header(name: HeaderName) -> HeaderNavigator {
    HeaderNavigator::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::{HeaderValue, CONTENT_TYPE};

    #[test]
    fn series_and_status() {
        let r = Response::new(StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(series().attribute_of(&r), Series::ServerError);
        assert_eq!(status().attribute_of(&r), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn content_type_strips_parameters() {
        let r = Response::new(StatusCode::OK).with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=UTF-8"),
        );
        assert_eq!(
            content_type().attribute_of(&r),
            Observed::Value(MediaType::application_json())
        );
    }

    #[test]
    fn missing_or_malformed_values_are_unknown() {
        let r = Response::new(StatusCode::OK)
            .with_header(CONTENT_TYPE, HeaderValue::from_static("garbage"));
        assert_eq!(content_type().attribute_of(&r), Observed::Unknown);
        assert_eq!(
            header(HeaderName::from_static("x-missing")).attribute_of(&r),
            Observed::Unknown
        );
    }

    #[test]
    fn header_returns_first_value() {
        let name = HeaderName::from_static("x-region");
        let r = Response::new(StatusCode::OK)
            .with_header(name.clone(), HeaderValue::from_static("eu"))
            .with_header(name.clone(), HeaderValue::from_static("us"));
        assert_eq!(
            header(name).attribute_of(&r),
            Observed::Value("eu".to_string())
        );
    }

    #[test]
    fn navigators_of_same_kind_are_equal() {
        assert_eq!(series(), SeriesNavigator);
        assert_eq!(
            header(HeaderName::from_static("x-a")),
            header(HeaderName::from_static("x-a"))
        );
        assert_ne!(
            header(HeaderName::from_static("x-a")).kind(),
            header(HeaderName::from_static("x-b")).kind()
        );
    }
}

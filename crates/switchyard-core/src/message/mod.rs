//! Request/response messages shared by dispatch and retry.
//!
//! Methods, status codes and header maps come from the `http` crate; header
//! lookup is case-insensitive and keeps every value in arrival order.

mod date;
mod request;
mod response;

pub use date::parse_http_date;
pub use request::{RequestArguments, RequestError};
pub use response::{MediaType, Response, Series};

pub use http::{header, HeaderMap, Method, StatusCode};

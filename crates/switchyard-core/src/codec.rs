//! Body codec collaborator.
//!
//! Routes that need a typed body go through a [`BodyCodec`]; the JSON codec is
//! the only one shipped here.

use serde::de::DeserializeOwned;

use crate::message::Response;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("unsupported content type {0}")]
    UnsupportedContentType(String),

    #[error("failed to decode body (status {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

pub trait BodyCodec: Send + Sync {
    fn decode<T: DeserializeOwned>(&self, response: &Response) -> Result<T, CodecError>;
}

/// Decodes `application/json`, `*/*+json`, or bodies without a content type.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl BodyCodec for JsonCodec {
    fn decode<T: DeserializeOwned>(&self, response: &Response) -> Result<T, CodecError> {
        if let Some(mt) = response.content_type() {
            let json = mt.subtype() == "json" || mt.subtype().ends_with("+json");
            if !json {
                return Err(CodecError::UnsupportedContentType(mt.to_string()));
            }
        }
        serde_json::from_slice(response.body()).map_err(|source| CodecError::Decode {
            status: response.status().as_u16(),
            source,
        })
    }
}

//! Terminal handlers.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use super::error::RouteError;
use crate::codec::BodyCodec;
use crate::message::Response;

/// Acts on a matched response. Errors are returned to the dispatch caller
/// unchanged.
pub trait Route: Send + Sync {
    fn execute(&self, response: &Response) -> Result<(), RouteError>;
}

/// Raised by [`retry()`]; the retry plugin treats the routed response as a
/// retryable failure.
#[derive(Debug, Clone, Copy, thiserror::Error)]
#[error("retry requested by route")]
pub struct RetryRequested;

#[derive(Debug, Clone, Copy, Default)]
pub struct PassRoute;

impl Route for PassRoute {
    fn execute(&self, _response: &Response) -> Result<(), RouteError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RetryRoute;

impl Route for RetryRoute {
    fn execute(&self, _response: &Response) -> Result<(), RouteError> {
        Err(Box::new(RetryRequested))
    }
}

pub struct CallRoute<F>(F);

impl<F, E> Route for CallRoute<F>
where
    F: Fn(&Response) -> Result<(), E> + Send + Sync,
    E: Into<RouteError>,
{
    fn execute(&self, response: &Response) -> Result<(), RouteError> {
        (self.0)(response).map_err(Into::into)
    }
}

pub struct DecodeRoute<T, C, F> {
    codec: C,
    consumer: F,
    _target: PhantomData<fn() -> T>,
}

impl<T, C, F, E> Route for DecodeRoute<T, C, F>
where
    T: DeserializeOwned,
    C: BodyCodec,
    F: Fn(T) -> Result<(), E> + Send + Sync,
    E: Into<RouteError>,
{
    fn execute(&self, response: &Response) -> Result<(), RouteError> {
        let value: T = self.codec.decode(response)?;
        (self.consumer)(value).map_err(Into::into)
    }
}

/// Accepts the response without reading it.
pub fn pass() -> PassRoute {
    PassRoute
}

/// Hands the routed response back to the retry plugin.
pub fn retry() -> RetryRoute {
    RetryRoute
}

pub fn call<F, E>(f: F) -> CallRoute<F>
where
    F: Fn(&Response) -> Result<(), E> + Send + Sync,
    E: Into<RouteError>,
{
    CallRoute(f)
}

/// Decodes the body into `T` with `codec` and passes it to `consumer`.
pub fn decode<T, C, F, E>(codec: C, consumer: F) -> DecodeRoute<T, C, F>
where
    T: DeserializeOwned,
    C: BodyCodec,
    F: Fn(T) -> Result<(), E> + Send + Sync,
    E: Into<RouteError>,
{
    DecodeRoute {
        codec,
        consumer,
        _target: PhantomData,
    }
}

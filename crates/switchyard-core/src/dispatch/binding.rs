//! Bindings: attribute value (or wildcard) paired with a handler.

use http::StatusCode;

use super::engine::Dispatcher;
use super::navigator::Observed;
use super::route::Route;
use crate::message::{MediaType, Series};

/// Either a terminal route or a nested level evaluated against the same
/// response.
pub enum Handler {
    Route(Box<dyn Route>),
    Dispatch(Box<dyn Dispatcher>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key<A> {
    Value(A),
    Wildcard,
}

pub struct Binding<A> {
    pub(super) key: Key<A>,
    pub(super) handler: Handler,
}

impl<A> Binding<A> {
    pub fn key(&self) -> &Key<A> {
        &self.key
    }
}

/// First half of a binding; finish it with [`call`](Self::call) or
/// [`dispatch`](Self::dispatch).
#[must_use]
pub struct BindingBuilder<A> {
    key: Key<A>,
}

impl<A> BindingBuilder<A> {
    pub fn call(self, route: impl Route + 'static) -> Binding<A> {
        Binding {
            key: self.key,
            handler: Handler::Route(Box::new(route)),
        }
    }

    pub fn dispatch(self, nested: impl Dispatcher + 'static) -> Binding<A> {
        Binding {
            key: self.key,
            handler: Handler::Dispatch(Box::new(nested)),
        }
    }
}

/// Binds an exact attribute value.
pub fn on<A>(value: impl Into<A>) -> BindingBuilder<A> {
    BindingBuilder {
        key: Key::Value(value.into()),
    }
}

/// Binds every value not bound exactly.
pub fn any<A>() -> BindingBuilder<A> {
    BindingBuilder { key: Key::Wildcard }
}

pub fn any_series() -> BindingBuilder<Series> {
    any()
}

pub fn any_status() -> BindingBuilder<StatusCode> {
    any()
}

pub fn any_content_type() -> BindingBuilder<Observed<MediaType>> {
    any()
}

//! Level evaluation.

use std::collections::HashMap;

use super::binding::{Binding, Handler, Key};
use super::error::{DispatchError, NoRouteMatched, RouteError, RoutingError};
use super::navigator::{AttributeKind, Navigator};
use crate::message::Response;

/// A routing level with its navigator type erased, so levels over different
/// attributes can nest.
pub trait Dispatcher: Send + Sync {
    fn kind(&self) -> AttributeKind;

    /// Evaluates this level (and any nested levels) against `response`.
    fn dispatch(&self, response: &Response) -> Result<(), DispatchError>;
}

/// One level of the routing tree: a navigator plus its bindings.
pub struct Dispatch<N: Navigator> {
    navigator: N,
    exact: HashMap<N::Attribute, Handler>,
    wildcard: Option<Handler>,
}

impl<N: Navigator> Dispatch<N> {
    /// Builds a level; each value may be bound once and at most one wildcard
    /// is allowed.
    pub fn new(navigator: N, bindings: Vec<Binding<N::Attribute>>) -> Result<Self, RoutingError> {
        let mut exact = HashMap::with_capacity(bindings.len());
        let mut wildcard = None;

        for binding in bindings {
            match binding.key {
                Key::Value(value) => {
                    if exact.contains_key(&value) {
                        return Err(RoutingError::DuplicateValue {
                            kind: navigator.kind(),
                            value: value.to_string(),
                        });
                    }
                    exact.insert(value, binding.handler);
                }
                Key::Wildcard => {
                    if wildcard.is_some() {
                        return Err(RoutingError::DuplicateWildcard(navigator.kind()));
                    }
                    wildcard = Some(binding.handler);
                }
            }
        }

        Ok(Self {
            navigator,
            exact,
            wildcard,
        })
    }

    /// Exact match first, then the wildcard.
    fn lookup(&self, value: &N::Attribute) -> Option<&Handler> {
        self.exact.get(value).or(self.wildcard.as_ref())
    }
}

impl<N: Navigator> Dispatcher for Dispatch<N> {
    fn kind(&self) -> AttributeKind {
        self.navigator.kind()
    }

    fn dispatch(&self, response: &Response) -> Result<(), DispatchError> {
        let value = self.navigator.attribute_of(response);

        let Some(handler) = self.lookup(&value) else {
            tracing::debug!("no binding for {} {}", self.navigator.kind(), value);
            return Err(DispatchError::NoRouteMatched(Box::new(NoRouteMatched {
                kind: self.navigator.kind(),
                value: value.to_string(),
                response: response.clone(),
            })));
        };

        match handler {
            Handler::Route(route) => route.execute(response).map_err(unwrap_internal),
            Handler::Dispatch(nested) => nested.dispatch(response),
        }
    }
}

/// Dispatch failures raised inside a route (e.g. a route that dispatches a
/// second tree) keep their own variant instead of becoming `Route` errors.
fn unwrap_internal(error: RouteError) -> DispatchError {
    let error = match error.downcast::<DispatchError>() {
        Ok(internal) => return *internal,
        Err(other) => other,
    };
    match error.downcast::<NoRouteMatched>() {
        Ok(no_route) => DispatchError::NoRouteMatched(no_route),
        Err(other) => DispatchError::Route(other),
    }
}

/// Routes `response` through the tree rooted at `routing`.
pub fn dispatch(response: &Response, routing: &dyn Dispatcher) -> Result<(), DispatchError> {
    routing.dispatch(response)
}

//! Response routing.
//!
//! A routing tree is built from levels. Each level pairs a [`Navigator`] with
//! bindings from attribute values to handlers. Evaluation at a level reads the
//! attribute, takes the exact binding if there is one and otherwise the
//! wildcard, then either runs the route or descends into the nested level.
//! A level with neither fails with [`NoRouteMatched`]; there is no implicit
//! default route.
//!
//! Evaluation is synchronous, performs no I/O and never mutates the response.

mod binding;
mod engine;
mod error;
mod navigator;
mod route;

pub use binding::{any, any_content_type, any_series, any_status, on, Binding, BindingBuilder, Handler, Key};
pub use engine::{dispatch, Dispatch, Dispatcher};
pub use error::{DispatchError, NoRouteMatched, RouteError, RoutingError};
pub use navigator::{
    content_type, header, series, status, AttributeKind, ContentTypeNavigator, HeaderNavigator,
    Navigator, Observed, SeriesNavigator, StatusNavigator,
};
pub use route::{call, decode, pass, retry, CallRoute, DecodeRoute, PassRoute, RetryRequested, RetryRoute, Route};

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
    use http::StatusCode;

    use super::*;
    use crate::message::{MediaType, Response, Series};

    fn counter() -> (Arc<AtomicUsize>, impl Route + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let route = call(move |_: &Response| {
            h.fetch_add(1, Ordering::SeqCst);
            Ok::<(), RouteError>(())
        });
        (hits, route)
    }

    #[test]
    fn exact_match_wins_over_wildcard() {
        let (exact_hits, exact) = counter();
        let (wild_hits, wild) = counter();
        let tree = Dispatch::new(
            series(),
            vec![any_series().call(wild), on(Series::Successful).call(exact)],
        )
        .unwrap();

        dispatch(&Response::new(StatusCode::OK), &tree).unwrap();
        assert_eq!(exact_hits.load(Ordering::SeqCst), 1);
        assert_eq!(wild_hits.load(Ordering::SeqCst), 0);

        dispatch(&Response::new(StatusCode::NOT_FOUND), &tree).unwrap();
        assert_eq!(wild_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nested_dispatch_uses_same_response() {
        let (hits, route) = counter();
        let tree = Dispatch::new(
            series(),
            vec![
                on(Series::Successful).call(pass()),
                any_series().dispatch(
                    Dispatch::new(
                        status(),
                        vec![on(StatusCode::SERVICE_UNAVAILABLE).call(route)],
                    )
                    .unwrap(),
                ),
            ],
        )
        .unwrap();

        dispatch(&Response::new(StatusCode::SERVICE_UNAVAILABLE), &tree).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_binding_reports_level_kind_and_value() {
        let tree = Dispatch::new(
            series(),
            vec![
                on(Series::Successful).call(pass()),
                on(Series::ServerError).dispatch(
                    Dispatch::new(status(), vec![on(StatusCode::BAD_GATEWAY).call(pass())])
                        .unwrap(),
                ),
            ],
        )
        .unwrap();

        let err = dispatch(&Response::new(StatusCode::SERVICE_UNAVAILABLE), &tree).unwrap_err();
        let no_route = err.no_route().expect("no route");
        assert_eq!(no_route.kind, AttributeKind::Status);
        assert_eq!(no_route.value, StatusCode::SERVICE_UNAVAILABLE.to_string());
        assert_eq!(no_route.response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let err = dispatch(&Response::new(StatusCode::NOT_FOUND), &tree).unwrap_err();
        let no_route = err.no_route().expect("no route");
        assert_eq!(no_route.kind, AttributeKind::Series);
        assert_eq!(no_route.value, "4xx");
    }

    #[test]
    fn wildcard_at_every_level_always_routes() {
        let tree = Dispatch::new(
            series(),
            vec![any_series().dispatch(
                Dispatch::new(
                    content_type(),
                    vec![any_content_type().dispatch(
                        Dispatch::new(status(), vec![any_status().call(pass())]).unwrap(),
                    )],
                )
                .unwrap(),
            )],
        )
        .unwrap();

        for code in [100u16, 200, 204, 301, 404, 500, 503, 799] {
            let response = Response::new(StatusCode::from_u16(code).unwrap());
            assert!(dispatch(&response, &tree).is_ok(), "status {}", code);
        }
    }

    #[test]
    fn content_type_and_header_levels() {
        let (json_hits, json) = counter();
        let (beta_hits, beta) = counter();
        let region = HeaderName::from_static("x-region");
        let tree = Dispatch::new(
            content_type(),
            vec![
                on(MediaType::application_json()).call(json),
                any_content_type().dispatch(
                    Dispatch::new(
                        header(region.clone()),
                        vec![on("beta").call(beta), any().call(pass())],
                    )
                    .unwrap(),
                ),
            ],
        )
        .unwrap();

        let json_response = Response::new(StatusCode::OK).with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        dispatch(&json_response, &tree).unwrap();
        assert_eq!(json_hits.load(Ordering::SeqCst), 1);

        let beta_response =
            Response::new(StatusCode::OK).with_header(region, HeaderValue::from_static("beta"));
        dispatch(&beta_response, &tree).unwrap();
        assert_eq!(beta_hits.load(Ordering::SeqCst), 1);

        dispatch(&Response::new(StatusCode::OK), &tree).unwrap();
        assert_eq!(beta_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_content_type_can_be_bound_explicitly() {
        let (hits, route) = counter();
        let tree = Dispatch::new(
            content_type(),
            vec![on(Observed::Unknown).call(route)],
        )
        .unwrap();
        dispatch(&Response::new(StatusCode::OK), &tree).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn route_error_is_distinct_from_no_route() {
        #[derive(Debug, thiserror::Error)]
        #[error("handler exploded")]
        struct Exploded;

        let tree = Dispatch::new(
            status(),
            vec![on(StatusCode::OK).call(call(|_: &Response| Err::<(), _>(Exploded)))],
        )
        .unwrap();

        match dispatch(&Response::new(StatusCode::OK), &tree) {
            Err(DispatchError::Route(e)) => assert!(e.is::<Exploded>()),
            other => panic!("expected route error, got {:?}", other),
        }
    }

    #[test]
    fn no_route_raised_inside_route_keeps_its_variant() {
        let inner = Arc::new(
            Dispatch::new(status(), vec![on(StatusCode::CREATED).call(pass())]).unwrap(),
        );
        let tree = Dispatch::new(
            series(),
            vec![any_series().call(call(move |r: &Response| inner.dispatch(r)))],
        )
        .unwrap();

        let err = dispatch(&Response::new(StatusCode::OK), &tree).unwrap_err();
        assert!(err.no_route().is_some());
    }

    #[test]
    fn retry_route_is_recognised() {
        let tree = Dispatch::new(status(), vec![any_status().call(retry())]).unwrap();
        let err = dispatch(&Response::new(StatusCode::SERVICE_UNAVAILABLE), &tree).unwrap_err();
        assert!(err.is_retry_requested());
    }

    #[test]
    fn duplicate_bindings_are_rejected() {
        let err = Dispatch::new(
            series(),
            vec![
                on(Series::Successful).call(pass()),
                on(Series::Successful).call(pass()),
            ],
        )
        .err()
        .unwrap();
        assert_eq!(
            err,
            RoutingError::DuplicateValue {
                kind: AttributeKind::Series,
                value: "2xx".to_string()
            }
        );

        let err = Dispatch::new(status(), vec![any().call(pass()), any().call(pass())])
            .err()
            .unwrap();
        assert_eq!(err, RoutingError::DuplicateWildcard(AttributeKind::Status));
    }
}

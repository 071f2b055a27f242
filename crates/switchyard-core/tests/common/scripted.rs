//! Scripted transport for integration tests.
//!
//! Replays a queue of canned responses or failures in order and records every
//! request it receives. An exhausted script fails the attempt with a
//! non-retryable transport error.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use switchyard_core::message::{header, RequestArguments, Response, StatusCode};
use switchyard_core::transport::{Transport, TransportError, TransportErrorKind};

pub enum Step {
    Respond(Response),
    Fail(TransportError),
    /// Never completes; used to observe cancellation of an in-flight attempt.
    Hang,
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    steps: Arc<Mutex<VecDeque<Step>>>,
    requests: Arc<Mutex<Vec<RequestArguments>>>,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: Arc::new(Mutex::new(steps.into_iter().collect())),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<RequestArguments> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, arguments: &RequestArguments) -> Result<Response, TransportError> {
        self.requests.lock().unwrap().push(arguments.clone());
        let step = self.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::Fail(error)) => Err(error),
            Some(Step::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransportError::timeout("scripted hang elapsed"))
            }
            None => Err(TransportError::new(
                TransportErrorKind::Other,
                "script exhausted",
            )),
        }
    }
}

pub fn status(code: u16) -> Step {
    Step::Respond(Response::new(StatusCode::from_u16(code).unwrap()))
}

pub fn status_with_retry_after(code: u16, retry_after: &'static str) -> Step {
    Step::Respond(Response::new(StatusCode::from_u16(code).unwrap()).with_header(
        header::RETRY_AFTER,
        header::HeaderValue::from_static(retry_after),
    ))
}

pub fn json(body: &str) -> Step {
    Step::Respond(
        Response::new(StatusCode::OK)
            .with_header(
                header::CONTENT_TYPE,
                header::HeaderValue::from_static("application/json"),
            )
            .with_body(body.to_string()),
    )
}

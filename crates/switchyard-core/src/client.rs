//! Client: transport, optional retry plugin and response routing composed
//! into one call.

use url::Url;

use crate::config::SwitchyardConfig;
use crate::control::CallControl;
use crate::dispatch::Dispatcher;
use crate::message::{RequestArguments, Response};
use crate::retry::{CallError, Failure, RetryPlugin};
use crate::transport::Transport;

pub struct Client<T> {
    transport: T,
    base_url: Option<Url>,
    retry: Option<RetryPlugin>,
}

impl<T: Transport> Client<T> {
    /// No base URL and no retries.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            base_url: None,
            retry: None,
        }
    }

    /// Builds a client from `base_url`, `[retry]` and `[idempotency]`.
    pub fn from_config(transport: T, config: &SwitchyardConfig) -> Result<Self, url::ParseError> {
        let mut client = Self::new(transport);
        if let Some(base) = &config.base_url {
            client = client.with_base_url(Url::parse(base)?);
        }
        if let Some(retry) = &config.retry {
            let idempotency = config.idempotency.clone().unwrap_or_default();
            client = client.with_retry(
                RetryPlugin::new(retry.to_policy()).with_chain(idempotency.to_chain()),
            );
        }
        Ok(client)
    }

    /// Applied to requests that carry no base URL of their own.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn with_retry(mut self, plugin: RetryPlugin) -> Self {
        self.retry = Some(plugin);
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes `arguments` and routes the response through `routing`.
    ///
    /// Each attempt runs the transport, lets the retry plugin claim retryable
    /// statuses, then dispatches. A `retry()` route turns the response into a
    /// retryable failure. On success the routed response is returned.
    pub async fn call(
        &self,
        arguments: &RequestArguments,
        routing: &dyn Dispatcher,
        control: &CallControl,
    ) -> Result<Response, CallError> {
        let arguments = match (&self.base_url, arguments.base_url()) {
            (Some(base), None) => arguments.with_base_url(base.clone()),
            _ => arguments.clone(),
        };

        match &self.retry {
            Some(plugin) => {
                plugin
                    .run(&arguments, control, || self.attempt(&arguments, routing))
                    .await
            }
            None => {
                if control.is_cancelled() {
                    return Err(CallError::Cancelled);
                }
                tokio::select! {
                    biased;
                    _ = control.cancelled() => Err(CallError::Cancelled),
                    outcome = self.attempt(&arguments, routing) => outcome.map_err(CallError::Failed),
                }
            }
        }
    }

    async fn attempt(
        &self,
        arguments: &RequestArguments,
        routing: &dyn Dispatcher,
    ) -> Result<Response, Failure> {
        let response = self.transport.execute(arguments).await?;
        let response = match &self.retry {
            Some(plugin) => plugin.check_status(arguments, response)?,
            None => response,
        };
        match routing.dispatch(&response) {
            Ok(()) => Ok(response),
            Err(e) if e.is_retry_requested() => Err(Failure::RetryRequested(response)),
            Err(e) => Err(Failure::Dispatch(e)),
        }
    }
}

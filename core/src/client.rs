//! The GraphQL client: build, dispatch, classify, complete.
//!
//! # Design
//! `GraphQLClient` holds only the endpoint URL, a `Dispatcher`, and a
//! `RequestBuilder`, none of which change after construction, so one client
//! can serve any number of concurrent requests. `send` wires the three steps
//! together and guards the caller's completion with a `CompletionToken` so it
//! runs exactly once, or never if `cancel` wins.

use std::sync::Arc;

use crate::cancel::{CompletionToken, RequestHandle};
use crate::config::ClientConfig;
use crate::dispatch::{Dispatcher, UreqDispatcher};
use crate::error::ClientResult;
use crate::http::HttpRequest;
use crate::operation::GraphQLOperation;
use crate::request::{JsonRequestBuilder, RequestBuilder};
use crate::response::handle_response;
use crate::types::GraphQLResponse;

/// Client for a single GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphQLClient<D, B = JsonRequestBuilder> {
    url: Arc<str>,
    dispatcher: D,
    builder: B,
}

impl GraphQLClient<UreqDispatcher> {
    /// Client backed by `UreqDispatcher` with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self::from_config(&ClientConfig::new(url))
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        GraphQLClient::with_dispatcher(config.url.as_str(), UreqDispatcher::new(config))
    }
}

impl<D: Dispatcher> GraphQLClient<D> {
    pub fn with_dispatcher(url: impl Into<String>, dispatcher: D) -> Self {
        let url: String = url.into();
        Self {
            url: Arc::from(url),
            dispatcher,
            builder: JsonRequestBuilder,
        }
    }
}

impl<D: Dispatcher, B: RequestBuilder> GraphQLClient<D, B> {
    /// Replace the request builder, e.g. to add auth headers.
    pub fn with_request_builder<B2: RequestBuilder>(self, builder: B2) -> GraphQLClient<D, B2> {
        GraphQLClient {
            url: self.url,
            dispatcher: self.dispatcher,
            builder,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    /// The request `send` would dispatch for `operation`.
    pub fn build_request<Op: GraphQLOperation>(&self, operation: &Op) -> HttpRequest {
        self.builder.build(&self.url, operation)
    }

    /// Send `operation` and invoke `completion` exactly once with the result.
    ///
    /// If the returned handle is cancelled before the outcome arrives,
    /// `completion` is never invoked.
    pub fn send<Op, F>(&self, operation: Op, completion: F) -> RequestHandle<D::Handle>
    where
        Op: GraphQLOperation,
        F: FnOnce(ClientResult<GraphQLResponse<Op>>) + Send + 'static,
    {
        let request = self.build_request(&operation);
        let token = Arc::new(CompletionToken::default());
        let pending = Arc::clone(&token);

        tracing::debug!(url = %self.url, "dispatching GraphQL request");
        let inner = self.dispatcher.dispatch(
            request,
            Box::new(move |outcome| {
                if pending.is_cancelled() {
                    tracing::trace!("outcome dropped, request was cancelled");
                    return;
                }
                let result = handle_response(outcome, operation);
                if pending.complete() {
                    completion(result);
                } else {
                    tracing::trace!("completion suppressed, request was cancelled");
                }
            }),
        );

        RequestHandle::new(token, inner)
    }
}

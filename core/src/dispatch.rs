//! Dispatchers execute built requests and report a `RawOutcome`.
//!
//! # Design
//! A `Dispatcher` owns whatever concurrency it needs and calls `on_outcome`
//! at most once, from any thread. The returned handle is advisory: cancelling
//! it asks the dispatcher to give up, and the client's completion token is
//! what guarantees no callback runs afterwards.
//!
//! `UreqDispatcher` runs each request on its own named thread with a
//! blocking `ureq` agent. A blocking call cannot be interrupted, so cancelling
//! only skips requests that have not started yet. Response bodies are read in
//! full with no size limit; any received response is data for the handler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::cancel::Cancellable;
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RawOutcome};

/// Invoked once with the outcome of a dispatched request.
pub type OutcomeCallback = Box<dyn FnOnce(RawOutcome) + Send + 'static>;

/// Executes HTTP requests on behalf of `GraphQLClient`.
pub trait Dispatcher: Send + Sync {
    type Handle: Cancellable;

    fn dispatch(&self, request: HttpRequest, on_outcome: OutcomeCallback) -> Self::Handle;
}

/// Name given to every worker thread spawned by `UreqDispatcher`.
pub const DISPATCH_THREAD_NAME: &str = "graphql-dispatch";

/// Thread-per-request dispatcher backed by `ureq`.
///
/// Every in-flight request holds one OS thread until its blocking call
/// returns, so the number of threads tracks the number of outstanding
/// requests. Hosts that need a bound should supply their own `Dispatcher`.
#[derive(Clone)]
pub struct UreqDispatcher {
    agent: ureq::Agent,
}

impl UreqDispatcher {
    pub fn new(config: &ClientConfig) -> Self {
        // Statuses are data here; the response handler classifies them.
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout_duration())
            .build()
            .new_agent();
        Self { agent }
    }
}

/// Cancellation flag shared with the worker thread.
#[derive(Debug, Clone, Default)]
pub struct UreqHandle {
    abandoned: Arc<AtomicBool>,
}

impl UreqHandle {
    pub fn is_abandoned(&self) -> bool {
        self.abandoned.load(Ordering::Acquire)
    }
}

impl Cancellable for UreqHandle {
    fn cancel(&self) {
        self.abandoned.store(true, Ordering::Release);
    }
}

impl Dispatcher for UreqDispatcher {
    type Handle = UreqHandle;

    fn dispatch(&self, request: HttpRequest, on_outcome: OutcomeCallback) -> UreqHandle {
        let handle = UreqHandle::default();
        let worker = handle.clone();
        let agent = self.agent.clone();
        let slot = Arc::new(Mutex::new(Some(on_outcome)));
        let worker_slot = Arc::clone(&slot);

        let spawned = thread::Builder::new()
            .name(DISPATCH_THREAD_NAME.to_string())
            .spawn(move || {
                let Some(on_outcome) = take_callback(&worker_slot) else {
                    return;
                };
                if worker.is_abandoned() {
                    tracing::trace!(url = %request.url, "request abandoned before start");
                    return;
                }
                on_outcome(execute(&agent, request));
            });

        if let Err(err) = spawned {
            tracing::debug!(error = %err, "failed to spawn dispatch thread");
            if let Some(on_outcome) = take_callback(&slot) {
                on_outcome(Err(TransportError::new(err)));
            }
        }

        handle
    }
}

fn take_callback(slot: &Mutex<Option<OutcomeCallback>>) -> Option<OutcomeCallback> {
    let mut guard = slot.lock().ok()?;
    guard.take()
}

fn execute(agent: &ureq::Agent, request: HttpRequest) -> RawOutcome {
    let mut builder = match request.method {
        HttpMethod::Post => agent.post(request.url.as_str()),
    };
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    let mut response = builder.send(&request.body[..]).map_err(TransportError::new)?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            let value = value.to_str().ok()?;
            Some((name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(TransportError::new)?;
    tracing::debug!(url = %request.url, status, bytes = body.len(), "received HTTP response");

    Ok(HttpResponse {
        status,
        headers,
        body: (!body.is_empty()).then_some(body),
    })
}

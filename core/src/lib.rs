//! GraphQL-over-HTTP transport core.
//!
//! # Overview
//! Serializes an operation into an HTTP POST, hands it to a `Dispatcher`,
//! classifies what comes back, and invokes a completion callback exactly once
//! with either a decoded `GraphQLResponse` or a `ClientError`. The handle
//! returned by `GraphQLClient::send` can cancel the request, in which case
//! the callback never runs.
//!
//! # Design
//! - `request` builds requests and `response` classifies outcomes; both are
//!   pure and never touch the network.
//! - `dispatch` is the only I/O seam. `UreqDispatcher` is the stock
//!   implementation; tests and hosts plug in their own.
//! - `cancel` holds the atomic token that settles completion/cancel races.
//! - Per-operation decoding is a trait method on `GraphQLOperation`, resolved
//!   at compile time.

pub mod cancel;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod operation;
pub mod request;
pub mod response;
pub mod types;

pub use cancel::{Cancellable, RequestHandle};
pub use client::GraphQLClient;
pub use config::ClientConfig;
pub use dispatch::{Dispatcher, OutcomeCallback, UreqDispatcher, UreqHandle, DISPATCH_THREAD_NAME};
pub use error::{ClientError, ClientResult, DecodeError, ResponseError, ResponseErrorKind, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RawOutcome};
pub use operation::GraphQLOperation;
pub use request::{build_request, JsonRequestBuilder, RequestBuilder};
pub use response::handle_response;
pub use types::{GraphQLError, GraphQLResponse, JsonObject, SourceLocation};

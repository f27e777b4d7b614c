//! Response envelope types.
//!
//! # Design
//! `GraphQLResponse` pairs the operation that was sent with the root JSON
//! object the server returned, plus the pieces the operation decoded out of it.
//! Ownership passes to the completion callback; nothing here is shared.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::operation::GraphQLOperation;

/// A JSON object, used for variable mappings and response roots.
pub type JsonObject = serde_json::Map<String, Value>;

/// A single entry of the `errors` array of a GraphQL response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<SourceLocation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<JsonObject>,
}

/// Line and column inside the query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

/// The decoded result of a GraphQL operation.
#[derive(Debug)]
pub struct GraphQLResponse<Op: GraphQLOperation> {
    /// The operation this response answers.
    pub operation: Op,
    /// The root JSON object exactly as received.
    pub body: JsonObject,
    /// Decoded `data`; `None` when absent or `null`.
    pub data: Option<Op::Data>,
    pub errors: Vec<GraphQLError>,
    pub extensions: Option<JsonObject>,
}

impl<Op: GraphQLOperation> GraphQLResponse<Op> {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

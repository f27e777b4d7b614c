//! The operation trait: query text, variables, and a per-operation decoder.
//!
//! Decoding is resolved at compile time through `GraphQLOperation::decode`.
//! The default implementation reads the standard `data` / `errors` /
//! `extensions` members with serde; operations with unusual payloads override it.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DecodeError;
use crate::types::{GraphQLError, GraphQLResponse, JsonObject};

/// A GraphQL query or mutation that can be sent by `GraphQLClient`.
///
/// ```ignore
/// struct TodoById { id: String }
///
/// impl GraphQLOperation for TodoById {
///     type Data = TodoByIdData;
///
///     fn query_document(&self) -> &'static str {
///         "query TodoById($id: ID!) { todo(id: $id) { id title completed } }"
///     }
///
///     fn variables(&self) -> JsonObject {
///         let mut vars = JsonObject::new();
///         vars.insert("id".into(), self.id.clone().into());
///         vars
///     }
/// }
/// ```
pub trait GraphQLOperation: Sized + Send + 'static {
    /// Shape of the `data` member on success.
    type Data: DeserializeOwned;

    /// The static query document text.
    fn query_document(&self) -> &'static str;

    /// Variable mapping sent alongside the document.
    fn variables(&self) -> JsonObject {
        JsonObject::new()
    }

    /// Turn the parsed root object into a response envelope for this operation.
    fn decode(self, root: JsonObject) -> Result<GraphQLResponse<Self>, DecodeError> {
        let data = match root.get("data") {
            None | Some(Value::Null) => None,
            Some(value) => Some(<Self::Data as Deserialize>::deserialize(value)?),
        };
        let errors = match root.get("errors") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => Vec::<GraphQLError>::deserialize(value)?,
        };
        let extensions = root.get("extensions").and_then(Value::as_object).cloned();

        Ok(GraphQLResponse {
            operation: self,
            body: root,
            data,
            errors,
            extensions,
        })
    }
}

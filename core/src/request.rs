//! Request construction.
//!
//! # Design
//! `RequestBuilder` is the seam for customizing outgoing requests. The default
//! `JsonRequestBuilder` produces a POST with a single `Content-Type` header and
//! a `{"query", "variables"}` body. Callers that need auth or custom headers
//! wrap it with their own builder; the client never adds headers by itself.

use serde::Serialize;

use crate::http::{HttpMethod, HttpRequest};
use crate::operation::GraphQLOperation;
use crate::types::JsonObject;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

/// Turns an operation into an `HttpRequest` for the given endpoint.
pub trait RequestBuilder: Send + Sync {
    fn build<Op: GraphQLOperation>(&self, url: &str, operation: &Op) -> HttpRequest;
}

/// The stock builder: JSON body, `Content-Type: application/json`, nothing else.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRequestBuilder;

impl RequestBuilder for JsonRequestBuilder {
    fn build<Op: GraphQLOperation>(&self, url: &str, operation: &Op) -> HttpRequest {
        build_request(url, operation)
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    query: &'a str,
    variables: &'a JsonObject,
}

/// Build the POST request for `operation`.
///
/// # Panics
/// If the body fails to serialize. Variables are a `serde_json` map, so this
/// only happens on a broken serializer, never on caller input.
pub fn build_request<Op: GraphQLOperation>(url: &str, operation: &Op) -> HttpRequest {
    let variables = operation.variables();
    let body = RequestBody {
        query: operation.query_document(),
        variables: &variables,
    };
    let body = serde_json::to_vec(&body).expect("GraphQL request body is always serializable");
    tracing::trace!(url, bytes = body.len(), "built GraphQL request");

    HttpRequest {
        method: HttpMethod::Post,
        url: url.to_string(),
        headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
        body,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    struct AddTodo {
        title: &'static str,
    }

    impl GraphQLOperation for AddTodo {
        type Data = Value;

        fn query_document(&self) -> &'static str {
            "mutation AddTodo($title: String!) { createTodo(title: $title) { id } }"
        }

        fn variables(&self) -> JsonObject {
            let mut vars = JsonObject::new();
            vars.insert("title".into(), self.title.into());
            vars.insert("priority".into(), json!(2));
            vars.insert("tags".into(), json!(["home", null]));
            vars.insert("meta".into(), json!({ "source": "test" }));
            vars
        }
    }

    struct Ping;

    impl GraphQLOperation for Ping {
        type Data = Value;

        fn query_document(&self) -> &'static str {
            "{ ping }"
        }
    }

    #[test]
    fn build_produces_post_with_json_body() {
        let op = AddTodo { title: "Buy milk" };
        let req = build_request("http://localhost:4000/graphql", &op);

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:4000/graphql");
        assert_eq!(
            req.headers,
            vec![("Content-Type".to_string(), "application/json".to_string())]
        );

        let body: Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(
            body,
            json!({
                "query": op.query_document(),
                "variables": Value::Object(op.variables()),
            })
        );
    }

    #[test]
    fn variables_keep_their_json_types() {
        let req = build_request("http://localhost/graphql", &AddTodo { title: "x" });
        let body: Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(body["variables"]["priority"], 2);
        assert_eq!(body["variables"]["tags"][1], Value::Null);
        assert_eq!(body["variables"]["meta"]["source"], "test");
    }

    #[test]
    fn operation_without_variables_sends_empty_object() {
        let req = JsonRequestBuilder.build("http://localhost/graphql", &Ping);
        let body: Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(body, json!({ "query": "{ ping }", "variables": {} }));
        assert_eq!(req.header("content-type"), Some("application/json"));
    }
}

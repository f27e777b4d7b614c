//! Classification of a raw outcome into a GraphQL result or an error.
//!
//! The first matching rule wins:
//! 1. transport failure, passed through unchanged
//! 2. non-2xx status, `ErrorResponse` with the raw body kept verbatim
//! 3. 2xx without a body, `InvalidResponse`
//! 4. 2xx whose body is not a JSON object, `InvalidResponse` (body kept)
//! 5. anything else is handed to the operation's decoder
//!
//! Nothing here logs or retries; every error goes back to the caller.

use serde_json::Value;

use crate::error::{ClientResult, ResponseError, ResponseErrorKind};
use crate::http::RawOutcome;
use crate::operation::GraphQLOperation;
use crate::types::{GraphQLResponse, JsonObject};

/// Classify `outcome` and decode it for `operation`.
pub fn handle_response<Op: GraphQLOperation>(
    outcome: RawOutcome,
    operation: Op,
) -> ClientResult<GraphQLResponse<Op>> {
    let response = outcome?;

    if !response.is_success() {
        return Err(ResponseError::new(ResponseErrorKind::ErrorResponse, response).into());
    }

    let root = match response.body.as_deref() {
        Some(body) => parse_root_object(body),
        None => None,
    };
    match root {
        Some(root) => Ok(operation.decode(root)?),
        None => Err(ResponseError::new(ResponseErrorKind::InvalidResponse, response).into()),
    }
}

fn parse_root_object(body: &[u8]) -> Option<JsonObject> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(root)) => Some(root),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::error::{ClientError, DecodeError, TransportError};
    use crate::http::HttpResponse;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Greeting {
        hello: String,
    }

    #[derive(Debug)]
    struct Hello;

    impl GraphQLOperation for Hello {
        type Data = Greeting;

        fn query_document(&self) -> &'static str {
            "{ hello }"
        }
    }

    #[derive(Debug)]
    struct Strict;

    impl GraphQLOperation for Strict {
        type Data = Value;

        fn query_document(&self) -> &'static str {
            "{ strict }"
        }

        fn decode(self, _root: JsonObject) -> Result<GraphQLResponse<Self>, DecodeError> {
            Err(DecodeError::Custom("strict decoder refused".into()))
        }
    }

    fn ok(status: u16, body: Option<&str>) -> RawOutcome {
        Ok(HttpResponse {
            status,
            headers: vec![("content-type".into(), "application/json".into())],
            body: body.map(|b| b.as_bytes().to_vec()),
        })
    }

    fn response_error(result: ClientResult<GraphQLResponse<Hello>>) -> ResponseError {
        match result {
            Err(ClientError::Response(err)) => err,
            other => panic!("expected response error, got {other:?}"),
        }
    }

    #[test]
    fn success_decodes_into_envelope() {
        for status in [200, 201, 204, 299] {
            let response = handle_response(ok(status, Some(r#"{"data":{"hello":"world"}}"#)), Hello).unwrap();
            assert_eq!(response.data, Some(Greeting { hello: "world".into() }));
            assert!(response.errors.is_empty());
        }
    }

    #[test]
    fn transport_error_is_passed_through() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        let err = handle_response(Err(TransportError::new(io)), Hello).unwrap_err();
        let ClientError::Transport(err) = err else {
            panic!("expected transport error");
        };
        let io = err.into_inner().downcast::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::TimedOut);
    }

    #[test]
    fn non_success_status_keeps_raw_body() {
        for status in [100, 301, 400, 404, 500, 503] {
            let err = response_error(handle_response(ok(status, Some("{not json")), Hello));
            assert_eq!(err.kind(), ResponseErrorKind::ErrorResponse);
            assert_eq!(err.status(), status);
            assert_eq!(err.body(), Some(&b"{not json"[..]));
        }
    }

    #[test]
    fn non_success_status_without_body() {
        let err = response_error(handle_response(ok(502, None), Hello));
        assert_eq!(err.kind(), ResponseErrorKind::ErrorResponse);
        assert!(err.body().is_none());
    }

    #[test]
    fn missing_body_is_invalid() {
        let err = response_error(handle_response(ok(200, None), Hello));
        assert_eq!(err.kind(), ResponseErrorKind::InvalidResponse);
        assert!(err.body().is_none());
        assert_eq!(err.to_string(), "Received invalid response (200 OK): Empty response body");
    }

    #[test]
    fn malformed_or_non_object_json_is_invalid() {
        for body in ["not json", "[1,2,3]", "42", "\"text\"", "null"] {
            let err = response_error(handle_response(ok(200, Some(body)), Hello));
            assert_eq!(err.kind(), ResponseErrorKind::InvalidResponse, "body {body}");
            assert_eq!(err.body(), Some(body.as_bytes()));
        }
    }

    #[test]
    fn decoder_failure_is_passed_through() {
        let err = handle_response(ok(200, Some(r#"{"data":{}}"#)), Strict).unwrap_err();
        match err {
            ClientError::Decode(DecodeError::Custom(msg)) => assert_eq!(msg, "strict decoder refused"),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}

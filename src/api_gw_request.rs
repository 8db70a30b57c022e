use crate::Error;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// The gateway event with fields of interest. It covers both envelope shapes:
/// * HTTP API (payload v2) and Function URL events with `requestContext.http.method` and `rawPath`
/// * REST API (payload v1) events with `httpMethod` and `path`
///
/// See `samples/http_api_event.json` and `samples/rest_api_event.json` for full examples.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiGatewayRequest {
    pub request_context: Option<inner_types::ApiGatewayRequestContext>,
    pub http_method: Option<String>,
    pub raw_path: Option<String>,
    pub path: Option<String>,
    /// Values are kept as-is, even if they are not strings
    pub headers: Option<Map<String, Value>>,
    /// Anything other than an object is treated as no parameters
    pub query_string_parameters: Option<Value>,
    /// Anything other than a string is treated as no body
    pub body: Option<Value>,
    pub is_base64_encoded: Option<bool>,
}

/// A wrapper for inner types that are unlikely to be used on their own to hide them from IDE prompts.
pub(crate) mod inner_types {
    use serde::Deserialize;

    /// An inner member of ApiGatewayRequest. REST API events have no `http` member.
    #[derive(Deserialize, Debug, Default)]
    #[serde(rename_all = "camelCase")]
    pub(crate) struct ApiGatewayRequestContext {
        pub http: Option<ApiGatewayRequestContextHttp>,
    }

    /// An inner member of ApiGatewayRequestContext
    #[derive(Deserialize, Debug, Default)]
    #[serde(rename_all = "camelCase")]
    pub(crate) struct ApiGatewayRequestContextHttp {
        pub method: Option<String>,
    }
}

/// A shape-independent view of the incoming request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Request {
    /// Always upper-case
    pub method: String,
    pub path: String,
    /// Header names are lower-case, the values are passed through unchanged
    pub headers: HashMap<String, Value>,
    pub query: HashMap<String, Value>,
    /// Base64-decoded, if the gateway encoded it
    pub body: Vec<u8>,
    /// Only present for `application/json` bodies that parse
    pub json: Option<Value>,
}

impl Request {
    pub const DEFAULT_METHOD: &'static str = "GET";
    pub const DEFAULT_PATH: &'static str = "/";

    /// Converts a raw Lambda event into a `Request`. Missing fields get their default values.
    /// Returns an error if the event is not an object, the method, path or header map have an unexpected type
    /// or the body is not valid base64.
    pub(crate) fn from_event(event: Value) -> Result<Self, Error> {
        let api_request = serde_json::from_value::<ApiGatewayRequest>(event)?;
        Self::from_api_request(api_request)
    }

    pub(crate) fn from_api_request(api_request: ApiGatewayRequest) -> Result<Self, Error> {
        // HTTP API / Function URL method takes precedence over REST API
        let http_api_method = api_request
            .request_context
            .and_then(|ctx| ctx.http)
            .and_then(|http| http.method);
        let method = first_non_empty(http_api_method, api_request.http_method)
            .unwrap_or_else(|| Self::DEFAULT_METHOD.to_owned())
            .to_uppercase();

        let path = first_non_empty(api_request.raw_path, api_request.path).unwrap_or_else(|| Self::DEFAULT_PATH.to_owned());

        let headers = api_request
            .headers
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect::<HashMap<String, Value>>();

        let query = match api_request.query_string_parameters {
            Some(Value::Object(v)) => v.into_iter().collect::<HashMap<String, Value>>(),
            Some(Value::Null) | None => HashMap::new(),
            Some(v) => {
                debug!("Ignored non-object query string parameters: {}", v);
                HashMap::new()
            }
        };

        let body = match api_request.body {
            Some(Value::String(v)) if !v.is_empty() && api_request.is_base64_encoded.unwrap_or_default() => {
                base64::decode(v)?
            }
            Some(Value::String(v)) => v.into_bytes(),
            Some(Value::Null) | None => Vec::new(),
            Some(v) => {
                debug!("Ignored non-string body: {}", v);
                Vec::new()
            }
        };

        let json = parse_json_body(&headers, &body);

        Ok(Request {
            method,
            path,
            headers,
            query,
            body,
            json,
        })
    }
}

/// Returns the first value that is neither missing nor an empty string.
fn first_non_empty(preferred: Option<String>, fallback: Option<String>) -> Option<String> {
    preferred.filter(|v| !v.is_empty()).or(fallback.filter(|v| !v.is_empty()))
}

/// Parses the body if the content type is JSON. Any parsing errors are logged and ignored.
fn parse_json_body(headers: &HashMap<String, Value>, body: &[u8]) -> Option<Value> {
    let content_type = headers.get("content-type").and_then(Value::as_str).unwrap_or_default();
    if !content_type.contains("application/json") || body.is_empty() {
        return None;
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!("Invalid JSON body: {}", e);
            None
        }
    }
}

#[test]
fn http_api_sample() {
    let event: Value = serde_json::from_str(include_str!("../samples/http_api_event.json")).unwrap();
    let req = Request::from_event(event).unwrap();

    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/echo");
    assert_eq!(req.headers["content-type"], "application/json");
    assert_eq!(req.headers["x-requested-with"], "XMLHttpRequest");
    assert_eq!(req.query["verbose"], "1");
    assert_eq!(req.body, br#"{"a":1}"#.to_vec());
    assert_eq!(req.json, Some(serde_json::json!({"a": 1})));
}

#[test]
fn rest_api_sample() {
    let event: Value = serde_json::from_str(include_str!("../samples/rest_api_event.json")).unwrap();
    let req = Request::from_event(event).unwrap();

    assert_eq!(req.method, "PUT");
    assert_eq!(req.path, "/items/42");
    // mixed-case header names are lower-cased
    assert_eq!(req.headers["content-type"], "application/json");
    assert!(!req.headers.contains_key("Content-Type"));
    assert!(req.query.is_empty());
    assert_eq!(req.json, Some(serde_json::json!({"name": "Widget", "qty": 3})));
}

#[test]
fn empty_event_gets_defaults() {
    let req = Request::from_event(serde_json::json!({})).unwrap();

    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/");
    assert!(req.headers.is_empty());
    assert!(req.query.is_empty());
    assert!(req.body.is_empty());
    assert_eq!(req.json, None);
}

#[test]
fn nulls_and_empty_strings_get_defaults() {
    let event = serde_json::json!({
        "requestContext": {"http": {"method": ""}},
        "httpMethod": null,
        "rawPath": "",
        "path": null,
        "headers": null,
        "queryStringParameters": null,
        "body": null,
        "isBase64Encoded": null
    });
    let req = Request::from_event(event).unwrap();

    assert_eq!(req.method, "GET");
    assert_eq!(req.path, "/");
    assert!(req.headers.is_empty());
    assert!(req.query.is_empty());
    assert!(req.body.is_empty());
}

#[test]
fn http_api_fields_take_precedence() {
    let event = serde_json::json!({
        "requestContext": {"http": {"method": "delete"}},
        "httpMethod": "GET",
        "rawPath": "/items/1",
        "path": "/other"
    });
    let req = Request::from_event(event).unwrap();

    assert_eq!(req.method, "DELETE");
    assert_eq!(req.path, "/items/1");
}

#[test]
fn rest_method_is_upper_cased() {
    let event = serde_json::json!({"requestContext": {"stage": "prod"}, "httpMethod": "post", "path": "/echo"});
    let req = Request::from_event(event).unwrap();

    assert_eq!(req.method, "POST");
    assert_eq!(req.path, "/echo");
}

#[test]
fn base64_body_is_decoded() {
    let event = serde_json::json!({
        "headers": {"Content-Type": "application/json; charset=utf-8"},
        "body": base64::encode(r#"{"b":[1,2]}"#),
        "isBase64Encoded": true
    });
    let req = Request::from_event(event).unwrap();

    assert_eq!(req.body, br#"{"b":[1,2]}"#.to_vec());
    assert_eq!(req.json, Some(serde_json::json!({"b": [1, 2]})));
}

#[test]
fn plain_body_is_not_decoded() {
    let event = serde_json::json!({"body": "aGVsbG8=", "isBase64Encoded": false});
    let req = Request::from_event(event).unwrap();

    assert_eq!(req.body, b"aGVsbG8=".to_vec());
}

#[test]
fn invalid_json_is_ignored() {
    let event = serde_json::json!({
        "headers": {"content-type": "application/json"},
        "body": "{not json"
    });
    let req = Request::from_event(event).unwrap();

    assert_eq!(req.body, b"{not json".to_vec());
    assert_eq!(req.json, None);
}

#[test]
fn json_needs_json_content_type() {
    let event = serde_json::json!({"headers": {"content-type": "text/plain"}, "body": r#"{"a":1}"#});
    assert_eq!(Request::from_event(event).unwrap().json, None);

    let event = serde_json::json!({"body": r#"{"a":1}"#});
    assert_eq!(Request::from_event(event).unwrap().json, None);
}

#[test]
fn malformed_events_are_errors() {
    assert!(Request::from_event(serde_json::json!("not an object")).is_err());
    assert!(Request::from_event(serde_json::json!({"headers": ["a"]})).is_err());
    assert!(Request::from_event(serde_json::json!({"httpMethod": 1})).is_err());
    assert!(Request::from_event(serde_json::json!({"requestContext": {"http": {"method": 1}}})).is_err());
    assert!(Request::from_event(serde_json::json!({"body": "%%%", "isBase64Encoded": true})).is_err());
}

#[test]
fn non_string_values_pass_through() {
    let event = serde_json::json!({
        "httpMethod": "GET",
        "path": "/items/1",
        "headers": {"X-Num": 5, "X-Null": null, "Content-Type": ["application/json"]},
        "queryStringParameters": {"n": 1, "empty": null},
        "body": 5
    });
    let req = Request::from_event(event).unwrap();

    assert_eq!(req.headers["x-num"], 5);
    assert_eq!(req.headers["x-null"], Value::Null);
    assert_eq!(req.query["n"], 1);
    assert_eq!(req.query["empty"], Value::Null);
    // a non-string body is no body
    assert!(req.body.is_empty());
    // a non-string content type is not JSON
    assert_eq!(req.json, None);
}

#[test]
fn non_object_query_is_empty() {
    let req = Request::from_event(serde_json::json!({"queryStringParameters": ["a", "b"]})).unwrap();
    assert!(req.query.is_empty());

    let req = Request::from_event(serde_json::json!({"queryStringParameters": "a=1"})).unwrap();
    assert!(req.query.is_empty());
}

#[test]
fn non_string_json_body_is_ignored() {
    let event = serde_json::json!({
        "headers": {"content-type": "application/json"},
        "body": {"a": 1},
        "isBase64Encoded": true
    });
    let req = Request::from_event(event).unwrap();

    assert!(req.body.is_empty());
    assert_eq!(req.json, None);
}

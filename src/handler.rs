use crate::api_gw_request::Request;
use crate::api_gw_response::ApiGatewayResponse;
use crate::config::Config;
use crate::{router, Error};
use lambda_runtime::LambdaEvent;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info};

/// A generic message returned to the caller for any fault inside the function.
const ERROR_500_MSG: &str = "Internal Server Error";

/// The body of a 500 response. `detail` is a one-line description of the fault, never a trace or a debug dump.
#[derive(Serialize, Debug)]
struct InternalError {
    error: &'static str,
    detail: String,
}

/// Lambda entry point. Always returns a response envelope, even for malformed events,
/// so the gateway never has to replace it with its own 502.
pub(crate) async fn my_handler(event: LambdaEvent<Value>, config: &Config) -> Result<Value, Error> {
    let (event, _ctx) = event.into_parts();

    Ok(handle(event, config).to_value())
}

/// Normalizes the event and routes it. Any fault is converted into a 500 response.
pub(crate) fn handle(event: Value, config: &Config) -> ApiGatewayResponse {
    // this is for debugging only to see the raw gateway event
    debug!("Event: {}", event);

    match normalize_and_route(event, config) {
        Ok(resp) => {
            info!("Status: {}", resp.status_code);
            resp
        }
        Err(e) => {
            error!("Request failed: {}", e);
            internal_error(&e, config)
        }
    }
}

fn normalize_and_route(event: Value, config: &Config) -> Result<ApiGatewayResponse, Error> {
    let req = Request::from_event(event)?;
    info!("{} {}, query: {:?}, body: {}B", req.method, req.path, req.query, req.body.len());

    router::route(&req, config)
}

/// Prepares a 500 response with a short description of `e`.
fn internal_error(e: &Error, config: &Config) -> ApiGatewayResponse {
    let body = InternalError {
        error: ERROR_500_MSG,
        detail: e.to_string(),
    };

    match ApiGatewayResponse::json(500, &body, config) {
        Ok(v) => v,
        Err(e) => {
            // only possible if the formatter fails on a plain string
            error!("Failed to serialize error response: {}", e);
            ApiGatewayResponse::empty(500, config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::init_logging;
    use serde_json::json;

    fn body(resp: &ApiGatewayResponse) -> Value {
        serde_json::from_str(&resp.body).unwrap()
    }

    #[test]
    fn http_api_echo_sample() {
        init_logging();
        let event: Value = serde_json::from_str(include_str!("../samples/http_api_event.json")).unwrap();

        let resp = handle(event, &Config::default());

        assert_eq!(resp.status_code, 200);
        assert_eq!(body(&resp)["received"], json!({"a": 1}));
        assert_eq!(resp.headers["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn rest_api_put_sample() {
        init_logging();
        let event: Value = serde_json::from_str(include_str!("../samples/rest_api_event.json")).unwrap();

        let resp = handle(event, &Config::default());

        assert_eq!(resp.status_code, 200);
        assert_eq!(resp.body, r#"{"updated": "42", "body": {"name": "Widget", "qty": 3}}"#);
    }

    #[test]
    fn echo_with_function_url_event() {
        let event = json!({
            "rawPath": "/echo",
            "requestContext": {"http": {"method": "POST"}},
            "headers": {"content-type": "application/json"},
            "body": "{\"a\":1}"
        });

        let resp = handle(event, &Config::default());

        assert_eq!(resp.status_code, 200);
        assert_eq!(
            resp.body,
            r#"{"received": {"a": 1}, "note": "POST JSON to /echo and I\u2019ll send it back."}"#
        );
    }

    #[test]
    fn echo_with_invalid_json() {
        let event = json!({
            "httpMethod": "POST",
            "path": "/echo",
            "headers": {"Content-Type": "application/json"},
            "body": "{\"a\":"
        });

        let resp = handle(event, &Config::default());

        assert_eq!(resp.status_code, 200);
        assert_eq!(body(&resp)["received"], Value::Null);
    }

    #[test]
    fn echo_with_base64_body() {
        let event = json!({
            "requestContext": {"http": {"method": "POST"}},
            "rawPath": "/echo",
            "headers": {"content-type": "application/json"},
            "body": base64::encode("{\"a\":1}"),
            "isBase64Encoded": true
        });

        let resp = handle(event, &Config::default());

        assert_eq!(body(&resp)["received"], json!({"a": 1}));
    }

    #[test]
    fn empty_event_is_home() {
        let resp = handle(json!({}), &Config::default());

        assert_eq!(resp.status_code, 200);
        assert!(body(&resp)["message"].as_str().unwrap().starts_with("Hello from Lambda webserver"));
    }

    #[test]
    fn unknown_path() {
        let resp = handle(json!({"httpMethod": "GET", "path": "/unknown"}), &Config::default());

        assert_eq!(resp.status_code, 404);
        assert_eq!(body(&resp), json!({"error": "Not found", "method": "GET", "path": "/unknown"}));
    }

    #[test]
    fn non_string_fields_are_routed() {
        let config = Config::default();

        for event in [
            json!({"httpMethod": "GET", "path": "/items/1", "headers": {"x-num": 5}, "queryStringParameters": {"n": 1}}),
            json!({"httpMethod": "GET", "path": "/items/1", "queryStringParameters": {"n": null}}),
            json!({"httpMethod": "GET", "path": "/items/1", "headers": {"content-type": 5}, "body": 5}),
        ] {
            let resp = handle(event.clone(), &config);

            assert_eq!(resp.status_code, 200, "{}", event);
            assert_eq!(resp.body, r#"{"id": "1", "name": "Item 1"}"#);
        }
    }

    #[test]
    fn echo_keeps_big_numbers() {
        let event = json!({
            "httpMethod": "POST",
            "path": "/echo",
            "headers": {"content-type": "application/json"},
            "body": r#"{"n":12345678901234567890123,"f":0.1}"#
        });

        let resp = handle(event, &Config::default());

        assert!(
            resp.body.starts_with(r#"{"received": {"n": 12345678901234567890123, "f": 0.1}, "#),
            "{}",
            resp.body
        );
    }

    #[test]
    fn malformed_event_is_500() {
        init_logging();
        let config = Config::default();

        for event in [
            json!(null),
            json!("GET /"),
            json!({"requestContext": {"http": "GET"}}),
            json!({"headers": ["content-type"]}),
            json!({"httpMethod": 7, "path": "/"}),
            json!({"httpMethod": "POST", "path": "/echo", "body": "not base64!", "isBase64Encoded": true}),
        ] {
            let resp = handle(event.clone(), &config);

            assert_eq!(resp.status_code, 500, "{}", event);
            assert!(!resp.is_base64_encoded);
            assert_eq!(resp.headers, config.cors_headers);

            let body = body(&resp);
            assert_eq!(body["error"], "Internal Server Error");
            let detail = body["detail"].as_str().unwrap();
            assert!(!detail.is_empty());
            assert!(!detail.contains('\n'), "{}", detail);
            assert_eq!(body.as_object().unwrap().len(), 2);
        }
    }

    #[tokio::test]
    async fn lambda_event_envelope() {
        let event = LambdaEvent::new(
            json!({"httpMethod": "DELETE", "path": "/items/7"}),
            lambda_runtime::Context::default(),
        );

        let resp = my_handler(event, &Config::default()).await.unwrap();

        assert_eq!(resp["statusCode"], 204);
        assert_eq!(resp["body"], "");
        assert_eq!(resp["isBase64Encoded"], false);
        assert_eq!(resp["headers"]["Access-Control-Allow-Methods"], "GET,POST,PUT,PATCH,DELETE,OPTIONS");
    }
}

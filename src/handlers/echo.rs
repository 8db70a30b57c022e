use crate::api_gw_request::Request;
use crate::api_gw_response::ApiGatewayResponse;
use crate::config::Config;
use crate::Error;
use serde::Serialize;
use serde_json::Value;

const NOTE: &str = "POST JSON to /echo and I’ll send it back.";

#[derive(Serialize, Debug)]
struct Echo<'a> {
    /// `null` if the body is missing, not JSON or has a non-JSON content type
    received: &'a Option<Value>,
    note: &'static str,
}

/// Sends the parsed JSON body back to the caller.
pub(crate) fn echo(req: &Request, config: &Config) -> Result<ApiGatewayResponse, Error> {
    ApiGatewayResponse::json(
        200,
        &Echo {
            received: &req.json,
            note: NOTE,
        },
        config,
    )
}

#[test]
fn echo_keeps_key_order() {
    let mut req = crate::router::test_request("POST", "/echo");
    req.json = Some(serde_json::from_str(r#"{"z":1,"a":[true,null]}"#).unwrap());

    let resp = echo(&req, &Config::default()).unwrap();

    assert_eq!(
        resp.body,
        r#"{"received": {"z": 1, "a": [true, null]}, "note": "POST JSON to /echo and I\u2019ll send it back."}"#
    );
}

#[test]
fn echo_without_body() {
    let resp = echo(&crate::router::test_request("POST", "/echo"), &Config::default()).unwrap();

    assert_eq!(resp.status_code, 200);
    assert!(resp.body.starts_with(r#"{"received": null, "note": "#));
}

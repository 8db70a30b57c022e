use crate::api_gw_request::Request;
use crate::api_gw_response::ApiGatewayResponse;
use crate::config::Config;
use crate::Error;
use serde::Serialize;

const GREETING: &str = "Hello from Lambda webserver 👋";
/// Keep in sync with the route table
const PATHS: [&str; 4] = ["/", "/health", "/echo", "/items/{id}"];

#[derive(Serialize, Debug)]
struct Home {
    message: &'static str,
    paths: [&'static str; 4],
}

/// Returns the greeting with the list of available paths
pub(crate) fn home(_req: &Request, config: &Config) -> Result<ApiGatewayResponse, Error> {
    ApiGatewayResponse::json(
        200,
        &Home {
            message: GREETING,
            paths: PATHS,
        },
        config,
    )
}

#[test]
fn home_body() {
    let resp = home(&crate::router::test_request("GET", "/"), &Config::default()).unwrap();

    assert_eq!(resp.status_code, 200);
    assert_eq!(
        resp.body,
        r#"{"message": "Hello from Lambda webserver \ud83d\udc4b", "paths": ["/", "/health", "/echo", "/items/{id}"]}"#
    );
}

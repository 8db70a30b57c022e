//! A placeholder `/items/{id}` resource. There is no storage behind it: responses are built from the path and the body.

use crate::api_gw_request::Request;
use crate::api_gw_response::ApiGatewayResponse;
use crate::config::Config;
use crate::Error;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

pub(crate) const ITEMS_PREFIX: &str = "/items/";

/// Methods served by `/items/{id}`. Any other method falls through to the next route.
pub(crate) const ITEM_METHODS: [&str; 3] = ["GET", "PUT", "DELETE"];

#[derive(Serialize, Debug)]
struct ItemError {
    error: &'static str,
}

#[derive(Serialize, Debug)]
struct Item<'a> {
    id: &'a str,
    name: String,
}

#[derive(Serialize, Debug)]
struct ItemUpdated<'a> {
    updated: &'a str,
    body: &'a Option<Value>,
}

/// Returns TRUE for `GET`, `PUT` and `DELETE` requests with a path starting with `/items/`.
pub(crate) fn is_item_request(req: &Request) -> bool {
    req.path.starts_with(ITEMS_PREFIX) && ITEM_METHODS.contains(&req.method.as_str())
}

/// Handles all `/items/{id}` methods. The ID is everything after the prefix, including any slashes.
pub(crate) fn items(req: &Request, config: &Config) -> Result<ApiGatewayResponse, Error> {
    let item_id = req.path.strip_prefix(ITEMS_PREFIX).unwrap_or_default();

    if item_id.is_empty() {
        info!("Missing item id");
        return ApiGatewayResponse::json(
            400,
            &ItemError {
                error: "Missing item id",
            },
            config,
        );
    }

    match req.method.as_str() {
        "PUT" => ApiGatewayResponse::json(
            200,
            &ItemUpdated {
                updated: item_id,
                body: &req.json,
            },
            config,
        ),
        "DELETE" => Ok(ApiGatewayResponse::empty(204, config)),
        _ => ApiGatewayResponse::json(
            200,
            &Item {
                id: item_id,
                name: ["Item ", item_id].concat(),
            },
            config,
        ),
    }
}

#[test]
fn item_predicate() {
    use crate::router::test_request;

    assert!(is_item_request(&test_request("GET", "/items/1")));
    assert!(is_item_request(&test_request("PUT", "/items/")));
    assert!(is_item_request(&test_request("DELETE", "/items/a/b")));
    assert!(!is_item_request(&test_request("POST", "/items/1")));
    assert!(!is_item_request(&test_request("OPTIONS", "/items/1")));
    assert!(!is_item_request(&test_request("GET", "/items")));
    assert!(!is_item_request(&test_request("GET", "/api/items/1")));
}

#[test]
fn item_id_keeps_slashes() {
    let resp = items(&crate::router::test_request("GET", "/items/a/b"), &Config::default()).unwrap();

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.body, r#"{"id": "a/b", "name": "Item a/b"}"#);
}

#[test]
fn put_item() {
    let mut req = crate::router::test_request("PUT", "/items/9");
    req.json = Some(serde_json::json!({"name": "Widget"}));

    let resp = items(&req, &Config::default()).unwrap();
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.body, r#"{"updated": "9", "body": {"name": "Widget"}}"#);

    req.json = None;
    let resp = items(&req, &Config::default()).unwrap();
    assert_eq!(resp.body, r#"{"updated": "9", "body": null}"#);
}

#[test]
fn missing_id_for_every_method() {
    for method in ITEM_METHODS {
        let resp = items(&crate::router::test_request(method, "/items/"), &Config::default()).unwrap();
        assert_eq!(resp.status_code, 400, "{}", method);
        assert_eq!(resp.body, r#"{"error": "Missing item id"}"#);
    }
}

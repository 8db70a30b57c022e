use crate::api_gw_request::Request;
use crate::api_gw_response::ApiGatewayResponse;
use crate::config::Config;
use crate::handlers::{echo, health, home, http_options, items, not_found};
use crate::Error;
use tracing::info;

/// A handler builds the full response, including the CORS headers from `Config`.
pub(crate) type Handler = fn(&Request, &Config) -> Result<ApiGatewayResponse, Error>;

/// A named (predicate, handler) pair.
pub(crate) struct Route {
    pub name: &'static str,
    pub matches: fn(&Request) -> bool,
    pub handler: Handler,
}

/// All routes in the order of evaluation. The first match wins and shadows any later route with an overlapping predicate.
pub(crate) static ROUTES: &[Route] = &[
    Route {
        name: "health",
        matches: is_health,
        handler: health::health,
    },
    Route {
        name: "home",
        matches: is_home,
        handler: home::home,
    },
    Route {
        name: "echo",
        matches: is_echo,
        handler: echo::echo,
    },
    Route {
        name: "items",
        matches: items::is_item_request,
        handler: items::items,
    },
    Route {
        name: "preflight",
        matches: is_preflight,
        handler: http_options::http_options_response,
    },
];

/// Returns the response of the first route matching `req` or 404 if none matched.
pub(crate) fn route(req: &Request, config: &Config) -> Result<ApiGatewayResponse, Error> {
    match ROUTES.iter().find(|route| (route.matches)(req)) {
        Some(route) => {
            info!("Route: {}", route.name);
            (route.handler)(req, config)
        }
        None => not_found::not_found(req, config),
    }
}

fn is_health(req: &Request) -> bool {
    req.method == "GET" && req.path == "/health"
}

fn is_home(req: &Request) -> bool {
    req.method == "GET" && req.path == "/"
}

fn is_echo(req: &Request) -> bool {
    req.method == "POST" && req.path == "/echo"
}

fn is_preflight(req: &Request) -> bool {
    req.method == "OPTIONS"
}

/// A bare request with no headers or body for unit tests.
#[cfg(test)]
pub(crate) fn test_request(method: &str, path: &str) -> Request {
    Request {
        method: method.to_owned(),
        path: path.to_owned(),
        headers: std::collections::HashMap::new(),
        query: std::collections::HashMap::new(),
        body: Vec::new(),
        json: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn route_default(method: &str, path: &str) -> ApiGatewayResponse {
        route(&test_request(method, path), &Config::default()).unwrap()
    }

    fn json_body(resp: &ApiGatewayResponse) -> Value {
        serde_json::from_str(&resp.body).unwrap()
    }

    #[test]
    fn route_order() {
        let names = ROUTES.iter().map(|r| r.name).collect::<Vec<&str>>();
        assert_eq!(names, vec!["health", "home", "echo", "items", "preflight"]);
    }

    #[test]
    fn first_match_wins() {
        for (method, path, expected) in [
            ("GET", "/health", "health"),
            ("GET", "/", "home"),
            ("POST", "/echo", "echo"),
            ("GET", "/items/1", "items"),
            ("OPTIONS", "/items/1", "preflight"),
        ] {
            let req = test_request(method, path);
            let matching = ROUTES
                .iter()
                .filter(|r| (r.matches)(&req))
                .map(|r| r.name)
                .collect::<Vec<&str>>();
            assert_eq!(matching, vec![expected], "{} {}", method, path);
        }

        // every OPTIONS request lands in preflight, even on known paths
        for path in ["/", "/health", "/echo", "/items/1", "/items/"] {
            let resp = route_default("OPTIONS", path);
            assert_eq!(resp.status_code, 204, "{}", path);
            assert_eq!(resp.body, "", "{}", path);
        }
    }

    #[test]
    fn health() {
        let resp = route_default("GET", "/health");
        assert_eq!(resp.status_code, 200);
        assert_eq!(json_body(&resp)["ok"], true);
    }

    #[test]
    fn home() {
        let resp = route_default("GET", "/");
        assert_eq!(resp.status_code, 200);
        assert_eq!(
            json_body(&resp)["paths"],
            serde_json::json!(["/", "/health", "/echo", "/items/{id}"])
        );
    }

    #[test]
    fn echo() {
        let mut req = test_request("POST", "/echo");
        req.json = Some(serde_json::json!({"a": 1}));

        let resp = route(&req, &Config::default()).unwrap();
        assert_eq!(resp.status_code, 200);
        assert_eq!(json_body(&resp)["received"], serde_json::json!({"a": 1}));
    }

    #[test]
    fn items() {
        let resp = route_default("GET", "/items/42");
        assert_eq!(resp.status_code, 200);
        assert_eq!(json_body(&resp), serde_json::json!({"id": "42", "name": "Item 42"}));

        let resp = route_default("GET", "/items/");
        assert_eq!(resp.status_code, 400);
        assert_eq!(json_body(&resp), serde_json::json!({"error": "Missing item id"}));

        let resp = route_default("DELETE", "/items/7");
        assert_eq!(resp.status_code, 204);
        assert_eq!(resp.body, "");
    }

    #[test]
    fn not_found() {
        let resp = route_default("GET", "/unknown");
        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.body, r#"{"error": "Not found", "method": "GET", "path": "/unknown"}"#);

        // wrong method on a known path
        for (method, path) in [("POST", "/health"), ("GET", "/echo"), ("POST", "/items/1"), ("PATCH", "/")] {
            let resp = route_default(method, path);
            assert_eq!(resp.status_code, 404, "{} {}", method, path);
            assert_eq!(json_body(&resp)["method"], method);
            assert_eq!(json_body(&resp)["path"], path);
        }
    }

    #[test]
    fn cors_headers_on_every_route() {
        let config = Config::default();
        for (method, path) in [
            ("GET", "/health"),
            ("GET", "/"),
            ("POST", "/echo"),
            ("GET", "/items/1"),
            ("GET", "/items/"),
            ("PUT", "/items/1"),
            ("DELETE", "/items/1"),
            ("OPTIONS", "/anything"),
            ("GET", "/nope"),
        ] {
            let resp = route(&test_request(method, path), &config).unwrap();
            for (k, v) in &config.cors_headers {
                assert_eq!(resp.headers.get(k), Some(v), "{} {}", method, path);
            }
            assert!(!resp.is_base64_encoded);
        }
    }
}

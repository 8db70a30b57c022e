use crate::api_gw_request::Request;
use crate::api_gw_response::ApiGatewayResponse;
use crate::config::Config;
use crate::Error;
use serde::Serialize;
use tracing::info;

#[derive(Serialize, Debug)]
struct NotFound<'a> {
    error: &'static str,
    method: &'a str,
    path: &'a str,
}

/// The catch-all response for requests no route matched.
pub(crate) fn not_found(req: &Request, config: &Config) -> Result<ApiGatewayResponse, Error> {
    info!("No route for {} {}", req.method, req.path);

    ApiGatewayResponse::json(
        404,
        &NotFound {
            error: "Not found",
            method: &req.method,
            path: &req.path,
        },
        config,
    )
}

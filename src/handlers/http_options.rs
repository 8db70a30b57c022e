use crate::api_gw_request::Request;
use crate::api_gw_response::ApiGatewayResponse;
use crate::config::Config;
use crate::Error;
use tracing::debug;

/// Returns an empty 204 response to a CORS pre-flight request for any path.
/// The CORS headers from the config are all the browser needs.
///
/// See https://developer.mozilla.org/en-US/docs/Web/HTTP/Methods/OPTIONS
pub(crate) fn http_options_response(req: &Request, config: &Config) -> Result<ApiGatewayResponse, Error> {
    debug!("OPTIONS: {:?}", req.headers);

    Ok(ApiGatewayResponse::empty(204, config))
}

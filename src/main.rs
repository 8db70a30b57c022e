use crate::config::Config;
use lambda_runtime::{service_fn, LambdaEvent};
use serde_json::Value;

mod api_gw_request;
mod api_gw_response;
mod config;
mod handler;
mod handlers;
mod router;

pub(crate) type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // init the logger with the specified level
    let tsub = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false);
    // time is not needed in CloudWatch, but is useful in console
    #[cfg(not(debug_assertions))]
    let tsub = tsub.without_time();
    tsub.init();

    // the config is read-only and is shared by all invocations of this instance
    let config_owned = Config::default();
    let config_shared = &config_owned;

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        handler::my_handler(event, config_shared).await
    }))
    .await
}

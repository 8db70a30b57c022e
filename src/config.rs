use std::collections::HashMap;

/// Header names of the base CORS set
pub(crate) const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
pub(crate) const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
pub(crate) const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";

/// Read-only settings shared by all invocations of a warm function instance.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    /// CORS headers added to every response. Handlers may override individual entries.
    pub cors_headers: HashMap<String, String>,
}

impl Config {
    pub const ALLOWED_ORIGIN: &'static str = "*";
    pub const ALLOWED_METHODS: &'static str = "GET,POST,PUT,PATCH,DELETE,OPTIONS";
    pub const ALLOWED_HEADERS: &'static str = "Content-Type,Authorization,X-Requested-With";
}

impl Default for Config {
    /// The CORS set is fixed and allows any origin.
    fn default() -> Self {
        let mut cors_headers: HashMap<String, String> = HashMap::new();
        cors_headers.insert(ALLOW_ORIGIN.to_owned(), Self::ALLOWED_ORIGIN.to_owned());
        cors_headers.insert(ALLOW_METHODS.to_owned(), Self::ALLOWED_METHODS.to_owned());
        cors_headers.insert(ALLOW_HEADERS.to_owned(), Self::ALLOWED_HEADERS.to_owned());

        Config { cors_headers }
    }
}

/// Attempts to initialize logging at INFO level. It is specially useful for test
/// functions as a shortcut for logging initializing. This Fn is safe to call multiple times.
#[cfg(test)]
pub(crate) fn init_logging() {
    let tsub = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false);

    if tsub.try_init().is_ok() {
        tracing::info!("tracing_subscriber initialized");
    }
}

#[test]
fn default_cors_headers() {
    let config = Config::default();

    assert_eq!(config.cors_headers.len(), 3);
    assert_eq!(config.cors_headers[ALLOW_ORIGIN], "*");
    assert_eq!(config.cors_headers[ALLOW_METHODS], "GET,POST,PUT,PATCH,DELETE,OPTIONS");
    assert_eq!(
        config.cors_headers[ALLOW_HEADERS],
        "Content-Type,Authorization,X-Requested-With"
    );
}

#[test]
fn cors_headers_ignore_env() {
    // no env var is consulted, so the origin stays open whatever the environment holds
    std::env::set_var("CORS_ALLOW_ORIGIN", "https://example.com");
    let config = Config::default();
    std::env::remove_var("CORS_ALLOW_ORIGIN");

    assert_eq!(config.cors_headers[ALLOW_ORIGIN], "*");
}

use std::time::Duration;

use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use reqwest_tracing::TracingMiddleware;

use super::github::GithubResult;

/*
    Adds middleware for:

    - Retrying failed requests with exponential backoff
    - Tracing of HTTP requests
*/
fn add_client_middleware(client: Client) -> ClientWithMiddleware {
    ClientBuilder::new(client)
        .with(RetryTransientMiddleware::new_with_policy(
            ExponentialBackoff::builder().build_with_max_retries(3),
        ))
        .with(TracingMiddleware::default())
        .build()
}

/**
    The user agent sent with every request, `<crate_name>/<crate_version> (<repository_url>)`.
*/
#[must_use]
pub fn user_agent() -> String {
    format!(
        "{}/{} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_REPOSITORY"),
    )
}

/**
    Creates a client with:

    - HTTPS only
    - Timeouts for connection and response
    - All common compression algorithms enabled
    - A descriptive user agent, see [`user_agent`]
*/
pub fn create_client(mut default_headers: HeaderMap) -> GithubResult<ClientWithMiddleware> {
    default_headers.insert(USER_AGENT, HeaderValue::from_str(&user_agent())?);

    let client = Client::builder()
        .default_headers(default_headers)
        .https_only(true)
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(60))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()?;

    Ok(add_client_middleware(client))
}

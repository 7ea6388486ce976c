use std::io::stderr;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[cfg(debug_assertions)]
const FMT_PRETTY: bool = true;

#[cfg(not(debug_assertions))]
const FMT_PRETTY: bool = false;

const QUIET_DEPENDENCIES: [&str; 7] = [
    "reqwest",
    "reqwest_retry",
    "rustls",
    "tokio_util",
    "tower",
    "hyper",
    "h2",
];

pub fn init() {
    // Extra directives let us debug the
    // CLI itself using RUST_LOG=debug or RUST_LOG=trace
    let tracing_env_filter = QUIET_DEPENDENCIES.iter().fold(
        EnvFilter::builder()
            .with_default_directive(LevelFilter::INFO.into())
            .from_env_lossy(),
        |filter, dep| match format!("{dep}=info").parse() {
            Ok(directive) => filter.add_directive(directive),
            Err(_) => filter,
        },
    );

    // Pretty and verbose output during development, concise output in production.
    if FMT_PRETTY {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_env_filter)
            .with_writer(stderr)
            .pretty()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_env_filter)
            .with_writer(stderr)
            .with_target(false)
            .without_time()
            .init();
    }
}

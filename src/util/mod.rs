mod progress;
mod render;
mod sources;
mod tracing;

pub use self::progress::CliProgressTracker;
pub use self::render::{describe_origin, render_assets, render_card, render_highlights};
pub use self::sources::{github_provider, release_fetcher};
pub use self::tracing::init as init_tracing;

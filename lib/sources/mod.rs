mod cache;
mod client;
mod fetcher;

pub mod github;

pub use self::cache::ReleaseCache;
pub use self::client::user_agent;
pub use self::fetcher::{
    FetchedReleases, MAX_RELEASE_PAGES, RELEASES_PER_PAGE, ReleaseFetcher, ReleaseOrigin,
    ReleasePages,
};

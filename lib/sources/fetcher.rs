use std::{
    future::Future,
    path::{Path, PathBuf},
    sync::Arc,
};

use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::{
    releases::{Release, normalize},
    repo::RepoId,
    result::{ReleaseError, ReleaseResult},
    util::fs::load_json_file,
};

use super::{
    cache::ReleaseCache,
    github::{GithubProvider, GithubResult, models::GithubRelease},
};

/**
    The number of releases requested per page.
*/
pub const RELEASES_PER_PAGE: u32 = 100;

/**
    The maximum number of pages requested in a single fetch.
*/
pub const MAX_RELEASE_PAGES: u32 = 5;

/**
    A paginated source of raw releases.

    Implemented by [`GithubProvider`], and by in-memory sources in tests.
*/
pub trait ReleasePages {
    /**
        Fetch a single, 1-indexed page of releases for a repository.
    */
    fn fetch_page(
        &self,
        repo: &RepoId,
        page: u32,
        per_page: u32,
        force: bool,
    ) -> impl Future<Output = GithubResult<Vec<GithubRelease>>> + Send;
}

impl ReleasePages for GithubProvider {
    async fn fetch_page(
        &self,
        repo: &RepoId,
        page: u32,
        per_page: u32,
        force: bool,
    ) -> GithubResult<Vec<GithubRelease>> {
        self.get_releases_page(repo, page, per_page, force).await
    }
}

/**
    Where a set of fetched releases came from.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseOrigin {
    /// Fetched from the upstream API just now.
    Live,
    /// Served from a previous, still fresh, upstream fetch.
    Cache,
    /// Loaded from the local fallback manifest, since upstream was unavailable.
    Fallback,
}

/**
    Normalized releases together with their origin.
*/
#[derive(Debug, Clone)]
pub struct FetchedReleases {
    releases: Arc<[Release]>,
    origin: ReleaseOrigin,
}

impl FetchedReleases {
    #[must_use]
    pub fn new(releases: Arc<[Release]>, origin: ReleaseOrigin) -> Self {
        Self { releases, origin }
    }

    #[must_use]
    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    #[must_use]
    pub fn origin(&self) -> ReleaseOrigin {
        self.origin
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

/**
    Fetches all releases for a single repository.

    Pages are requested one after another, with a local manifest file
    used as a substitute if the upstream API can not be reached.
*/
#[derive(Debug, Clone)]
pub struct ReleaseFetcher<P> {
    provider: P,
    repo: RepoId,
    fallback_manifest: Option<PathBuf>,
    cache: ReleaseCache,
}

impl<P: ReleasePages> ReleaseFetcher<P> {
    /**
        Creates a new fetcher for the given repository, without any fallback manifest.
    */
    pub fn new(provider: P, repo: RepoId) -> Self {
        Self {
            provider,
            repo,
            fallback_manifest: None,
            cache: ReleaseCache::default(),
        }
    }

    /**
        Sets the local manifest to fall back to if upstream is unavailable.

        The manifest must be a JSON array of releases, the same shape as a single page.
    */
    #[must_use]
    pub fn with_fallback_manifest(mut self, path: impl Into<PathBuf>) -> Self {
        self.fallback_manifest = Some(path.into());
        self
    }

    /**
        Sets the cache to use, which may be shared with other fetchers.
    */
    #[must_use]
    pub fn with_cache(mut self, cache: ReleaseCache) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    #[must_use]
    pub fn cache(&self) -> &ReleaseCache {
        &self.cache
    }

    #[must_use]
    pub fn fallback_manifest(&self) -> Option<&Path> {
        self.fallback_manifest.as_deref()
    }

    /**
        Fetches all releases for the repository, normalized and sorted newest-first.

        Unless `force` is set, a recently fetched result may be returned from cache.
        With `force` set, the cache is skipped and origin is always contacted.

        # Errors

        - If any page request failed, and the fallback manifest is missing or unusable.
          The error carries the HTTP status of the failed page request, if any.
    */
    #[instrument(skip(self), fields(repo = %self.repo), level = "debug")]
    pub async fn fetch_all_releases(&self, force: bool) -> ReleaseResult<FetchedReleases> {
        if !force && let Some(releases) = self.cache.get(&self.repo) {
            debug!(count = releases.len(), "using cached releases");
            return Ok(FetchedReleases {
                releases,
                origin: ReleaseOrigin::Cache,
            });
        }

        let error = match self.fetch_all_pages(force).await {
            Ok(raw) => {
                let releases: Arc<[Release]> = normalize(raw).into();
                debug!(count = releases.len(), "fetched releases");
                self.cache.insert(self.repo.clone(), Arc::clone(&releases));
                return Ok(FetchedReleases {
                    releases,
                    origin: ReleaseOrigin::Live,
                });
            }
            Err(e) => ReleaseError::upstream(&e),
        };

        match self.load_fallback_manifest().await {
            Some(raw) => {
                warn!(
                    "Failed to fetch releases for {}, using fallback manifest!\
                    \nError: {error}",
                    self.repo
                );
                Ok(FetchedReleases {
                    releases: normalize(raw).into(),
                    origin: ReleaseOrigin::Fallback,
                })
            }
            None => Err(error),
        }
    }

    /*
        Fetches pages sequentially until a short page is encountered,
        or the page limit is reached. Any failure discards all pages.
    */
    async fn fetch_all_pages(&self, force: bool) -> GithubResult<Vec<GithubRelease>> {
        let mut releases = Vec::new();

        for page in 1..=MAX_RELEASE_PAGES {
            let page_releases = self
                .provider
                .fetch_page(&self.repo, page, RELEASES_PER_PAGE, force)
                .await?;

            let page_len = page_releases.len();
            trace!(page, page_len, "fetched page of releases");
            releases.extend(page_releases);

            if page_len < RELEASES_PER_PAGE as usize {
                break;
            }
        }

        Ok(releases)
    }

    async fn load_fallback_manifest(&self) -> Option<Vec<GithubRelease>> {
        let path = self.fallback_manifest.as_deref()?;
        match load_json_file::<_, Vec<GithubRelease>>(path).await {
            Ok(raw) => Some(raw),
            Err(e) => {
                debug!(?path, "fallback manifest is unusable: {e}");
                None
            }
        }
    }
}

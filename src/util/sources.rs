use anyhow::{Context, Result};

use sitesurveyor::{
    config::SiteConfig,
    sources::{ReleaseCache, ReleaseFetcher, github::GithubProvider},
};

pub fn github_provider(config: &SiteConfig) -> Result<GithubProvider> {
    GithubProvider::from_config(config).context("Failed to create GitHub API client")
}

pub fn release_fetcher(config: &SiteConfig) -> Result<ReleaseFetcher<GithubProvider>> {
    let provider = github_provider(config)?;
    let mut fetcher = ReleaseFetcher::new(provider, config.repository.clone())
        .with_cache(ReleaseCache::new(config.cache_ttl()));
    if let Some(path) = &config.fallback_manifest {
        fetcher = fetcher.with_fallback_manifest(path.clone());
    }
    Ok(fetcher)
}

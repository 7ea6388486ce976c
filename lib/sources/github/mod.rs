#![allow(clippy::missing_errors_doc)]

use reqwest_middleware::ClientWithMiddleware;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};
use url::Url;

use reqwest::{
    StatusCode,
    header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue},
};

use crate::{config::SiteConfig, repo::RepoId};

use super::client::create_client;

pub mod models;
mod result;

use self::models::{GithubIssue, GithubRelease, GithubRepository};

pub use self::result::{GithubError, GithubResult};

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Debug, Clone)]
pub struct GithubProvider {
    client: ClientWithMiddleware,
    base_url: Url,
    has_auth: bool,
}

impl GithubProvider {
    fn new_inner(base_url: Url, pat: Option<String>) -> GithubResult<Self> {
        let has_auth = pat.is_some();
        let headers = {
            let mut headers = HeaderMap::new();
            headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_JSON));
            headers.insert(
                HeaderName::from_static("x-github-api-version"),
                HeaderValue::from_static("2022-11-28"),
            );
            if let Some(pat) = pat {
                let token = format!("Bearer {pat}");
                let mut value = HeaderValue::from_str(&token)?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            headers
        };

        let client = create_client(headers)?;

        Ok(Self {
            client,
            base_url,
            has_auth,
        })
    }

    /**
        Creates a new GitHub provider talking to the given API base URL.

        This provider is unauthenticated and is subject to stricter rate limits.
    */
    pub fn new(base_url: Url) -> GithubResult<Self> {
        Self::new_inner(base_url, None)
    }

    /**
        Creates a new authenticated GitHub provider with a bearer token.

        Note that this does not verify the validity of the token,
        use the `verify_authentication` method for checking with the GitHub API.
    */
    pub fn new_authenticated(base_url: Url, pat: impl AsRef<str>) -> GithubResult<Self> {
        let pat: String = pat.as_ref().trim().to_string();
        Self::new_inner(base_url, Some(pat))
    }

    /**
        Creates a provider from configuration, authenticated if a token is configured.
    */
    pub fn from_config(config: &SiteConfig) -> GithubResult<Self> {
        match config.token.as_deref() {
            Some(token) => Self::new_authenticated(config.api_base_url.clone(), token),
            None => Self::new(config.api_base_url.clone()),
        }
    }

    #[must_use]
    pub fn has_auth(&self) -> bool {
        self.has_auth
    }

    fn endpoint(&self, path: &str) -> GithubResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, force: bool) -> GithubResult<T> {
        let mut request = self.client.get(url.clone());
        if force {
            request = request.header(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GithubError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }

    /**
        Verifies that the current authentication token is valid.

        Returns `true` if the token is valid, `false` if it is not.

        Always returns `false` if the provider is not authenticated.
    */
    pub async fn verify_authentication(&self) -> GithubResult<bool> {
        if !self.has_auth {
            return Ok(false);
        }

        let url = self.endpoint("rate_limit")?;
        let res = self.get_json::<serde_json::Value>(url, true).await;

        match res {
            Ok(_) => Ok(true),
            Err(e) if is_unauthenticated(&e) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /**
        Fetches a single page of releases for a repository.

        If `force` is set, intermediate caches are asked to revalidate with the origin.
    */
    #[instrument(skip(self), fields(%repo), level = "trace")]
    pub async fn get_releases_page(
        &self,
        repo: &RepoId,
        page: u32,
        per_page: u32,
        force: bool,
    ) -> GithubResult<Vec<GithubRelease>> {
        trace!("fetching releases page");

        let mut url = self.endpoint(&format!(
            "repos/{owner}/{name}/releases",
            owner = repo.owner(),
            name = repo.name(),
        ))?;
        url.query_pairs_mut()
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());

        self.get_json(url, force).await
    }

    /**
        Fetches the repository snapshot - star, fork, watcher counts and more.
    */
    #[instrument(skip(self), fields(%repo), level = "debug")]
    pub async fn get_repository(&self, repo: &RepoId) -> GithubResult<GithubRepository> {
        debug!("fetching repository snapshot");

        let url = self.endpoint(&format!(
            "repos/{owner}/{name}",
            owner = repo.owner(),
            name = repo.name(),
        ))?;

        self.get_json(url, false).await
    }

    /**
        Fetches the most recently opened issues for a repository.

        Pull requests are also returned by the issues endpoint, and are filtered out
        here, meaning that fewer than `per_page` issues may be returned.
    */
    #[instrument(skip(self), fields(%repo), level = "debug")]
    pub async fn get_open_issues(
        &self,
        repo: &RepoId,
        per_page: u8,
    ) -> GithubResult<Vec<GithubIssue>> {
        debug!("fetching open issues");

        let mut url = self.endpoint(&format!(
            "repos/{owner}/{name}/issues",
            owner = repo.owner(),
            name = repo.name(),
        ))?;
        url.query_pairs_mut()
            .append_pair("state", "open")
            .append_pair("sort", "created")
            .append_pair("direction", "desc")
            .append_pair("per_page", &per_page.to_string());

        let issues: Vec<GithubIssue> = self.get_json(url, false).await?;
        Ok(issues
            .into_iter()
            .filter(|issue| !issue.is_pull_request())
            .collect())
    }

    /**
        Fetches an arbitrary JSON status feed.

        The feed does not have to be hosted by GitHub, but is fetched using the same client.
    */
    #[instrument(skip(self), fields(%feed_url), level = "debug")]
    pub async fn get_status_feed(&self, feed_url: &Url) -> GithubResult<serde_json::Value> {
        debug!("fetching status feed");
        self.get_json(feed_url.clone(), false).await
    }
}

fn is_unauthenticated(err: &GithubError) -> bool {
    err.status().is_some_and(|status| {
        status == StatusCode::UNAUTHORIZED.as_u16() || status == StatusCode::FORBIDDEN.as_u16()
    })
}

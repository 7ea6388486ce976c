#![allow(clippy::missing_errors_doc)]

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use crate::{
    releases::parse_timestamp,
    repo::RepoId,
    result::{ReleaseError, ReleaseResult},
    sources::{
        FetchedReleases, ReleaseFetcher, ReleasePages,
        github::{
            GithubProvider, GithubResult,
            models::{GithubIssue, GithubRepository},
        },
    },
};

/**
    The default number of open issues shown on a community page.
*/
pub const DEFAULT_ISSUES_PER_PAGE: u8 = 5;

/**
    A source of optional, secondary repository data.
*/
pub trait CommunitySource: ReleasePages {
    fn fetch_repository(
        &self,
        repo: &RepoId,
    ) -> impl Future<Output = GithubResult<GithubRepository>> + Send;

    fn fetch_open_issues(
        &self,
        repo: &RepoId,
        per_page: u8,
    ) -> impl Future<Output = GithubResult<Vec<GithubIssue>>> + Send;
}

impl CommunitySource for GithubProvider {
    async fn fetch_repository(&self, repo: &RepoId) -> GithubResult<GithubRepository> {
        self.get_repository(repo).await
    }

    async fn fetch_open_issues(&self, repo: &RepoId, per_page: u8) -> GithubResult<Vec<GithubIssue>> {
        self.get_open_issues(repo, per_page).await
    }
}

/**
    Popularity and activity counters for a repository.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoSnapshot {
    pub full_name: Option<String>,
    pub html_url: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub watchers: u64,
    pub subscribers: u64,
    pub open_issues: u64,
    pub default_branch: Option<String>,
    pub pushed_at: Option<DateTime<Utc>>,
}

impl From<GithubRepository> for RepoSnapshot {
    fn from(raw: GithubRepository) -> Self {
        Self {
            full_name: raw.full_name,
            html_url: raw.html_url,
            stars: raw.stargazers_count.unwrap_or_default(),
            forks: raw.forks_count.unwrap_or_default(),
            watchers: raw.watchers_count.unwrap_or_default(),
            subscribers: raw.subscribers_count.unwrap_or_default(),
            open_issues: raw.open_issues_count.unwrap_or_default(),
            default_branch: raw.default_branch,
            pushed_at: raw.pushed_at.as_deref().and_then(parse_timestamp),
        }
    }
}

/**
    Summary of a single open issue.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueSummary {
    pub number: u64,
    pub title: String,
    pub url: Option<String>,
    pub labels: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub comments: u64,
}

impl From<GithubIssue> for IssueSummary {
    fn from(raw: GithubIssue) -> Self {
        Self {
            number: raw.number.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            url: raw.html_url,
            labels: raw
                .labels
                .unwrap_or_default()
                .into_iter()
                .filter_map(|label| label.name)
                .collect(),
            created_at: raw.created_at.as_deref().and_then(parse_timestamp),
            comments: raw.comments.unwrap_or_default(),
        }
    }
}

/**
    A single, independently fetched section of a page.

    An unavailable section never affects any of its sibling sections.
*/
#[derive(Debug)]
pub enum Section<T> {
    Ready(T),
    Unavailable(ReleaseError),
}

impl<T> Section<T> {
    fn from_result(section: &'static str, result: GithubResult<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                warn!("Failed to load {section}, showing it as unavailable\nError: {e}");
                Self::Unavailable(ReleaseError::partial(section, &e))
            }
        }
    }

    #[must_use]
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Section<U> {
        match self {
            Self::Ready(value) => Section::Ready(f(value)),
            Self::Unavailable(e) => Section::Unavailable(e),
        }
    }
}

/**
    Outcome of loading a page that may be torn down before it settles.
*/
#[derive(Debug)]
pub enum PageLoad<T> {
    Loaded(T),
    Cancelled,
}

impl<T> PageLoad<T> {
    #[must_use]
    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

/**
    Everything shown on a community page.

    Releases are the primary section, the snapshot and issues are enrichment.
*/
#[derive(Debug)]
pub struct CommunityPage {
    pub releases: ReleaseResult<FetchedReleases>,
    pub snapshot: Section<RepoSnapshot>,
    pub issues: Section<Vec<IssueSummary>>,
}

/**
    Loads releases, the repository snapshot, and open issues concurrently.

    Every fetch settles on its own, and a failure in one only degrades
    its own section. If `cancel` fires before all fetches have settled,
    in-flight requests are dropped and nothing is returned or cached.
*/
#[instrument(skip(fetcher, cancel), fields(repo = %fetcher.repo()), level = "debug")]
pub async fn load_community_page<P: CommunitySource>(
    fetcher: &ReleaseFetcher<P>,
    issues_per_page: u8,
    cancel: &CancellationToken,
) -> PageLoad<CommunityPage> {
    let repo = fetcher.repo();
    let provider = fetcher.provider();

    let load = async {
        let (releases, snapshot, issues) = tokio::join!(
            fetcher.fetch_all_releases(false),
            provider.fetch_repository(repo),
            provider.fetch_open_issues(repo, issues_per_page),
        );
        CommunityPage {
            releases,
            snapshot: Section::from_result("repository", snapshot).map(RepoSnapshot::from),
            issues: Section::from_result("issues", issues).map(|issues| {
                issues
                    .into_iter()
                    .filter(|issue| !issue.is_pull_request())
                    .map(IssueSummary::from)
                    .collect()
            }),
        }
    };

    tokio::select! {
        biased;
        () = cancel.cancelled() => {
            debug!("community page load was cancelled");
            PageLoad::Cancelled
        }
        page = load => PageLoad::Loaded(page),
    }
}

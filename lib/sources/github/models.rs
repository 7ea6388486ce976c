/*
    Raw upstream payloads.

    Every field is optional, since the upstream API may omit or null
    out any of them. These are normalized into internal types as
    soon as they have been received, and never used beyond that.
*/

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GithubRelease {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub tag_name: Option<String>,
    pub html_url: Option<String>,
    pub body: Option<String>,
    pub published_at: Option<String>,
    pub draft: Option<bool>,
    pub prerelease: Option<bool>,
    pub assets: Option<Vec<GithubAsset>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GithubAsset {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub size: Option<u64>,
    pub browser_download_url: Option<String>,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubRepository {
    pub full_name: Option<String>,
    pub html_url: Option<String>,
    pub stargazers_count: Option<u64>,
    pub forks_count: Option<u64>,
    pub watchers_count: Option<u64>,
    pub subscribers_count: Option<u64>,
    pub open_issues_count: Option<u64>,
    pub default_branch: Option<String>,
    pub pushed_at: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubIssue {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub html_url: Option<String>,
    pub labels: Option<Vec<GithubLabel>>,
    pub created_at: Option<String>,
    pub comments: Option<u64>,
    pub pull_request: Option<serde_json::Value>,
}

impl GithubIssue {
    /**
        Checks if this issue is actually a pull request.

        The issues endpoint returns both, marking pull requests with this field.
    */
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GithubLabel {
    pub name: Option<String>,
    pub color: Option<String>,
}

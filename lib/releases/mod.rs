use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::sources::github::models::{GithubAsset, GithubRelease};

mod format;
mod highlights;
mod normalize;
mod timeline;

pub use self::format::{format_asset_size, format_release_date};
pub use self::highlights::{Highlight, MAX_HIGHLIGHTS, extract_highlights};
pub use self::normalize::normalize;
pub use self::timeline::{TimelineSection, UNPUBLISHED_PERIOD, group_by_month};

/**
    A tagged, published bundle of downloadable files.

    Created from raw upstream data at the ingestion boundary, see [`normalize`].
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub id: u64,
    pub name: Option<String>,
    pub tag_name: String,
    pub html_url: Option<String>,
    pub body: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub draft: bool,
    pub prerelease: bool,
    pub assets: Vec<Asset>,
}

impl Release {
    /**
        The name to display for this release - its name if it has one, otherwise its tag.
    */
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.tag_name)
    }

    /**
        Extracts the highlights from the notes of this release.
    */
    #[must_use]
    pub fn highlights(&self) -> Vec<Highlight> {
        extract_highlights(self.body.as_deref())
    }

    /**
        Finds the asset with the given file name, ignoring case.
    */
    #[must_use]
    pub fn find_asset(&self, name: &str) -> Option<&Asset> {
        self.assets
            .iter()
            .find(|asset| asset.name.eq_ignore_ascii_case(name))
    }
}

impl From<GithubRelease> for Release {
    fn from(raw: GithubRelease) -> Self {
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.filter(|name| !name.trim().is_empty()),
            tag_name: raw.tag_name.unwrap_or_default(),
            html_url: raw.html_url,
            body: raw.body,
            published_at: raw.published_at.as_deref().and_then(parse_timestamp),
            draft: raw.draft.unwrap_or_default(),
            prerelease: raw.prerelease.unwrap_or_default(),
            assets: raw
                .assets
                .unwrap_or_default()
                .into_iter()
                .map(Asset::from)
                .collect(),
        }
    }
}

/**
    A single downloadable file attached to a [`Release`].
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub id: u64,
    pub name: String,
    pub size: u64,
    pub download_url: String,
    pub content_type: Option<String>,
}

impl From<GithubAsset> for Asset {
    fn from(raw: GithubAsset) -> Self {
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            size: raw.size.unwrap_or_default(),
            download_url: raw.browser_download_url.unwrap_or_default(),
            content_type: raw.content_type,
        }
    }
}

pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

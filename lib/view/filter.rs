use std::{fmt, str::FromStr};

use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::releases::Release;

/**
    The stable / prerelease dimension of a release list filter.
*/
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub enum Track {
    #[default]
    All,
    Stable,
    Prerelease,
}

impl Track {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Stable => "stable",
            Self::Prerelease => "prerelease",
        }
    }

    /**
        Checks if the given release belongs on this track.
    */
    #[must_use]
    pub const fn includes(self, release: &Release) -> bool {
        match self {
            Self::All => true,
            Self::Stable => !release.prerelease,
            Self::Prerelease => release.prerelease,
        }
    }
}

impl FromStr for Track {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let l = s.trim().to_lowercase();
        match l.as_str() {
            "all" => Ok(Self::All),
            "stable" => Ok(Self::Stable),
            "prerelease" | "pre-release" | "pre" => Ok(Self::Prerelease),
            _ => Err(format!("unknown release track '{l}'")),
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/**
    Transient filter state for a release list - a track, and a free-text query.
*/
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub track: Track,
    pub query: String,
}

impl FilterState {
    #[must_use]
    pub fn new(track: Track, query: impl Into<String>) -> Self {
        Self {
            track,
            query: query.into(),
        }
    }

    /**
        Checks if this filter state would retain every release.
    */
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.track == Track::All && self.query.trim().is_empty()
    }

    /**
        Applies this filter state to the given releases, see [`filter`].
    */
    #[must_use]
    pub fn apply<'a>(&self, releases: &'a [Release]) -> Vec<&'a Release> {
        filter(releases, self.track, &self.query)
    }
}

/**
    Filters releases by track and a case-insensitive free-text query.

    The query, if not blank, must be found in the tag, name, body,
    or any asset file name of a release for it to be retained.
    Draft releases are never retained, and input order is preserved.
*/
#[must_use]
pub fn filter<'a>(releases: &'a [Release], track: Track, query: &str) -> Vec<&'a Release> {
    let query = query.trim().to_lowercase();
    releases
        .iter()
        .filter(|release| !release.draft)
        .filter(|release| track.includes(release))
        .filter(|release| query.is_empty() || search_text(release).contains(&query))
        .collect()
}

/**
    Finds the latest stable release in an already filtered, newest-first list.
*/
#[must_use]
pub fn latest_stable<'a>(filtered: &[&'a Release]) -> Option<&'a Release> {
    filtered.iter().copied().find(|release| !release.prerelease)
}

fn search_text(release: &Release) -> String {
    let asset_names = release
        .assets
        .iter()
        .map(|asset| asset.name.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    [
        release.tag_name.as_str(),
        release.name.as_deref().unwrap_or_default(),
        release.body.as_deref().unwrap_or_default(),
        asset_names.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

use serde::Serialize;

use crate::{
    releases::Release,
    repo::RepoId,
    result::{ReleaseError, ReleaseResult},
    sources::{FetchedReleases, ReleaseOrigin},
};

mod card;
mod filter;

pub use self::card::ReleaseCard;
pub use self::filter::{FilterState, Track, filter, latest_stable};

/**
    The state of a release list, as consumed by a renderer.

    Each variant is a distinct, expected outcome - an empty filter result
    is never confused with an empty repository or a failed fetch.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReleaseListView<'a> {
    /**
        Fetching releases failed and no fallback was usable.

        Renderers should still link to the external release listing.
    */
    Unavailable {
        reason: String,
        status: Option<u16>,
        releases_url: String,
    },
    /**
        Releases were fetched successfully, but there were none.
    */
    NoReleases { releases_url: String },
    /**
        Releases exist, but the current filter state excludes all of them.
    */
    NoMatches {
        #[serde(rename = "filter")]
        state: FilterState,
        total: usize,
    },
    /**
        At least one release matched the current filter state.
    */
    Listing {
        entries: Vec<ReleaseCard<'a>>,
        #[serde(skip)]
        latest_stable: Option<&'a Release>,
        origin: ReleaseOrigin,
    },
}

impl<'a> ReleaseListView<'a> {
    /**
        Derives the release list view from the outcome of a release fetch.
    */
    #[must_use]
    pub fn build(
        repo: &RepoId,
        fetched: &'a ReleaseResult<FetchedReleases>,
        state: &FilterState,
    ) -> Self {
        let fetched = match fetched {
            Ok(fetched) => fetched,
            Err(e) => return Self::unavailable(repo, e),
        };

        let releases = fetched.releases();
        if releases.iter().all(|release| release.draft) {
            return Self::NoReleases {
                releases_url: repo.releases_url(),
            };
        }

        let filtered = state.apply(releases);
        if filtered.is_empty() {
            return Self::NoMatches {
                state: state.clone(),
                total: releases.len(),
            };
        }

        let latest = latest_stable(&filtered);
        let entries = filtered
            .into_iter()
            .map(|release| ReleaseCard::new(release, latest))
            .collect();

        Self::Listing {
            entries,
            latest_stable: latest,
            origin: fetched.origin(),
        }
    }

    fn unavailable(repo: &RepoId, error: &ReleaseError) -> Self {
        Self::Unavailable {
            reason: error.to_string(),
            status: error.status(),
            releases_url: repo.releases_url(),
        }
    }

    /**
        The cards to render, empty unless this is a listing.
    */
    #[must_use]
    pub fn entries(&self) -> &[ReleaseCard<'a>] {
        match self {
            Self::Listing { entries, .. } => entries,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::sources::github::models::GithubRelease;

    use super::*;

    fn raw(id: u64, tag: &str, prerelease: bool, body: &str, published_at: &str) -> GithubRelease {
        GithubRelease {
            id: Some(id),
            tag_name: Some(tag.to_string()),
            body: Some(body.to_string()),
            prerelease: Some(prerelease),
            published_at: Some(published_at.to_string()),
            ..GithubRelease::default()
        }
    }

    fn fetched(releases: Vec<GithubRelease>) -> ReleaseResult<FetchedReleases> {
        let releases: Vec<Release> = crate::releases::normalize(releases);
        Ok(FetchedReleases::new(releases.into(), ReleaseOrigin::Live))
    }

    fn sample() -> ReleaseResult<FetchedReleases> {
        fetched(vec![
            raw(1, "v1.0.0", false, "- Initial release", "2025-01-10T00:00:00Z"),
            raw(3, "v2.0.0-rc.1", true, "- BREAKING: new format", "2025-03-01T00:00:00Z"),
            raw(2, "v1.1.0", false, "- Fixed a crash", "2025-02-01T00:00:00Z"),
        ])
    }

    #[test]
    fn failed_fetch_is_unavailable() {
        let repo = RepoId::default();
        let result = Err(ReleaseError::UpstreamUnavailable {
            status: Some(503),
            reason: "service unavailable".to_string(),
        });
        let view = ReleaseListView::build(&repo, &result, &FilterState::default());
        match view {
            ReleaseListView::Unavailable {
                status,
                releases_url,
                ..
            } => {
                assert_eq!(status, Some(503));
                assert_eq!(releases_url, repo.releases_url());
            }
            other => panic!("expected unavailable view, got {other:?}"),
        }
    }

    #[test]
    fn empty_fetch_is_no_releases() {
        let result = fetched(Vec::new());
        let view = ReleaseListView::build(&RepoId::default(), &result, &FilterState::default());
        assert!(matches!(view, ReleaseListView::NoReleases { .. }));
        assert!(view.entries().is_empty());
    }

    #[test]
    fn empty_filter_result_is_no_matches() {
        let result = sample();
        let state = FilterState::new(Track::Stable, "breaking");
        let view = ReleaseListView::build(&RepoId::default(), &result, &state);
        assert_eq!(
            view,
            ReleaseListView::NoMatches {
                state: state.clone(),
                total: 3,
            }
        );
    }

    #[test]
    fn listing_marks_latest_stable() {
        let result = sample();
        let view = ReleaseListView::build(&RepoId::default(), &result, &FilterState::default());
        let ReleaseListView::Listing {
            entries,
            latest_stable,
            origin,
        } = view
        else {
            panic!("expected listing");
        };
        assert_eq!(origin, ReleaseOrigin::Live);
        assert_eq!(latest_stable.map(|release| release.id), Some(2));
        let tags = entries.iter().map(|card| card.tag).collect::<Vec<_>>();
        assert_eq!(tags, vec!["v2.0.0-rc.1", "v1.1.0", "v1.0.0"]);
        let latest = entries.iter().filter(|card| card.is_latest).count();
        assert_eq!(latest, 1);
        assert!(entries[1].is_latest);
    }

    #[test]
    fn prerelease_track_has_no_latest() {
        let result = sample();
        let state = FilterState::new(Track::Prerelease, "");
        let view = ReleaseListView::build(&RepoId::default(), &result, &state);
        let ReleaseListView::Listing {
            entries,
            latest_stable,
            ..
        } = view
        else {
            panic!("expected listing");
        };
        assert_eq!(entries.len(), 1);
        assert!(latest_stable.is_none());
        assert!(!entries[0].is_latest);
    }

    #[test]
    fn latest_is_unique_without_ids() {
        let untagged = |tag: &str, published_at: &str| GithubRelease {
            id: None,
            ..raw(0, tag, false, "- Maintenance", published_at)
        };
        let result = fetched(vec![
            untagged("v1.0.0", "2025-01-01T00:00:00Z"),
            untagged("v1.1.0", "2025-02-01T00:00:00Z"),
            untagged("v1.2.0", "2025-03-01T00:00:00Z"),
        ]);
        let view = ReleaseListView::build(&RepoId::default(), &result, &FilterState::default());
        let latest = view
            .entries()
            .iter()
            .filter(|card| card.is_latest)
            .map(|card| card.tag)
            .collect::<Vec<_>>();
        assert_eq!(latest, vec!["v1.2.0"]);
    }

    #[test]
    fn serialized_views_name_their_state() {
        let repo = RepoId::default();
        let failed = Err(ReleaseError::UpstreamUnavailable {
            status: Some(503),
            reason: "service unavailable".to_string(),
        });
        let empty = fetched(Vec::new());
        let sample = sample();

        let unavailable = ReleaseListView::build(&repo, &failed, &FilterState::default());
        let value = serde_json::to_value(&unavailable).unwrap();
        assert_eq!(value["state"], "unavailable");
        assert_eq!(value["status"], 503);
        assert_eq!(value["releases_url"], json!(repo.releases_url()));

        let no_releases = ReleaseListView::build(&repo, &empty, &FilterState::default());
        assert_eq!(serde_json::to_value(&no_releases).unwrap()["state"], "no_releases");

        let state = FilterState::new(Track::Stable, "breaking");
        let no_matches = ReleaseListView::build(&repo, &sample, &state);
        let value = serde_json::to_value(&no_matches).unwrap();
        assert_eq!(value["state"], "no_matches");
        assert_eq!(value["filter"], json!({ "track": "stable", "query": "breaking" }));
        assert_eq!(value["total"], 3);

        let listing = ReleaseListView::build(&repo, &sample, &FilterState::default());
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["state"], "listing");
        assert_eq!(value["origin"], "live");
        assert_eq!(value["entries"].as_array().map(Vec::len), Some(3));
    }
}

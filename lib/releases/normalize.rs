use std::cmp::Reverse;

use crate::sources::github::models::GithubRelease;

use super::Release;

/**
    Normalizes raw upstream releases into their internal shape.

    - Draft releases are removed
    - Releases are sorted newest-first by their publish timestamp

    Releases without a (valid) publish timestamp are sorted as if they were
    published at the unix epoch, meaning they end up last. The sort is stable,
    so releases with equal timestamps keep their relative input order.
*/
pub fn normalize(raw: impl IntoIterator<Item = GithubRelease>) -> Vec<Release> {
    let mut releases = raw
        .into_iter()
        .map(Release::from)
        .filter(|release| !release.draft)
        .collect::<Vec<_>>();
    releases.sort_by_key(|release| Reverse(sort_timestamp(release)));
    releases
}

fn sort_timestamp(release: &Release) -> i64 {
    release
        .published_at
        .map_or(0, |published| published.timestamp_millis())
}

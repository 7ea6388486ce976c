use std::ptr;

use serde::Serialize;

use crate::{
    descriptor::{CategorizedAssets, categorize},
    releases::{Highlight, Release, format_release_date},
};

/**
    Presentation record for a single release in a release list.

    Everything in a card is derived from its release, and is
    recomputed whenever the release list is rebuilt.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseCard<'a> {
    pub release: &'a Release,
    pub tag: &'a str,
    pub name: &'a str,
    pub date: String,
    pub highlights: Vec<Highlight>,
    pub assets: CategorizedAssets<'a>,
    pub is_latest: bool,
    pub is_prerelease: bool,
}

impl<'a> ReleaseCard<'a> {
    /**
        Creates the card for a release, given the latest stable release of the
        list it is shown in.

        Releases are compared by identity, so only that exact release is
        marked as latest, even when several releases share an id.
    */
    #[must_use]
    pub fn new(release: &'a Release, latest_stable: Option<&Release>) -> Self {
        Self {
            release,
            tag: &release.tag_name,
            name: release.display_name(),
            date: format_release_date(release.published_at),
            highlights: release.highlights(),
            assets: categorize(&release.assets),
            is_latest: !release.prerelease
                && latest_stable.is_some_and(|latest| ptr::eq(latest, release)),
            is_prerelease: release.prerelease,
        }
    }

    /**
        Checks if this card shows a name distinct from its tag.
    */
    #[must_use]
    pub fn has_distinct_name(&self) -> bool {
        self.name != self.tag
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::releases::Asset;

    use super::*;

    fn release() -> Release {
        Release {
            id: 42,
            name: Some("Spring Update".to_string()),
            tag_name: "v1.3.0".to_string(),
            html_url: None,
            body: Some("## Changes\n- Added COGO tools\n- Fixed DXF layers".to_string()),
            published_at: Some(Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()),
            draft: false,
            prerelease: false,
            assets: vec![
                Asset {
                    id: 1,
                    name: "SiteSurveyor-Windows.zip".to_string(),
                    size: 1024,
                    download_url: String::new(),
                    content_type: None,
                },
                Asset {
                    id: 2,
                    name: "SiteSurveyor-Debian-amd64.deb".to_string(),
                    size: 2048,
                    download_url: String::new(),
                    content_type: None,
                },
            ],
        }
    }

    #[test]
    fn card_derives_everything_from_release() {
        let release = release();
        let card = ReleaseCard::new(&release, Some(&release));
        assert_eq!(card.tag, "v1.3.0");
        assert_eq!(card.name, "Spring Update");
        assert!(card.has_distinct_name());
        assert_eq!(card.date, "Mar 14, 2025");
        assert_eq!(card.highlights.len(), 2);
        assert_eq!(card.assets.windows.len(), 1);
        assert_eq!(card.assets.linux.len(), 1);
        assert!(card.is_latest);
        assert!(!card.is_prerelease);
    }

    #[test]
    fn prerelease_is_never_latest() {
        let mut release = release();
        release.prerelease = true;
        let card = ReleaseCard::new(&release, Some(&release));
        assert!(!card.is_latest);
        assert!(card.is_prerelease);
    }

    #[test]
    fn unnamed_release_uses_tag() {
        let mut release = release();
        release.name = None;
        release.published_at = None;
        let card = ReleaseCard::new(&release, None);
        assert_eq!(card.name, "v1.3.0");
        assert!(!card.has_distinct_name());
        assert_eq!(card.date, "Unpublished");
        assert!(!card.is_latest);
    }

    #[test]
    fn equal_release_is_not_latest() {
        let latest = release();
        let twin = release();
        assert!(!ReleaseCard::new(&twin, Some(&latest)).is_latest);
        assert!(ReleaseCard::new(&latest, Some(&latest)).is_latest);
    }
}

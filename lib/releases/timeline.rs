use super::Release;

/**
    The period label used for releases without a publish timestamp.
*/
pub const UNPUBLISHED_PERIOD: &str = "Unpublished";

/**
    A group of releases published during the same month.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSection<'a> {
    pub period: String,
    pub releases: Vec<&'a Release>,
}

impl TimelineSection<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.releases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}

/**
    Groups releases into sections by the month they were published in, such as `March 2025`.

    Sections are ordered by their first appearance in the given releases, and
    releases within sections keep their relative order - meaning that releases
    sorted newest-first will produce a newest-first timeline.
*/
#[must_use]
pub fn group_by_month(releases: &[Release]) -> Vec<TimelineSection<'_>> {
    let mut sections: Vec<TimelineSection<'_>> = Vec::new();

    for release in releases {
        let period = match release.published_at {
            Some(published_at) => published_at.format("%B %Y").to_string(),
            None => UNPUBLISHED_PERIOD.to_string(),
        };
        match sections.iter_mut().find(|section| section.period == period) {
            Some(section) => section.releases.push(release),
            None => sections.push(TimelineSection {
                period,
                releases: vec![release],
            }),
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use crate::releases::normalize;
    use crate::sources::github::models::GithubRelease;

    use super::*;

    fn raw(tag: &str, published_at: Option<&str>) -> GithubRelease {
        GithubRelease {
            tag_name: Some(tag.to_string()),
            published_at: published_at.map(ToString::to_string),
            ..GithubRelease::default()
        }
    }

    #[test]
    fn groups_by_month_in_order() {
        let releases = normalize(vec![
            raw("v1.2.0", Some("2025-03-20T00:00:00Z")),
            raw("v1.1.0", Some("2025-03-02T00:00:00Z")),
            raw("v1.0.0", Some("2025-01-15T00:00:00Z")),
            raw("v0.1.0", None),
        ]);
        let sections = group_by_month(&releases);
        let summary = sections
            .iter()
            .map(|s| (s.period.as_str(), s.len()))
            .collect::<Vec<_>>();
        assert_eq!(
            summary,
            vec![("March 2025", 2), ("January 2025", 1), ("Unpublished", 1)]
        );
        assert_eq!(sections[0].releases[0].tag_name, "v1.2.0");
    }

    #[test]
    fn empty_timeline() {
        assert!(group_by_month(&[]).is_empty());
    }
}

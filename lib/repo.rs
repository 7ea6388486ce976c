use std::{fmt, str::FromStr};

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

const GITHUB_WEB_URL: &str = "https://github.com";

/**
    Error type representing the possible errors that can occur when parsing a `RepoId`.
*/
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepoIdParseError {
    #[error("repository id is empty")]
    Empty,
    #[error("missing '/' separator")]
    MissingSeparator,
    #[error("owner '{0}' is empty or invalid")]
    InvalidOwner(String),
    #[error("name '{0}' is empty or invalid")]
    InvalidName(String),
}

/**
    A repository identifier on the source-hosting platform, such as `owner/name`.
*/
#[derive(Debug, Clone, PartialEq, Eq, Hash, DeserializeFromStr, SerializeDisplay)]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /**
        The public web page for this repository.
    */
    #[must_use]
    pub fn html_url(&self) -> String {
        format!("{GITHUB_WEB_URL}/{}/{}", self.owner, self.name)
    }

    /**
        The canonical external release listing for this repository.

        Shown to users whenever release data could not be loaded.
    */
    #[must_use]
    pub fn releases_url(&self) -> String {
        format!("{}/releases", self.html_url())
    }
}

impl Default for RepoId {
    fn default() -> Self {
        Self {
            owner: "ConsoleMangena".to_string(),
            name: "sitesurveyor".to_string(),
        }
    }
}

impl Ord for RepoId {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.owner
            .cmp(&other.owner)
            .then_with(|| self.name.cmp(&other.name))
    }
}

impl PartialOrd for RepoId {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for RepoId {
    type Err = RepoIdParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(RepoIdParseError::Empty);
        }

        let Some((before, after)) = s.split_once('/') else {
            return Err(RepoIdParseError::MissingSeparator);
        };

        let before = before.trim();
        let after = after.trim();

        if is_invalid_identifier(before) {
            return Err(RepoIdParseError::InvalidOwner(before.to_string()));
        }
        if is_invalid_identifier(after) {
            return Err(RepoIdParseError::InvalidName(after.to_string()));
        }

        Ok(Self {
            owner: before.to_string(),
            name: after.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

fn is_invalid_identifier(s: &str) -> bool {
    s.is_empty() // Must not be empty
        || s.chars().any(char::is_whitespace) // Must be a single word
        || s.chars().any(|c| c == '/') // Must not contain the separator character
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_id(owner: &str, name: &str) -> RepoId {
        RepoId {
            owner: owner.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn parse_valid_basic() {
        assert_eq!("a/b".parse::<RepoId>().unwrap(), new_id("a", "b"));
        assert_eq!(
            "ConsoleMangena/sitesurveyor".parse::<RepoId>().unwrap(),
            new_id("ConsoleMangena", "sitesurveyor")
        );
    }

    #[test]
    fn parse_valid_extra_whitespace() {
        let id = new_id("a", "b");
        assert_eq!(" a/b".parse::<RepoId>().unwrap(), id);
        assert_eq!("a/ b".parse::<RepoId>().unwrap(), id);
        assert_eq!("a /b ".parse::<RepoId>().unwrap(), id);
    }

    #[test]
    fn parse_invalid_missing() {
        assert_eq!("".parse::<RepoId>(), Err(RepoIdParseError::Empty));
        assert_eq!("   ".parse::<RepoId>(), Err(RepoIdParseError::Empty));
        assert_eq!(
            "sitesurveyor".parse::<RepoId>(),
            Err(RepoIdParseError::MissingSeparator)
        );
        assert!("/".parse::<RepoId>().is_err());
        assert!("a/".parse::<RepoId>().is_err());
        assert!("/b".parse::<RepoId>().is_err());
    }

    #[test]
    fn parse_invalid_extra_separator() {
        assert!("a/b/".parse::<RepoId>().is_err());
        assert!("a/b/c".parse::<RepoId>().is_err());
    }

    #[test]
    fn urls() {
        let id = RepoId::default();
        assert_eq!(id.to_string(), "ConsoleMangena/sitesurveyor");
        assert_eq!(
            id.releases_url(),
            "https://github.com/ConsoleMangena/sitesurveyor/releases"
        );
    }
}

use std::{
    env::var,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    repo::RepoId,
    result::SiteResult,
    util::fs::{load_from_file, path_exists},
};

pub const CONFIG_FILE_NAME: &str = "sitesurveyor.toml";

const ENV_CONFIG_PATH: &str = "SITESURVEYOR_CONFIG";
const ENV_STATUS_FEED: &str = "SITESURVEYOR_STATUS_FEED";
// NOTE: Order matters here, the first token found wins
const ENV_TOKENS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

const DEFAULT_API_BASE_URL: &str = "https://api.github.com";
const DEFAULT_STATUS_FEED_URL: &str = "https://www.githubstatus.com/api/v2/status.json";
const DEFAULT_FALLBACK_MANIFEST: &str = "public/releases.json";

pub const MIN_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const MAX_CACHE_TTL: Duration = Duration::from_secs(15 * 60);

/**
    Configuration for fetching and presenting release data.

    Loaded from a `sitesurveyor.toml` file, with a handful of
    values that may be overridden using environment variables.
*/
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub repository: RepoId,
    pub api_base_url: Url,
    pub fallback_manifest: Option<PathBuf>,
    pub cache_ttl_secs: u64,
    pub issues_per_page: u8,
    pub status_feed_url: Url,
    #[serde(skip)]
    pub token: Option<String>,
}

impl SiteConfig {
    /**
        Loads configuration, in order of priority, from:

        1. The explicitly given path, if any
        2. The path in the `SITESURVEYOR_CONFIG` environment variable
        3. A `sitesurveyor.toml` in the current directory or the user config directory

        Falls back to defaults if no file was found in step 3. Environment
        overrides for the access token and status feed are applied last.

        # Errors

        - If an explicitly given configuration file could not be read or parsed.
        - If a discovered configuration file could not be parsed.
    */
    #[instrument(level = "debug")]
    pub async fn load(explicit: Option<&Path>) -> SiteResult<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => match var(ENV_CONFIG_PATH) {
                Ok(path) => Some(PathBuf::from(path)),
                Err(_) => discover_config_file().await,
            },
        };

        let mut config = match path {
            Some(path) => {
                debug!(?path, "loading configuration");
                load_from_file(path).await?
            }
            None => {
                debug!("no configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides(|key| var(key).ok());
        Ok(config)
    }

    /**
        Applies environment overrides using the given variable lookup.
    */
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let token = ENV_TOKENS
            .iter()
            .filter_map(|key| lookup(key))
            .map(|token| token.trim().to_string())
            .find(|token| !token.is_empty());
        if token.is_some() {
            self.token = token;
        }

        if let Some(feed) = lookup(ENV_STATUS_FEED) {
            match feed.trim().parse::<Url>() {
                Ok(url) => self.status_feed_url = url,
                Err(e) => tracing::warn!("Ignoring invalid {ENV_STATUS_FEED} value '{feed}': {e}"),
            }
        }
    }

    /**
        The time window during which fetched releases may be served from cache.

        Always within the range of 5 to 15 minutes.
    */
    #[must_use]
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs).clamp(MIN_CACHE_TTL, MAX_CACHE_TTL)
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            repository: RepoId::default(),
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API URL is valid"),
            fallback_manifest: Some(PathBuf::from(DEFAULT_FALLBACK_MANIFEST)),
            cache_ttl_secs: MAX_CACHE_TTL.as_secs(),
            issues_per_page: 5,
            status_feed_url: Url::parse(DEFAULT_STATUS_FEED_URL)
                .expect("default status feed URL is valid"),
            token: None,
        }
    }
}

impl FromStr for SiteConfig {
    type Err = toml::de::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

async fn discover_config_file() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("sitesurveyor").join(CONFIG_FILE_NAME));
    }
    for candidate in candidates {
        if path_exists(&candidate).await {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults() {
        let config = SiteConfig::default();
        assert_eq!(config.repository.to_string(), "ConsoleMangena/sitesurveyor");
        assert_eq!(config.api_base_url.as_str(), "https://api.github.com/");
        assert_eq!(config.cache_ttl(), Duration::from_secs(900));
        assert!(config.token.is_none());
    }

    #[test]
    fn parse_partial_file() {
        let config: SiteConfig = "
            repository = \"someone/something\"
            cache_ttl_secs = 600
            fallback_manifest = \"data/releases.json\"
        "
        .parse()
        .unwrap();
        assert_eq!(config.repository.owner(), "someone");
        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
        assert_eq!(
            config.fallback_manifest.as_deref(),
            Some(Path::new("data/releases.json"))
        );
        assert_eq!(config.issues_per_page, 5);
    }

    #[test]
    fn parse_rejects_invalid() {
        assert!("repository = \"no-separator\"".parse::<SiteConfig>().is_err());
        assert!("unknown_key = 1".parse::<SiteConfig>().is_err());
    }

    #[test]
    fn cache_ttl_is_clamped() {
        let mut config = SiteConfig {
            cache_ttl_secs: 1,
            ..SiteConfig::default()
        };
        assert_eq!(config.cache_ttl(), MIN_CACHE_TTL);
        config.cache_ttl_secs = 60 * 60;
        assert_eq!(config.cache_ttl(), MAX_CACHE_TTL);
    }

    #[test]
    fn env_overrides() {
        let env = HashMap::from([
            ("GH_TOKEN", "gho_second"),
            ("GITHUB_TOKEN", " ghp_first "),
            ("SITESURVEYOR_STATUS_FEED", "https://status.example.com/feed.json"),
        ]);
        let mut config = SiteConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(ToString::to_string));
        assert_eq!(config.token.as_deref(), Some("ghp_first"));
        assert_eq!(
            config.status_feed_url.as_str(),
            "https://status.example.com/feed.json"
        );
    }

    #[test]
    fn env_overrides_skip_blank_tokens() {
        let env = HashMap::from([("GITHUB_TOKEN", "  "), ("GH_TOKEN", "gho_second")]);
        let mut config = SiteConfig::default();
        config.apply_env_overrides(|key| env.get(key).map(ToString::to_string));
        assert_eq!(config.token.as_deref(), Some("gho_second"));
    }

    #[tokio::test]
    async fn load_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(CONFIG_FILE_NAME);
        assert!(SiteConfig::load(Some(&missing)).await.is_err());
    }

    #[tokio::test]
    async fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&path, "issues_per_page = 10\n").await.unwrap();
        let config = SiteConfig::load(Some(&path)).await.unwrap();
        assert_eq!(config.issues_per_page, 10);
    }
}

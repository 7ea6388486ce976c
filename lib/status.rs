use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use tracing::{instrument, warn};
use url::Url;

use crate::{releases::parse_timestamp, sources::github::GithubProvider};

const UNAVAILABLE_DESCRIPTION: &str = "Status feed unavailable";

/**
    Severity of the current status, as reported by a status feed.
*/
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub enum StatusIndicator {
    #[default]
    None,
    Minor,
    Major,
    Critical,
    Maintenance,
}

impl StatusIndicator {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
            Self::Maintenance => "maintenance",
        }
    }

    /**
        Checks if this indicator means that everything is operating normally.
    */
    #[must_use]
    pub const fn is_operational(self) -> bool {
        matches!(self, Self::None)
    }
}

impl FromStr for StatusIndicator {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let l = s.trim().to_lowercase();
        Ok(match l.as_str() {
            "none" | "ok" | "operational" | "up" => Self::None,
            "minor" | "degraded" => Self::Minor,
            "major" | "down" | "outage" => Self::Major,
            "critical" => Self::Critical,
            "maintenance" => Self::Maintenance,
            _ => return Err(format!("unknown status indicator '{l}'")),
        })
    }
}

impl fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/**
    A point-in-time snapshot of a service status feed.

    Fetching a snapshot never fails, see [`fetch_status_snapshot`].
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    pub indicator: StatusIndicator,
    pub description: String,
    pub updated_at: DateTime<Utc>,
    pub source: String,
    pub page_url: Option<String>,
}

impl StatusSnapshot {
    /**
        The snapshot used whenever a status feed can not be fetched or understood.
    */
    #[must_use]
    pub fn unavailable(feed_url: &Url) -> Self {
        Self {
            indicator: StatusIndicator::None,
            description: UNAVAILABLE_DESCRIPTION.to_string(),
            updated_at: Utc::now(),
            source: feed_url.to_string(),
            page_url: None,
        }
    }

    /**
        Checks if this snapshot came from an actual feed response.
    */
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.description != UNAVAILABLE_DESCRIPTION
    }
}

// Statuspage style payloads nest the indicator, flat payloads do not
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusPayload {
    Statuspage {
        status: StatuspageStatus,
        page: Option<StatuspagePage>,
    },
    Flat {
        status: StatusIndicator,
        description: Option<String>,
        #[serde(alias = "updatedAt")]
        updated_at: Option<String>,
        source: Option<String>,
        #[serde(alias = "pageUrl")]
        page_url: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct StatuspageStatus {
    indicator: StatusIndicator,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatuspagePage {
    name: Option<String>,
    url: Option<String>,
    updated_at: Option<String>,
}

/**
    Parses a status feed payload in either of the supported shapes.

    Returns `None` if the payload matches neither of them.
*/
#[must_use]
pub fn parse_status_payload(payload: serde_json::Value, feed_url: &Url) -> Option<StatusSnapshot> {
    let updated = |s: Option<String>| {
        s.as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(Utc::now)
    };
    let snapshot = match serde_json::from_value::<StatusPayload>(payload).ok()? {
        StatusPayload::Statuspage { status, page } => {
            let (name, url, updated_at) = match page {
                Some(page) => (page.name, page.url, page.updated_at),
                None => (None, None, None),
            };
            StatusSnapshot {
                indicator: status.indicator,
                description: status.description.unwrap_or_else(|| "Operational".to_string()),
                updated_at: updated(updated_at),
                source: name.unwrap_or_else(|| "Status".to_string()),
                page_url: url,
            }
        }
        StatusPayload::Flat {
            status,
            description,
            updated_at,
            source,
            page_url,
        } => StatusSnapshot {
            indicator: status,
            description: description.unwrap_or_else(|| "Status".to_string()),
            updated_at: updated(updated_at),
            source: source.unwrap_or_else(|| feed_url.to_string()),
            page_url,
        },
    };
    Some(snapshot)
}

/**
    Fetches the current status from the given feed.

    Any failure, be it network, HTTP status, or an unknown payload
    shape, degrades to [`StatusSnapshot::unavailable`].
*/
#[instrument(skip(provider), fields(%feed_url), level = "debug")]
pub async fn fetch_status_snapshot(provider: &GithubProvider, feed_url: &Url) -> StatusSnapshot {
    match provider.get_status_feed(feed_url).await {
        Ok(payload) => parse_status_payload(payload, feed_url).unwrap_or_else(|| {
            warn!("Status feed at {feed_url} returned an unrecognized payload");
            StatusSnapshot::unavailable(feed_url)
        }),
        Err(e) => {
            warn!("Failed to fetch status feed at {feed_url}\nError: {e}");
            StatusSnapshot::unavailable(feed_url)
        }
    }
}

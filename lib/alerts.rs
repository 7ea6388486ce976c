use std::{error::Error as StdError, fmt, future::Future, str::FromStr};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::{result::ValidationError, validate::validate_email};

/**
    The collection that release alert subscriptions are stored in.
*/
pub const ALERTS_COLLECTION: &str = "release-alerts";

const ALERT_SOURCE: &str = "downloads-page";

/**
    How often a subscriber wants to hear about new releases.
*/
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr, SerializeDisplay,
)]
pub enum AlertFrequency {
    #[default]
    Immediate,
    Daily,
    Weekly,
}

impl AlertFrequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Immediate => "Every release",
            Self::Daily => "Daily digest",
            Self::Weekly => "Weekly summary",
        }
    }
}

impl FromStr for AlertFrequency {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let l = s.trim().to_lowercase();
        match l.as_str() {
            "immediate" => Ok(Self::Immediate),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!("unknown alert frequency '{l}'")),
        }
    }
}

impl fmt::Display for AlertFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

/**
    A validated request to be notified about new releases.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSubscription {
    email: String,
    frequency: AlertFrequency,
    created_at: DateTime<Utc>,
    source: &'static str,
}

impl AlertSubscription {
    /**
        Creates a new subscription, checking the email address locally.

        # Errors

        - If the email address is empty or malformed.
    */
    pub fn new(email: &str, frequency: AlertFrequency) -> Result<Self, ValidationError> {
        Ok(Self {
            email: validate_email(email)?,
            frequency,
            created_at: Utc::now(),
            source: ALERT_SOURCE,
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn frequency(&self) -> AlertFrequency {
        self.frequency
    }
}

/**
    An opaque store of JSON documents, grouped into collections.
*/
pub trait DocumentStore {
    type Error: StdError + Send + Sync + 'static;

    /**
        Creates a new document in a collection, returning its unique id.
    */
    fn create_document(
        &self,
        collection: &str,
        document: serde_json::Value,
    ) -> impl Future<Output = Result<String, Self::Error>> + Send;
}

#[derive(Debug, Error)]
pub enum AlertError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to serialize alert subscription: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unable to register for alerts: {0}")]
    Store(Box<dyn StdError + Send + Sync>),
}

/**
    The outcome of a successful call to [`register_alert`].
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertOutcome {
    Registered { document_id: String },
    NotConfigured,
}

/**
    Registers a release alert subscription in the given document store.

    The email address is validated before the store is checked, so invalid
    input is reported even if no store has been configured.

    # Errors

    - If the email address is invalid.
    - If the document store failed to create the subscription document.
*/
#[instrument(skip(store, email), level = "debug")]
pub async fn register_alert<S: DocumentStore>(
    store: Option<&S>,
    email: &str,
    frequency: AlertFrequency,
) -> Result<AlertOutcome, AlertError> {
    let subscription = AlertSubscription::new(email, frequency)?;

    let Some(store) = store else {
        debug!("no document store configured, skipping alert registration");
        return Ok(AlertOutcome::NotConfigured);
    };

    let document = serde_json::to_value(&subscription)?;
    match store.create_document(ALERTS_COLLECTION, document).await {
        Ok(document_id) => Ok(AlertOutcome::Registered { document_id }),
        Err(e) => {
            warn!("Failed to register release alert\nError: {e}");
            Err(AlertError::Store(Box::new(e)))
        }
    }
}

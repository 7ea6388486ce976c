#![allow(clippy::missing_errors_doc)]

use std::{error::Error as StdError, fmt, future::Future};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    result::ValidationError,
    validate::{validate_email, validate_password},
};

/**
    Additional, optional information stored in the preferences of a user.
*/
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/**
    A signed in user, as reported by an identity provider.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub prefs: UserProfile,
}

/**
    External services that an identity provider may delegate sign-in to.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OAuthProvider {
    Github,
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Github => "github".fmt(f),
        }
    }
}

/**
    An external identity provider, holding session state outside of this process.
*/
pub trait IdentityProvider {
    type Error: StdError + Send + Sync + 'static;

    /**
        Gets the user of the current session, or `None` if there is no session.
    */
    fn current_session(&self) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send;

    fn create_session(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> impl Future<Output = Result<User, Self::Error>> + Send;

    fn set_preferences(
        &self,
        profile: &UserProfile,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn delete_session(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /**
        Gets the URL to redirect to for signing in with an external service.
    */
    fn oauth_redirect_url(&self, provider: OAuthProvider) -> Result<Url, Self::Error>;
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("authentication is not configured")]
    NotConfigured,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("identity provider error: {0}")]
    Provider(Box<dyn StdError + Send + Sync>),
}

impl IdentityError {
    fn provider(err: impl StdError + Send + Sync + 'static) -> Self {
        Self::Provider(Box::new(err))
    }
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/**
    Explicit authentication context, passed to anything that needs the current user.

    The lifecycle of a context is:

    1. [`AuthContext::initialize`] once, when the application starts
    2. [`AuthContext::refresh`] whenever the session may have changed
    3. [`AuthContext::logout`] to end the session and clear the user

    A context without a provider is valid, and simply never has a user.
*/
#[derive(Debug)]
pub struct AuthContext<P> {
    provider: Option<P>,
    user: Option<User>,
    loading: bool,
}

impl<P: IdentityProvider> AuthContext<P> {
    #[must_use]
    pub fn new(provider: Option<P>) -> Self {
        Self {
            provider,
            user: None,
            loading: true,
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    fn provider(&self) -> IdentityResult<&P> {
        self.provider.as_ref().ok_or(IdentityError::NotConfigured)
    }

    /**
        Checks for an existing session, and stores its user.
    */
    pub async fn initialize(&mut self) -> Option<&User> {
        self.refresh().await
    }

    /**
        Checks the current session again, replacing the stored user.

        A failed session check is treated the same as having no session.
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn refresh(&mut self) -> Option<&User> {
        self.user = match &self.provider {
            None => None,
            Some(provider) => match provider.current_session().await {
                Ok(user) => user,
                Err(e) => {
                    debug!("session check failed, treating as signed out: {e}");
                    None
                }
            },
        };
        self.loading = false;
        self.user.as_ref()
    }

    /**
        Signs in with an email and password, and refreshes the current user.
    */
    #[instrument(skip(self, email, password), level = "debug")]
    pub async fn login(&mut self, email: &str, password: &str) -> IdentityResult<Option<&User>> {
        let email = validate_email(email)?;
        validate_password(password)?;

        let provider = self.provider()?;
        provider
            .create_session(&email, password)
            .await
            .map_err(IdentityError::provider)?;

        Ok(self.refresh().await)
    }

    /**
        Creates an account, signs in to it, and stores the given profile as its preferences.
    */
    #[instrument(skip(self, email, password, name, profile), level = "debug")]
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
        profile: &UserProfile,
    ) -> IdentityResult<Option<&User>> {
        let email = validate_email(email)?;
        validate_password(password)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField { field: "name" }.into());
        }

        let provider = self.provider()?;
        provider
            .create_account(&email, password, name)
            .await
            .map_err(IdentityError::provider)?;
        provider
            .create_session(&email, password)
            .await
            .map_err(IdentityError::provider)?;
        if let Err(e) = provider.set_preferences(profile).await {
            warn!("Account was created, but storing its profile failed\nError: {e}");
        }

        Ok(self.refresh().await)
    }

    /**
        Ends the current session, and clears the stored user.

        The user is cleared even if the provider fails to end the session.
    */
    #[instrument(skip(self), level = "debug")]
    pub async fn logout(&mut self) -> IdentityResult<()> {
        let result = match &self.provider {
            None => Ok(()),
            Some(provider) => provider
                .delete_session()
                .await
                .map_err(IdentityError::provider),
        };
        self.user = None;
        result
    }

    /**
        Gets the URL to redirect to for signing in with an external service.
    */
    pub fn oauth_redirect_url(&self, provider: OAuthProvider) -> IdentityResult<Url> {
        self.provider()?
            .oauth_redirect_url(provider)
            .map_err(IdentityError::provider)
    }
}

#[cfg(test)]
mod tests {
    use std::{io, sync::Mutex};

    use super::*;

    #[derive(Default)]
    struct MemoryIdentity {
        accounts: Mutex<Vec<(User, String)>>,
        session: Mutex<Option<User>>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl MemoryIdentity {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl IdentityProvider for MemoryIdentity {
        type Error = io::Error;

        async fn current_session(&self) -> io::Result<Option<User>> {
            self.record("current_session");
            Ok(self.session.lock().unwrap().clone())
        }

        async fn create_session(&self, email: &str, password: &str) -> io::Result<()> {
            self.record("create_session");
            let accounts = self.accounts.lock().unwrap();
            let user = accounts
                .iter()
                .find(|(user, pw)| user.email == email && pw == password)
                .map(|(user, _)| user.clone())
                .ok_or_else(|| io::Error::new(io::ErrorKind::PermissionDenied, "bad credentials"))?;
            *self.session.lock().unwrap() = Some(user);
            Ok(())
        }

        async fn create_account(&self, email: &str, password: &str, name: &str) -> io::Result<User> {
            self.record("create_account");
            let user = User {
                id: format!("user-{email}"),
                email: email.to_string(),
                name: name.to_string(),
                prefs: UserProfile::default(),
            };
            self.accounts
                .lock()
                .unwrap()
                .push((user.clone(), password.to_string()));
            Ok(user)
        }

        async fn set_preferences(&self, profile: &UserProfile) -> io::Result<()> {
            self.record("set_preferences");
            if let Some(user) = self.session.lock().unwrap().as_mut() {
                user.prefs = profile.clone();
            }
            Ok(())
        }

        async fn delete_session(&self) -> io::Result<()> {
            self.record("delete_session");
            *self.session.lock().unwrap() = None;
            Ok(())
        }

        fn oauth_redirect_url(&self, provider: OAuthProvider) -> io::Result<Url> {
            Url::parse(&format!("https://identity.example.com/oauth2/{provider}"))
                .map_err(io::Error::other)
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            organization: Some("Harare Land Surveys".to_string()),
            country: Some("Zimbabwe".to_string()),
            ..UserProfile::default()
        }
    }

    #[tokio::test]
    async fn unconfigured_context() {
        let mut ctx = AuthContext::<MemoryIdentity>::new(None);
        assert!(ctx.is_loading());
        assert!(ctx.initialize().await.is_none());
        assert!(!ctx.is_loading());
        assert!(!ctx.is_configured());
        assert!(matches!(
            ctx.login("surveyor@example.com", "password123").await,
            Err(IdentityError::NotConfigured)
        ));
        assert!(matches!(
            ctx.oauth_redirect_url(OAuthProvider::Github),
            Err(IdentityError::NotConfigured)
        ));
        assert!(ctx.logout().await.is_ok());
    }

    #[tokio::test]
    async fn register_login_logout() {
        let mut ctx = AuthContext::new(Some(MemoryIdentity::default()));
        assert!(ctx.initialize().await.is_none());

        let user = ctx
            .register("surveyor@example.com", "password123", "Tendai", &profile())
            .await
            .unwrap()
            .cloned()
            .unwrap();
        assert_eq!(user.name, "Tendai");
        assert_eq!(user.prefs, profile());

        ctx.logout().await.unwrap();
        assert!(ctx.user().is_none());

        let user = ctx
            .login(" surveyor@example.com ", "password123")
            .await
            .unwrap()
            .cloned();
        assert_eq!(user.map(|u| u.email), Some("surveyor@example.com".to_string()));

        let calls = ctx.provider.as_ref().unwrap().calls();
        assert_eq!(
            calls,
            vec![
                "current_session",
                "create_account",
                "create_session",
                "set_preferences",
                "current_session",
                "delete_session",
                "create_session",
                "current_session",
            ]
        );
    }

    #[tokio::test]
    async fn validation_happens_before_any_call() {
        let mut ctx = AuthContext::new(Some(MemoryIdentity::default()));
        assert!(matches!(
            ctx.login("nope", "password123").await,
            Err(IdentityError::Validation(ValidationError::InvalidEmail(_)))
        ));
        assert!(matches!(
            ctx.login("surveyor@example.com", "short").await,
            Err(IdentityError::Validation(ValidationError::PasswordTooShort { min: 8 }))
        ));
        assert!(matches!(
            ctx.register("surveyor@example.com", "password123", "  ", &profile())
                .await,
            Err(IdentityError::Validation(ValidationError::MissingField { field: "name" }))
        ));
        assert!(ctx.provider.as_ref().unwrap().calls().is_empty());
    }

    #[tokio::test]
    async fn bad_credentials() {
        let mut ctx = AuthContext::new(Some(MemoryIdentity::default()));
        let err = ctx
            .login("surveyor@example.com", "password123")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Provider(_)));
        assert!(ctx.user().is_none());
    }

    #[test]
    fn oauth_redirect() {
        let ctx = AuthContext::new(Some(MemoryIdentity::default()));
        let url = ctx.oauth_redirect_url(OAuthProvider::Github).unwrap();
        assert_eq!(url.as_str(), "https://identity.example.com/oauth2/github");
    }
}

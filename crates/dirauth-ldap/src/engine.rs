//! The verification engine.
//!
//! A verification walks a fixed sequence of stages:
//!
//! ```text
//! ServiceConnect -> ServiceBind -> Search -> CredentialConnect -> CredentialBind -> Done
//! ```
//!
//! The search connection is released before the credential connection is opened, so the two
//! identities never share a connection. Any stage may fail; nothing is retried.

use secrecy::SecretString;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use dirauth_core::{AuthError, Identity, Result, Stage};

use crate::config::DirectoryConfig;
use crate::connection::{
    bounded, release, service_bind, DirectoryConnector, DirectorySession, LdapConnector,
};
use crate::entry::UserEntry;
use crate::normalize::normalize;
use crate::resolver::UserResolver;
use crate::verifier::{ensure_password, CredentialVerifier};

enum Step<'p> {
    ServiceConnect,
    ServiceBind(Box<dyn DirectorySession>),
    Search(Box<dyn DirectorySession>),
    CredentialConnect(UserEntry, &'p SecretString),
    CredentialBind(Box<dyn DirectorySession>, UserEntry, &'p SecretString),
    Done(Identity),
}

impl Step<'_> {
    const fn stage(&self) -> Option<Stage> {
        match self {
            Self::ServiceConnect => Some(Stage::ServiceConnect),
            Self::ServiceBind(_) => Some(Stage::ServiceBind),
            Self::Search(_) => Some(Stage::Search),
            Self::CredentialConnect(..) => Some(Stage::CredentialConnect),
            Self::CredentialBind(..) => Some(Stage::CredentialBind),
            Self::Done(_) => None,
        }
    }
}

/// Verifies username/password pairs against a directory.
///
/// The engine holds only immutable configuration and a connector; every call opens its own
/// connections, so one engine can serve concurrent verifications.
#[derive(Clone)]
pub struct VerificationEngine {
    config: Arc<DirectoryConfig>,
    connector: Arc<dyn DirectoryConnector>,
}

impl std::fmt::Debug for VerificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VerificationEngine {
    /// Creates an engine that talks to the configured directory over LDAP.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if TLS material cannot be loaded.
    pub fn new(config: DirectoryConfig) -> Result<Self> {
        let config = Arc::new(config);
        let connector = LdapConnector::new(Arc::clone(&config))?;
        Ok(Self {
            config,
            connector: Arc::new(connector),
        })
    }

    /// Creates an engine over a custom connector.
    #[must_use]
    pub fn with_connector(config: DirectoryConfig, connector: Arc<dyn DirectoryConnector>) -> Self {
        Self {
            config: Arc::new(config),
            connector,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Verifies `username` and `password`, returning the normalized identity on success.
    ///
    /// Input is validated before any network activity. An unknown user, an ambiguous match
    /// and a wrong password are distinct errors here, but all three share the same
    /// [`AuthError::public_message`].
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidIdentifier`] for a malformed username or an empty password
    /// - [`AuthError::Connection`] for transport failures and timeouts, tagged with the stage
    /// - [`AuthError::ServiceBind`] if the directory rejects the service identity
    /// - [`AuthError::UserNotFound`] / [`AuthError::AmbiguousUser`] from the search
    /// - [`AuthError::CredentialInvalid`] if the directory rejects the password
    pub async fn verify(&self, username: &str, password: &SecretString) -> Result<Identity> {
        let result = match self.precheck(username, Some(password)) {
            Ok(()) => self.run(username, Some(password)).await,
            Err(err) => Err(err),
        };
        self.record(username, &result, "verified");
        result
    }

    /// Resolves `username` to its identity without checking a password.
    ///
    /// Runs the service-bound search only; the credential phase is skipped.
    ///
    /// # Errors
    ///
    /// Same as [`Self::verify`], minus [`AuthError::CredentialInvalid`].
    pub async fn lookup(&self, username: &str) -> Result<Identity> {
        let result = match self.precheck(username, None) {
            Ok(()) => self.run(username, None).await,
            Err(err) => Err(err),
        };
        self.record(username, &result, "resolved");
        result
    }

    /// Connects and binds as the service identity, then releases the connection.
    ///
    /// Useful as a readiness probe for the directory integration.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Connection`] or [`AuthError::ServiceBind`].
    pub async fn check_service_bind(&self) -> Result<()> {
        let mut session = self.open_service().await?;
        let result = service_bind(
            session.as_mut(),
            self.config.credential(),
            self.config.search_timeout(),
        )
        .await;
        if let Err(err) = &result {
            error!(code = err.error_code(), "service bind check failed: {err}");
        }
        release(session, self.config.bind_timeout()).await;
        result
    }

    fn precheck(&self, username: &str, password: Option<&SecretString>) -> Result<()> {
        UserResolver::new(&self.config).filter_for(username)?;
        if let Some(password) = password {
            ensure_password(password)?;
        }
        Ok(())
    }

    async fn run(&self, username: &str, password: Option<&SecretString>) -> Result<Identity> {
        let mut step = Step::ServiceConnect;
        loop {
            if let Some(stage) = step.stage() {
                debug!(username, %stage, "entering stage");
            }
            step = match step {
                Step::ServiceConnect => Step::ServiceBind(self.open_service().await?),
                Step::ServiceBind(mut session) => {
                    service_bind(
                        session.as_mut(),
                        self.config.credential(),
                        self.config.search_timeout(),
                    )
                    .await?;
                    Step::Search(session)
                }
                Step::Search(mut session) => {
                    let entry = UserResolver::new(&self.config)
                        .resolve(session.as_mut(), username)
                        .await?;
                    release(session, self.config.bind_timeout()).await;
                    debug!(username, dn = %entry.dn, "resolved directory entry");
                    match password {
                        Some(password) => Step::CredentialConnect(entry, password),
                        None => Step::Done(self.identity(&entry, username)),
                    }
                }
                Step::CredentialConnect(entry, password) => {
                    Step::CredentialBind(self.verifier().open().await?, entry, password)
                }
                Step::CredentialBind(session, entry, password) => {
                    let accepted = self.verifier().bind(session, &entry.dn, password).await?;
                    if !accepted {
                        return Err(AuthError::CredentialInvalid);
                    }
                    Step::Done(self.identity(&entry, username))
                }
                Step::Done(identity) => return Ok(identity),
            };
        }
    }

    async fn open_service(&self) -> Result<Box<dyn DirectorySession>> {
        bounded(
            Stage::ServiceConnect,
            self.config.connect_timeout(),
            self.connector.connect(),
        )
        .await
    }

    fn verifier(&self) -> CredentialVerifier<'_> {
        CredentialVerifier::new(self.connector.as_ref(), &self.config)
    }

    fn identity(&self, entry: &UserEntry, username: &str) -> Identity {
        normalize(entry, self.config.attribute_map(), username)
    }

    fn record(&self, username: &str, result: &Result<Identity>, outcome: &str) {
        match result {
            Ok(identity) => info!(username = %identity.username, "{outcome} directory user"),
            Err(err) if err.should_log() => {
                error!(username, code = err.error_code(), "directory integration failure: {err}");
            }
            Err(err) if err.is_user_facing() => {
                warn!(code = err.error_code(), "directory verification refused");
            }
            Err(err) => {
                warn!(
                    username,
                    code = err.error_code(),
                    stage = ?err.stage(),
                    "directory unavailable: {err}"
                );
            }
        }
    }
}

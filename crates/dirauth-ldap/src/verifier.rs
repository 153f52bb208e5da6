//! Credential verification on an isolated connection.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use dirauth_core::{AuthError, Result, Stage};

use crate::config::DirectoryConfig;
use crate::connection::{bounded, release, BindOutcome, DirectoryConnector, DirectorySession};

/// Binds as a resolved entry with the caller's password.
///
/// Each verification opens its own connection, separate from the one used for searching, and
/// binds exactly once. The service identity never touches this connection.
#[derive(Clone, Copy)]
pub struct CredentialVerifier<'a> {
    connector: &'a dyn DirectoryConnector,
    config: &'a DirectoryConfig,
}

impl<'a> CredentialVerifier<'a> {
    /// Creates a verifier.
    #[must_use]
    pub fn new(connector: &'a dyn DirectoryConnector, config: &'a DirectoryConfig) -> Self {
        Self { connector, config }
    }

    /// Opens the verification-phase connection.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Connection`] (stage [`Stage::CredentialConnect`]) on failure.
    pub async fn open(&self) -> Result<Box<dyn DirectorySession>> {
        bounded(
            Stage::CredentialConnect,
            self.config.connect_timeout(),
            self.connector.connect(),
        )
        .await
    }

    /// Binds `session` as `dn` and releases it.
    ///
    /// Returns `Ok(false)` when the directory rejects the password.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidIdentifier`] for an empty password (no bind is attempted)
    /// - [`AuthError::Connection`] (stage [`Stage::CredentialBind`]) on transport failure or
    ///   timeout
    pub async fn bind(
        &self,
        mut session: Box<dyn DirectorySession>,
        dn: &str,
        password: &SecretString,
    ) -> Result<bool> {
        ensure_password(password)?;

        let outcome = bounded(
            Stage::CredentialBind,
            self.config.bind_timeout(),
            session.simple_bind(dn, password),
        )
        .await?;
        release(session, self.config.bind_timeout()).await;

        match outcome {
            BindOutcome::Bound => Ok(true),
            BindOutcome::Rejected { code, .. } => {
                debug!(code, "credential bind rejected");
                Ok(false)
            }
        }
    }

    /// Opens a connection and binds as `dn`.
    ///
    /// # Errors
    ///
    /// See [`Self::open`] and [`Self::bind`]. The empty-password check happens before the
    /// connection is opened.
    pub async fn verify(&self, dn: &str, password: &SecretString) -> Result<bool> {
        ensure_password(password)?;
        let session = self.open().await?;
        self.bind(session, dn, password).await
    }
}

/// Rejects an empty password; an unauthenticated bind must never count as success.
pub(crate) fn ensure_password(password: &SecretString) -> Result<()> {
    if password.expose_secret().is_empty() {
        return Err(AuthError::InvalidIdentifier(
            "password must not be empty".to_string(),
        ));
    }
    Ok(())
}

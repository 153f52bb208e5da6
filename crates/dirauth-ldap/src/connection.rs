//! Directory connections.
//!
//! A [`DirectoryConnector`] hands out one fresh [`DirectorySession`] per call to
//! [`DirectoryConnector::connect`]; sessions are never pooled or shared. Dropping a session
//! closes its connection, so every early return (and a cancelled future) releases it; the
//! normal path additionally unbinds through [`release`].

use async_trait::async_trait;
use ldap3::{LdapConnAsync, LdapConnSettings, Scope, SearchEntry, SearchOptions, SearchResult};
use native_tls::{Certificate, TlsConnector};
use secrecy::{ExposeSecret, SecretString};
use std::fs;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

use dirauth_core::{AuthError, Result, ServiceCredential, Stage};

use crate::config::DirectoryConfig;
use crate::entry::UserEntry;

const RC_SUCCESS: u32 = 0;
const RC_SIZE_LIMIT_EXCEEDED: u32 = 4;
const RC_REFERRAL: u32 = 10;
const RC_INAPPROPRIATE_AUTHENTICATION: u32 = 48;
const RC_INVALID_CREDENTIALS: u32 = 49;

/// Transport-level failure reported by a [`DirectorySession`].
///
/// Sessions do not know which verification stage they serve; callers attach it with
/// [`DirectoryError::at`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The connection could not be established or broke.
    #[error("{0}")]
    Transport(String),

    /// The directory answered with a referral, which is never followed.
    #[error("directory returned a referral; referrals are not followed")]
    Referral,

    /// The directory answered with an unexpected result code.
    #[error("directory returned result code {code}: {message}")]
    Protocol {
        /// LDAP result code
        code: u32,
        /// Diagnostic message from the server
        message: String,
    },
}

impl DirectoryError {
    /// Classifies the failure as a connection error in `stage`.
    #[must_use]
    pub fn at(self, stage: Stage) -> AuthError {
        AuthError::connection(stage, self.to_string())
    }
}

/// Outcome of a simple bind that reached the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome {
    /// The directory accepted the credentials.
    Bound,
    /// The directory rejected the credentials.
    Rejected {
        /// LDAP result code
        code: u32,
        /// Diagnostic message from the server
        message: String,
    },
}

/// A single connection to the directory.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectorySession: Send {
    /// Performs a simple bind.
    async fn simple_bind(
        &mut self,
        dn: &str,
        password: &SecretString,
    ) -> std::result::Result<BindOutcome, DirectoryError>;

    /// Runs a subtree search below `base_dn` returning at most `size_limit` entries.
    ///
    /// Hitting the size limit is not an error; the entries received so far are returned.
    async fn search(
        &mut self,
        base_dn: &str,
        filter: &str,
        attributes: &[String],
        size_limit: usize,
    ) -> std::result::Result<Vec<UserEntry>, DirectoryError>;

    /// Unbinds and closes the connection.
    async fn unbind(&mut self) -> std::result::Result<(), DirectoryError>;
}

/// Opens fresh directory sessions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryConnector: Send + Sync {
    /// Opens a new, unbound session.
    async fn connect(&self) -> std::result::Result<Box<dyn DirectorySession>, DirectoryError>;
}

/// Runs `fut` as `stage`, bounded by `limit`.
pub(crate) async fn bounded<F, T>(stage: Stage, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, DirectoryError>>,
{
    match timeout(limit, fut).await {
        Ok(result) => result.map_err(|err| err.at(stage)),
        Err(_) => Err(AuthError::timeout(stage)),
    }
}

/// Unbinds a session that is no longer needed.
///
/// A failed unbind is only logged: the session is dropped either way, which closes the
/// connection.
pub(crate) async fn release(mut session: Box<dyn DirectorySession>, limit: Duration) {
    match timeout(limit, session.unbind()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => debug!("directory unbind failed: {err}"),
        Err(_) => debug!("directory unbind timed out"),
    }
}

/// Binds `session` as the service identity.
///
/// # Errors
///
/// Returns [`AuthError::ServiceBind`] if the directory rejects the service identity and
/// [`AuthError::Connection`] (stage [`Stage::ServiceBind`]) on transport failure.
pub async fn service_bind(
    session: &mut dyn DirectorySession,
    credential: &ServiceCredential,
    limit: Duration,
) -> Result<()> {
    // An empty secret would turn this into an anonymous bind.
    if credential.has_empty_secret() {
        return Err(AuthError::ServiceBind(
            "service credential has an empty secret".to_string(),
        ));
    }

    let outcome = bounded(
        Stage::ServiceBind,
        limit,
        session.simple_bind(credential.bind_dn(), credential.bind_secret()),
    )
    .await?;

    match outcome {
        BindOutcome::Bound => Ok(()),
        BindOutcome::Rejected { code, message } => Err(AuthError::ServiceBind(format!(
            "`{}` rejected with result code {code}: {message}",
            credential.bind_dn()
        ))),
    }
}

/// Connector backed by `ldap3`.
pub struct LdapConnector {
    config: Arc<DirectoryConfig>,
    tls: Option<TlsConnector>,
}

impl LdapConnector {
    /// Creates a connector, loading TLS material up front.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the CA certificate cannot be read or the TLS
    /// connector cannot be built.
    pub fn new(config: Arc<DirectoryConfig>) -> Result<Self> {
        let tls = build_tls_connector(&config)?;
        Ok(Self { config, tls })
    }

    fn settings(&self) -> LdapConnSettings {
        let mut settings = LdapConnSettings::new()
            .set_conn_timeout(self.config.connect_timeout())
            .set_starttls(self.config.starttls());

        if let Some(connector) = &self.tls {
            settings = settings.set_connector(connector.clone());
        }
        if !self.config.tls_verify() {
            settings = settings.set_no_tls_verify(true);
        }
        settings
    }
}

#[async_trait]
impl DirectoryConnector for LdapConnector {
    async fn connect(&self) -> std::result::Result<Box<dyn DirectorySession>, DirectoryError> {
        let (conn, ldap) = LdapConnAsync::with_settings(self.settings(), &self.config.url())
            .await
            .map_err(map_ldap_error)?;
        ldap3::drive!(conn);
        Ok(Box::new(LdapSession { inner: ldap }))
    }
}

struct LdapSession {
    inner: ldap3::Ldap,
}

#[async_trait]
impl DirectorySession for LdapSession {
    async fn simple_bind(
        &mut self,
        dn: &str,
        password: &SecretString,
    ) -> std::result::Result<BindOutcome, DirectoryError> {
        let result = self
            .inner
            .simple_bind(dn, password.expose_secret())
            .await
            .map_err(map_ldap_error)?;

        match result.rc {
            RC_SUCCESS => Ok(BindOutcome::Bound),
            RC_INVALID_CREDENTIALS | RC_INAPPROPRIATE_AUTHENTICATION => Ok(BindOutcome::Rejected {
                code: result.rc,
                message: result.text,
            }),
            RC_REFERRAL => Err(DirectoryError::Referral),
            code => Err(DirectoryError::Protocol {
                code,
                message: result.text,
            }),
        }
    }

    async fn search(
        &mut self,
        base_dn: &str,
        filter: &str,
        attributes: &[String],
        size_limit: usize,
    ) -> std::result::Result<Vec<UserEntry>, DirectoryError> {
        let options = SearchOptions::new().sizelimit(i32::try_from(size_limit).unwrap_or(i32::MAX));
        let SearchResult(entries, result) = self
            .inner
            .with_search_options(options)
            .search(base_dn, Scope::Subtree, filter, attributes.to_vec())
            .await
            .map_err(map_ldap_error)?;

        match result.rc {
            RC_SUCCESS | RC_SIZE_LIMIT_EXCEEDED => {}
            RC_REFERRAL => return Err(DirectoryError::Referral),
            code => {
                return Err(DirectoryError::Protocol {
                    code,
                    message: result.text,
                })
            }
        }

        let mut users = Vec::with_capacity(entries.len());
        for entry in entries {
            if entry.is_ref() || entry.is_intermediate() {
                warn!("ignoring search continuation reference; referrals are not followed");
                continue;
            }
            users.push(UserEntry::from(SearchEntry::construct(entry)));
        }
        Ok(users)
    }

    async fn unbind(&mut self) -> std::result::Result<(), DirectoryError> {
        self.inner.unbind().await.map_err(map_ldap_error)
    }
}

fn build_tls_connector(config: &DirectoryConfig) -> Result<Option<TlsConnector>> {
    if !config.tls_verify() {
        warn!("TLS verification disabled for directory connections");
        let connector = TlsConnector::builder()
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|err| {
                AuthError::Configuration(format!("failed to construct TLS connector: {err}"))
            })?;
        return Ok(Some(connector));
    }

    let Some(cert_path) = config.tls_ca_cert() else {
        return Ok(None);
    };

    debug!("loading directory CA certificate from {}", cert_path.display());
    let pem = fs::read(cert_path).map_err(|err| {
        AuthError::Configuration(format!(
            "failed to read directory CA certificate {}: {err}",
            cert_path.display()
        ))
    })?;
    let certificate = Certificate::from_pem(&pem).map_err(|err| {
        AuthError::Configuration(format!("invalid directory CA certificate: {err}"))
    })?;
    let connector = TlsConnector::builder()
        .add_root_certificate(certificate)
        .build()
        .map_err(|err| {
            AuthError::Configuration(format!("failed to load directory CA certificate: {err}"))
        })?;
    Ok(Some(connector))
}

fn map_ldap_error(err: ldap3::LdapError) -> DirectoryError {
    DirectoryError::Transport(err.to_string())
}

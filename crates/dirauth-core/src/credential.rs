//! Service identity used for the search phase of a verification.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

/// Fixed bind identity that grants the engine permission to search the directory.
///
/// The secret is held in a [`SecretString`]: it is redacted from `Debug` output, skipped on
/// serialization and zeroized on drop. It is only ever handed to the search-phase bind.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceCredential {
    /// Distinguished name of the service account
    pub bind_dn: String,

    /// Service account secret
    #[serde(skip_serializing)]
    bind_secret: SecretString,
}

impl ServiceCredential {
    /// Create a new service credential.
    ///
    /// # Arguments
    ///
    /// * `bind_dn` - The distinguished name of the service account
    /// * `bind_secret` - The service account secret
    #[must_use]
    pub fn new(bind_dn: impl Into<String>, bind_secret: SecretString) -> Self {
        Self {
            bind_dn: bind_dn.into(),
            bind_secret,
        }
    }

    /// Get the bind DN.
    #[must_use]
    pub fn bind_dn(&self) -> &str {
        &self.bind_dn
    }

    /// Get the bind secret.
    #[must_use]
    pub const fn bind_secret(&self) -> &SecretString {
        &self.bind_secret
    }

    /// Returns true when no secret has been provided.
    #[must_use]
    pub fn has_empty_secret(&self) -> bool {
        self.bind_secret.expose_secret().is_empty()
    }
}

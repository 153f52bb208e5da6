//! Two-phase LDAP credential verification.
//!
//! A [`VerificationEngine`] binds as a service identity, finds exactly one eligible entry for
//! the caller's identifier, then binds as that entry with the caller's password on a separate
//! connection. On success it returns a normalized [`dirauth_core::Identity`].
//!
//! ```no_run
//! use dirauth_ldap::{DirectoryConfig, DirectorySettings, VerificationEngine};
//! use secrecy::SecretString;
//!
//! # async fn run() -> dirauth_ldap::Result<()> {
//! let config = DirectoryConfig::from_settings(DirectorySettings::from_env()?)?;
//! let engine = VerificationEngine::new(config)?;
//! let identity = engine
//!     .verify("jsmith", &SecretString::from("correct-horse".to_string()))
//!     .await?;
//! println!("{}", identity.username);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), deny(missing_docs))]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod connection;
mod dn;
mod engine;
mod entry;
mod filter;
mod normalize;
mod policy;
mod resolver;
mod verifier;

pub use config::{
    DirectoryConfig, DirectorySettings, DEFAULT_BIND_TIMEOUT_SECS, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_MAX_IDENTIFIER_CHARS, DEFAULT_SEARCH_TIMEOUT_SECS, LDAP_PROTOCOL_VERSION,
};
pub use connection::{
    service_bind, BindOutcome, DirectoryConnector, DirectoryError, DirectorySession,
    LdapConnector,
};
pub use dn::{DistinguishedName, DistinguishedNameError, RelativeDistinguishedName};
pub use engine::VerificationEngine;
pub use entry::UserEntry;
pub use filter::{escape_filter_value, validate_identifier, SearchFilter};
pub use normalize::{normalize, AttributeMap};
pub use policy::{ExclusionRules, ACCOUNT_DISABLED_FLAG};
pub use resolver::{UserResolver, SEARCH_SIZE_LIMIT};
pub use verifier::CredentialVerifier;

/// Convenient result alias that reuses the core error type.
pub type Result<T> = dirauth_core::Result<T>;

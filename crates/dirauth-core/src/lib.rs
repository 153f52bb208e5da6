//! # dirauth-core
//!
//! Core types for directory-backed credential verification.
//!
//! ## Modules
//!
//! - [`error`] - Classified verification failures and their public presentation
//! - [`identity`] - The normalized identity returned on success
//! - [`credential`] - The service identity used for directory searches

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod credential;
pub mod error;
pub mod identity;

// Re-export commonly used types
pub use credential::ServiceCredential;
pub use error::{AuthError, ErrorResponse, Result, Stage};
pub use identity::Identity;

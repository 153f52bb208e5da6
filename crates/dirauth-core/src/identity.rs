//! Normalized identity returned by a successful verification.

use serde::{Deserialize, Serialize};

/// Identity facts resolved from the directory entry that accepted the caller's password.
///
/// This is the only value that crosses the engine boundary on success. Optional attributes that
/// were absent in the directory are `None`; they are never filled with placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Login name.
    pub username: String,
    /// Human readable name.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Primary email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Names of the groups the entry is a direct member of.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Identity {
    /// Creates a builder for a new identity.
    #[must_use]
    pub fn builder(username: impl Into<String>) -> IdentityBuilder {
        IdentityBuilder {
            username: username.into(),
            display_name: None,
            email: None,
            groups: Vec::new(),
        }
    }

    /// Returns true if the identity belongs to the provided group (case-insensitive).
    #[must_use]
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g.eq_ignore_ascii_case(group))
    }
}

/// Builder for [`Identity`].
#[derive(Debug)]
pub struct IdentityBuilder {
    username: String,
    display_name: Option<String>,
    email: Option<String>,
    groups: Vec<String>,
}

impl IdentityBuilder {
    /// Sets the display name.
    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the email address.
    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Replaces the group list.
    #[must_use]
    pub fn groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.groups = groups.into_iter().collect();
        self
    }

    /// Finalises the builder and returns the [`Identity`].
    #[must_use]
    pub fn build(self) -> Identity {
        Identity {
            username: self.username,
            display_name: self.display_name,
            email: self.email,
            groups: self.groups,
        }
    }
}

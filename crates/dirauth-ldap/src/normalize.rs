//! Mapping from directory attributes to [`Identity`].

use serde::Deserialize;
use tracing::warn;
use validator::Validate;

use dirauth_core::Identity;

use crate::dn::DistinguishedName;
use crate::entry::UserEntry;

/// Names of the directory attributes that feed an [`Identity`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct AttributeMap {
    /// Attribute holding the login name (matched against the caller's identifier).
    #[validate(length(min = 1))]
    pub login: String,
    /// Preferred display name attribute.
    pub display_name: String,
    /// Fallback display name attribute.
    pub common_name: String,
    /// Email attribute.
    pub mail: String,
    /// Attribute listing the DNs of groups the entry belongs to.
    pub member_of: String,
}

impl Default for AttributeMap {
    fn default() -> Self {
        Self {
            login: "sAMAccountName".to_string(),
            display_name: "displayName".to_string(),
            common_name: "cn".to_string(),
            mail: "mail".to_string(),
            member_of: "memberOf".to_string(),
        }
    }
}

impl AttributeMap {
    /// Attributes that must be requested for [`normalize`].
    #[must_use]
    pub fn attributes(&self) -> Vec<&str> {
        [
            &self.login,
            &self.display_name,
            &self.common_name,
            &self.mail,
            &self.member_of,
        ]
        .into_iter()
        .map(String::as_str)
        .filter(|name| !name.is_empty())
        .collect()
    }
}

/// Builds an [`Identity`] from a resolved entry.
///
/// `username` is the identifier the entry was resolved by and is returned as given, even when
/// the directory spells the login differently. Takes the first value of every other attribute;
/// an absent attribute stays `None`.
#[must_use]
pub fn normalize(entry: &UserEntry, map: &AttributeMap, username: &str) -> Identity {
    let mut builder = Identity::builder(username);

    if let Some(name) = entry
        .first(&map.display_name)
        .or_else(|| entry.first(&map.common_name))
    {
        builder = builder.display_name(name);
    }
    if let Some(mail) = entry.first(&map.mail) {
        builder = builder.email(mail);
    }

    let groups = entry
        .values(&map.member_of)
        .map(|values| {
            values
                .iter()
                .filter_map(|value| match DistinguishedName::parse(value) {
                    Ok(dn) => dn.leaf_value("cn").map(str::to_owned),
                    Err(err) => {
                        warn!("Failed to parse group DN `{value}`: {err}");
                        None
                    }
                })
                .collect::<Vec<String>>()
        })
        .unwrap_or_default();

    builder.groups(groups).build()
}

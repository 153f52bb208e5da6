//! Directory entries returned by a user search.

use ldap3::SearchEntry;
use std::collections::HashMap;

/// Entry returned by a user search.
///
/// Attribute names are matched case-insensitively, since directories are free to return them in
/// a different case than requested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserEntry {
    /// Distinguished name of the entry.
    pub dn: String,
    /// Attribute map (values preserve order from server).
    pub attributes: HashMap<String, Vec<String>>,
}

impl UserEntry {
    /// Creates an entry without attributes.
    #[must_use]
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: HashMap::new(),
        }
    }

    /// Adds (or replaces) an attribute.
    #[must_use]
    pub fn with_attribute<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Returns all values for the attribute.
    #[must_use]
    pub fn values(&self, attribute: &str) -> Option<&[String]> {
        self.attributes
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(attribute))
            .map(|(_, values)| values.as_slice())
    }

    /// Returns the first non-empty value of the attribute if present.
    #[must_use]
    pub fn first(&self, attribute: &str) -> Option<&str> {
        self.values(attribute)
            .and_then(|values| values.iter().find(|value| !value.is_empty()))
            .map(String::as_str)
    }

    /// Returns true if any value of the attribute equals `value` (case-insensitive).
    #[must_use]
    pub fn has_value(&self, attribute: &str, value: &str) -> bool {
        self.values(attribute)
            .is_some_and(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
    }
}

impl From<SearchEntry> for UserEntry {
    fn from(entry: SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attributes: entry.attrs,
        }
    }
}

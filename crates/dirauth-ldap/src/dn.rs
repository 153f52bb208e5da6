//! Distinguished name parsing for base scopes, bind identities and group references.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use dirauth_core::AuthError;

/// Errors that can occur when parsing a distinguished name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistinguishedNameError {
    /// The distinguished name was empty.
    #[error("distinguished name cannot be empty")]
    Empty,
    /// A component in the distinguished name was invalid.
    #[error("invalid distinguished name component: {0}")]
    InvalidComponent(String),
    /// A component was missing the attribute name to the left of the `=`.
    #[error("distinguished name component missing attribute: {0}")]
    MissingAttribute(String),
    /// A component was missing the value to the right of the `=`.
    #[error("distinguished name component missing value for attribute {0}")]
    MissingValue(String),
    /// The distinguished name ended with an escape character.
    #[error("distinguished name contains an unterminated escape sequence")]
    UnterminatedEscape,
}

impl From<DistinguishedNameError> for AuthError {
    fn from(err: DistinguishedNameError) -> Self {
        AuthError::Configuration(err.to_string())
    }
}

/// Single `attribute=value` pair of a distinguished name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelativeDistinguishedName {
    attribute: String,
    value: String,
}

impl RelativeDistinguishedName {
    /// Attribute portion (e.g. `cn`).
    #[must_use]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Unescaped value portion.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    fn matches(&self, other: &Self) -> bool {
        self.attribute.eq_ignore_ascii_case(&other.attribute)
            && self.value.eq_ignore_ascii_case(&other.value)
    }
}

/// Parsed distinguished name.
///
/// Multi-valued RDNs (`cn=a+uid=b`) are flattened into their components; ordering is kept
/// leaf-first as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistinguishedName {
    raw: String,
    components: Vec<Vec<RelativeDistinguishedName>>,
}

impl DistinguishedName {
    /// Parses a distinguished name from a string.
    ///
    /// # Errors
    ///
    /// Returns [`DistinguishedNameError`] if the distinguished name is empty or contains invalid
    /// syntax.
    pub fn parse(input: impl AsRef<str>) -> std::result::Result<Self, DistinguishedNameError> {
        let raw = input.as_ref().trim();
        if raw.is_empty() {
            return Err(DistinguishedNameError::Empty);
        }

        let components = split_escaped(raw, ',')?
            .iter()
            .map(|component| {
                split_escaped(component, '+')?
                    .iter()
                    .map(|part| split_attribute_value(part))
                    .collect::<std::result::Result<Vec<_>, _>>()
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            components,
        })
    }

    /// Borrows the distinguished name as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Number of RDNs (hierarchy depth).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    /// Value of the leaf RDN when its attribute matches `attribute` (case-insensitive).
    ///
    /// For `cn=Domain Users,cn=Users,dc=example,dc=org` and `cn` this yields `Domain Users`.
    #[must_use]
    pub fn leaf_value(&self, attribute: &str) -> Option<&str> {
        self.components
            .first()
            .and_then(|rdn| {
                rdn.iter()
                    .find(|component| component.attribute.eq_ignore_ascii_case(attribute))
            })
            .map(RelativeDistinguishedName::value)
    }

    /// Returns true if this name equals `base` or lies beneath it.
    #[must_use]
    pub fn is_within(&self, base: &DistinguishedName) -> bool {
        if base.depth() > self.depth() {
            return false;
        }

        let offset = self.depth() - base.depth();
        self.components[offset..]
            .iter()
            .zip(&base.components)
            .all(|(ours, theirs)| {
                ours.len() == theirs.len()
                    && ours
                        .iter()
                        .all(|component| theirs.iter().any(|other| component.matches(other)))
            })
    }
}

impl fmt::Display for DistinguishedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for DistinguishedName {
    type Err = DistinguishedNameError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn split_escaped(
    input: &str,
    delimiter: char,
) -> std::result::Result<Vec<String>, DistinguishedNameError> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for ch in input.chars() {
        if escape {
            current.push('\\');
            current.push(ch);
            escape = false;
        } else if ch == '\\' {
            escape = true;
        } else if ch == delimiter {
            parts.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }

    if escape {
        return Err(DistinguishedNameError::UnterminatedEscape);
    }

    parts.push(current.trim().to_string());
    if parts.iter().any(String::is_empty) {
        return Err(DistinguishedNameError::InvalidComponent(input.to_string()));
    }
    Ok(parts)
}

fn split_attribute_value(
    component: &str,
) -> std::result::Result<RelativeDistinguishedName, DistinguishedNameError> {
    let mut escape = false;
    let mut index = None;

    for (i, ch) in component.char_indices() {
        if escape {
            escape = false;
        } else if ch == '\\' {
            escape = true;
        } else if ch == '=' {
            index = Some(i);
            break;
        }
    }

    let idx =
        index.ok_or_else(|| DistinguishedNameError::InvalidComponent(component.to_string()))?;
    let attribute = component[..idx].trim();
    let value = component[idx + 1..].trim_start();

    if attribute.is_empty() {
        return Err(DistinguishedNameError::MissingAttribute(
            component.to_string(),
        ));
    }
    if value.is_empty() {
        return Err(DistinguishedNameError::MissingValue(attribute.to_string()));
    }

    Ok(RelativeDistinguishedName {
        attribute: attribute.to_string(),
        value: unescape(value)?,
    })
}

// Handles both `\,` and the hex pair form `\2c` used by Active Directory.
fn unescape(value: &str) -> std::result::Result<String, DistinguishedNameError> {
    let mut bytes = Vec::with_capacity(value.len());
    let mut chars = value.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        let first = chars
            .next()
            .ok_or(DistinguishedNameError::UnterminatedEscape)?;
        let hex_pair = chars
            .peek()
            .and_then(|second| first.to_digit(16).zip(second.to_digit(16)));

        match hex_pair {
            Some((high, low)) => {
                chars.next();
                // Both digits are < 16, so the pair always fits in a byte.
                bytes.push(u8::try_from(high * 16 + low).unwrap_or_default());
            }
            None => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(first.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    String::from_utf8(bytes).map_err(|_| DistinguishedNameError::InvalidComponent(value.to_string()))
}

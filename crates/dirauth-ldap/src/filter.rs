//! Search filter construction.
//!
//! Caller-supplied identifiers never reach a filter unescaped: [`escape_filter_value`] replaces
//! every character with special meaning in a filter assertion value by its `\XX` hex escape, so
//! an identifier such as `*` or `a)(uid=*` matches only itself.

use std::fmt;

use dirauth_core::{AuthError, Result};

use crate::policy::ExclusionRules;

/// Escapes a value for use inside a filter assertion.
///
/// `(`, `)`, `\`, `*` and NUL are replaced by `\28`, `\29`, `\5c`, `\2a` and `\00`.
#[must_use]
pub fn escape_filter_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '*' => escaped.push_str("\\2a"),
            '(' => escaped.push_str("\\28"),
            ')' => escaped.push_str("\\29"),
            '\\' => escaped.push_str("\\5c"),
            '\0' => escaped.push_str("\\00"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Rejects identifiers that can never name an account, before any network call.
///
/// # Errors
///
/// Returns [`AuthError::InvalidIdentifier`] if the identifier is empty, longer than
/// `max_chars` characters, or contains control characters.
pub fn validate_identifier(identifier: &str, max_chars: usize) -> Result<()> {
    if identifier.trim().is_empty() {
        return Err(AuthError::InvalidIdentifier(
            "identifier must not be empty".to_string(),
        ));
    }

    let length = identifier.chars().count();
    if length > max_chars {
        return Err(AuthError::InvalidIdentifier(format!(
            "identifier is {length} characters, limit is {max_chars}"
        )));
    }

    if identifier.chars().any(char::is_control) {
        return Err(AuthError::InvalidIdentifier(
            "identifier contains control characters".to_string(),
        ));
    }

    Ok(())
}

/// Filter selecting the single eligible principal for an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter(String);

impl SearchFilter {
    /// Builds the filter for `identifier` matched against `login_attribute`, constrained by
    /// `rules`.
    ///
    /// The identifier is escaped here; validation is the caller's job (see
    /// [`validate_identifier`]).
    #[must_use]
    pub fn for_user(login_attribute: &str, identifier: &str, rules: &ExclusionRules) -> Self {
        Self(format!(
            "(&{}({login_attribute}={}))",
            rules.filter_clauses(),
            escape_filter_value(identifier)
        ))
    }

    /// Borrows the filter string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_special_characters() {
        assert_eq!(escape_filter_value("*"), "\\2a");
        assert_eq!(escape_filter_value("a)(uid=*"), "a\\29\\28uid=\\2a");
        assert_eq!(escape_filter_value("back\\slash"), "back\\5cslash");
        assert_eq!(escape_filter_value("nul\0"), "nul\\00");
        assert_eq!(escape_filter_value("jsmith"), "jsmith");
        assert_eq!(escape_filter_value("josé"), "josé");
    }

    #[test]
    fn escaped_values_contain_no_filter_metacharacters() {
        for input in ["*", "a)(|(uid=*", "\\2a", "x*y(z)", "plain"] {
            let escaped = escape_filter_value(input);
            assert!(!escaped.contains(['*', '(', ')', '\0']));
            assert_eq!(escaped.matches('\\').count(), input.matches(['*', '(', ')', '\\']).count());
        }
    }

    #[test]
    fn user_filter_targets_literal_identifier() {
        let filter = SearchFilter::for_user("sAMAccountName", "*", &ExclusionRules::default());
        assert_eq!(
            filter.as_str(),
            "(&(objectClass=user)(objectCategory=person)(!(objectClass=inetOrgPerson))\
             (!(userAccountControl:1.2.840.113556.1.4.803:=2))(sAMAccountName=\\2a))"
        );
    }

    #[test]
    fn injection_attempts_stay_inside_the_assertion() {
        let filter = SearchFilter::for_user(
            "sAMAccountName",
            "x)(|(objectClass=*",
            &ExclusionRules::default(),
        );
        assert!(filter
            .as_str()
            .ends_with("(sAMAccountName=x\\29\\28|\\28objectClass=\\2a))"));
    }

    #[test]
    fn validation_rejects_bad_identifiers() {
        assert!(validate_identifier("jsmith", 256).is_ok());
        assert!(validate_identifier("*", 256).is_ok());

        for bad in ["", "   ", "js\nmith", "nul\0", "tab\t"] {
            assert!(
                matches!(
                    validate_identifier(bad, 256),
                    Err(AuthError::InvalidIdentifier(_))
                ),
                "{bad:?} should be rejected"
            );
        }

        let long = "a".repeat(257);
        assert!(matches!(
            validate_identifier(&long, 256),
            Err(AuthError::InvalidIdentifier(_))
        ));
    }
}

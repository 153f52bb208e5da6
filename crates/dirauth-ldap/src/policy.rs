//! Account exclusion rules applied to user searches.

use serde::Deserialize;
use validator::Validate;

use crate::entry::UserEntry;
use crate::filter::escape_filter_value;

/// Attribute carrying the account-control bitmask.
pub const ACCOUNT_CONTROL_ATTRIBUTE: &str = "userAccountControl";
/// Bit set in [`ACCOUNT_CONTROL_ATTRIBUTE`] for administratively disabled accounts.
pub const ACCOUNT_DISABLED_FLAG: u32 = 0x0002;
/// `LDAP_MATCHING_RULE_BIT_AND` extensible match rule.
pub const BITWISE_AND_RULE: &str = "1.2.840.113556.1.4.803";
/// Attribute listing an entry's object classes.
pub const OBJECT_CLASS_ATTRIBUTE: &str = "objectClass";

/// Which directory entries are eligible to authenticate.
///
/// The rules are expressed twice: as filter clauses sent with the search, and as a check on
/// the returned entries so that a directory which ignores part of the filter cannot widen the
/// result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct ExclusionRules {
    /// Object class every principal must carry.
    #[validate(length(min = 1))]
    pub principal_class: String,

    /// Optional `objectCategory` every principal must match.
    pub principal_category: Option<String>,

    /// Object classes that disqualify an entry (competing or alias principal types).
    pub excluded_classes: Vec<String>,

    /// Whether accounts flagged as disabled in the account-control bitmask are excluded.
    pub exclude_disabled: bool,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            principal_class: "user".to_string(),
            principal_category: Some("person".to_string()),
            excluded_classes: vec!["inetOrgPerson".to_string()],
            exclude_disabled: true,
        }
    }
}

impl ExclusionRules {
    /// Filter clauses (without the surrounding `&`) expressing these rules.
    #[must_use]
    pub fn filter_clauses(&self) -> String {
        let mut clauses = format!(
            "({OBJECT_CLASS_ATTRIBUTE}={})",
            escape_filter_value(&self.principal_class)
        );

        if let Some(category) = &self.principal_category {
            clauses.push_str(&format!("(objectCategory={})", escape_filter_value(category)));
        }

        for class in &self.excluded_classes {
            clauses.push_str(&format!(
                "(!({OBJECT_CLASS_ATTRIBUTE}={}))",
                escape_filter_value(class)
            ));
        }

        if self.exclude_disabled {
            clauses.push_str(&format!(
                "(!({ACCOUNT_CONTROL_ATTRIBUTE}:{BITWISE_AND_RULE}:={ACCOUNT_DISABLED_FLAG}))"
            ));
        }

        clauses
    }

    /// Attributes needed to re-check the rules on returned entries.
    #[must_use]
    pub fn attributes(&self) -> Vec<&'static str> {
        let mut attributes = vec![OBJECT_CLASS_ATTRIBUTE];
        if self.exclude_disabled {
            attributes.push(ACCOUNT_CONTROL_ATTRIBUTE);
        }
        attributes
    }

    /// Returns true if a returned entry satisfies the rules.
    ///
    /// Attributes the directory did not return are not held against the entry; the search filter
    /// already constrained them.
    #[must_use]
    pub fn admits(&self, entry: &UserEntry) -> bool {
        if let Some(classes) = entry.values(OBJECT_CLASS_ATTRIBUTE) {
            let has_principal = classes
                .iter()
                .any(|class| class.eq_ignore_ascii_case(&self.principal_class));
            let has_excluded = self
                .excluded_classes
                .iter()
                .any(|excluded| entry.has_value(OBJECT_CLASS_ATTRIBUTE, excluded));
            if !has_principal || has_excluded {
                return false;
            }
        }

        if self.exclude_disabled {
            if let Some(raw) = entry.first(ACCOUNT_CONTROL_ATTRIBUTE) {
                // An unparsable bitmask cannot prove the account is enabled.
                match raw.trim().parse::<i64>() {
                    Ok(flags) if flags & i64::from(ACCOUNT_DISABLED_FLAG) == 0 => {}
                    _ => return false,
                }
            }
        }

        true
    }
}

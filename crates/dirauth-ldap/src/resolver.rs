//! Resolution of a caller-supplied identifier to exactly one directory entry.

use tracing::{debug, warn};

use dirauth_core::{AuthError, Result, Stage};

use crate::config::DirectoryConfig;
use crate::connection::{bounded, DirectorySession};
use crate::dn::DistinguishedName;
use crate::entry::UserEntry;
use crate::filter::{validate_identifier, SearchFilter};

/// Entries requested per search. Two is enough to tell "one" from "more than one".
pub const SEARCH_SIZE_LIMIT: usize = 2;

/// Finds the single eligible entry for an identifier.
#[derive(Debug, Clone, Copy)]
pub struct UserResolver<'a> {
    config: &'a DirectoryConfig,
}

impl<'a> UserResolver<'a> {
    /// Creates a resolver over `config`.
    #[must_use]
    pub const fn new(config: &'a DirectoryConfig) -> Self {
        Self { config }
    }

    /// Validates `identifier` and builds its search filter without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidIdentifier`] if the identifier fails validation.
    pub fn filter_for(&self, identifier: &str) -> Result<SearchFilter> {
        validate_identifier(identifier, self.config.max_identifier_chars())?;
        Ok(SearchFilter::for_user(
            &self.config.attribute_map().login,
            identifier,
            self.config.exclusion_rules(),
        ))
    }

    /// Searches the base scope on an already bound `session`.
    ///
    /// # Errors
    ///
    /// - [`AuthError::InvalidIdentifier`] before any network call for a malformed identifier
    /// - [`AuthError::Connection`] (stage [`Stage::Search`]) on transport failure or timeout
    /// - [`AuthError::UserNotFound`] when no eligible entry matches
    /// - [`AuthError::AmbiguousUser`] when more than one eligible entry matches, or when the
    ///   result filled the size limit and an entry had to be dropped, since a further
    ///   eligible match cannot be ruled out
    pub async fn resolve(
        &self,
        session: &mut dyn DirectorySession,
        identifier: &str,
    ) -> Result<UserEntry> {
        let filter = self.filter_for(identifier)?;
        let attributes = self.config.search_attributes();

        let entries = bounded(
            Stage::Search,
            self.config.search_timeout(),
            session.search(
                self.config.base_dn().as_str(),
                filter.as_str(),
                &attributes,
                SEARCH_SIZE_LIMIT,
            ),
        )
        .await?;

        let returned = entries.len();
        let mut eligible: Vec<UserEntry> = entries
            .into_iter()
            .filter(|entry| self.is_eligible(entry))
            .collect();
        if eligible.len() < returned {
            debug!(
                returned,
                eligible = eligible.len(),
                "dropped entries failing scope or exclusion checks"
            );
            // A dropped entry may have taken the slot of a second eligible match.
            if returned >= SEARCH_SIZE_LIMIT && !eligible.is_empty() {
                warn!(returned, "truncated search result had ineligible entries");
                return Err(AuthError::AmbiguousUser { count: returned });
            }
        }

        match eligible.len() {
            0 => Err(AuthError::UserNotFound),
            1 => Ok(eligible.remove(0)),
            count => Err(AuthError::AmbiguousUser { count }),
        }
    }

    fn is_eligible(&self, entry: &UserEntry) -> bool {
        let in_scope = match DistinguishedName::parse(&entry.dn) {
            Ok(dn) => dn.is_within(self.config.base_dn()),
            Err(err) => {
                warn!("Failed to parse entry DN `{}`: {err}", entry.dn);
                false
            }
        };
        in_scope && self.config.exclusion_rules().admits(entry)
    }
}

//! Configuration types for the verification engine.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;
use validator::Validate;

use dirauth_core::{AuthError, Result, ServiceCredential};

use crate::dn::DistinguishedName;
use crate::normalize::AttributeMap;
use crate::policy::ExclusionRules;

/// Default connect timeout (seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;
/// Default timeout for the service bind and the user search (seconds).
pub const DEFAULT_SEARCH_TIMEOUT_SECS: u64 = 10;
/// Default timeout for the credential bind (seconds).
pub const DEFAULT_BIND_TIMEOUT_SECS: u64 = 3;
/// Default upper bound on identifier length (characters).
pub const DEFAULT_MAX_IDENTIFIER_CHARS: usize = 256;
/// The only protocol version spoken.
pub const LDAP_PROTOCOL_VERSION: u8 = 3;

const LDAP_DEFAULT_PORT: u16 = 389;
const LDAPS_DEFAULT_PORT: u16 = 636;

/// Raw, deserializable configuration.
///
/// Secrets are expected to come from the environment (see [`DirectorySettings::from_env`]);
/// nothing here has a built-in secret default.
#[derive(Debug, Deserialize, Validate)]
pub struct DirectorySettings {
    /// Directory URL, e.g. `ldap://dc01.example.org` or `ldaps://dc01.example.org`
    #[validate(url)]
    pub address: String,

    /// Port override; the scheme default is used when absent
    #[serde(default)]
    pub port: Option<u16>,

    /// Search base
    #[validate(length(min = 1))]
    pub base_dn: String,

    /// Service account DN
    #[validate(length(min = 1))]
    pub bind_dn: String,

    /// Service account secret
    #[serde(deserialize_with = "deserialize_secret")]
    pub bind_secret: SecretString,

    /// Additional attributes to request alongside the mapped ones
    #[serde(default)]
    pub search_attributes: Vec<String>,

    /// Attribute names feeding the identity
    #[validate(nested)]
    #[serde(default)]
    pub attributes: AttributeMap,

    /// Account exclusion rules
    #[validate(nested)]
    #[serde(default)]
    pub exclusion: ExclusionRules,

    /// Connect timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Service bind and search timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,

    /// Credential bind timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_bind_timeout_secs")]
    pub bind_timeout_secs: u64,

    /// Longest accepted identifier
    #[validate(range(min = 1, max = 1024))]
    #[serde(default = "default_max_identifier_chars")]
    pub max_identifier_chars: usize,

    /// Protocol version; only LDAPv3 is supported
    #[validate(range(min = 3, max = 3))]
    #[serde(default = "default_protocol_version")]
    pub protocol_version: u8,

    /// Whether to verify TLS certificates
    #[serde(default = "default_tls_verify")]
    pub tls_verify: bool,

    /// Optional path to a custom CA certificate
    #[serde(default)]
    pub tls_ca_cert: Option<PathBuf>,

    /// Whether to upgrade plain `ldap://` connections with StartTLS
    #[serde(default)]
    pub starttls: bool,
}

const fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

const fn default_search_timeout_secs() -> u64 {
    DEFAULT_SEARCH_TIMEOUT_SECS
}

const fn default_bind_timeout_secs() -> u64 {
    DEFAULT_BIND_TIMEOUT_SECS
}

const fn default_max_identifier_chars() -> usize {
    DEFAULT_MAX_IDENTIFIER_CHARS
}

const fn default_protocol_version() -> u8 {
    LDAP_PROTOCOL_VERSION
}

const fn default_tls_verify() -> bool {
    true
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl DirectorySettings {
    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, using the same variable names as [`Self::from_env`]:
    ///
    /// | Variable | Required |
    /// |----------|----------|
    /// | `LDAP_URL` | yes |
    /// | `LDAP_BASE_DN` | yes |
    /// | `LDAP_BIND_DN` | yes |
    /// | `LDAP_BIND_PASSWORD` | yes |
    /// | `LDAP_PORT` | no |
    /// | `LDAP_CONNECT_TIMEOUT_SECS`, `LDAP_SEARCH_TIMEOUT_SECS`, `LDAP_BIND_TIMEOUT_SECS` | no |
    /// | `LDAP_LOGIN_ATTRIBUTE` | no |
    /// | `LDAP_SEARCH_ATTRIBUTES` (comma separated) | no |
    /// | `LDAP_TLS_VERIFY`, `LDAP_TLS_CA_CERT`, `LDAP_STARTTLS` | no |
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if a required variable is missing or a value
    /// cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AuthError::Configuration(format!("{key} is not set")))
        };

        let mut attributes = AttributeMap::default();
        if let Some(login) = lookup("LDAP_LOGIN_ATTRIBUTE") {
            attributes.login = login;
        }

        Ok(Self {
            address: required("LDAP_URL")?,
            port: parse_optional(&lookup, "LDAP_PORT")?,
            base_dn: required("LDAP_BASE_DN")?,
            bind_dn: required("LDAP_BIND_DN")?,
            bind_secret: SecretString::from(required("LDAP_BIND_PASSWORD")?),
            search_attributes: lookup("LDAP_SEARCH_ATTRIBUTES")
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
            attributes,
            exclusion: ExclusionRules::default(),
            connect_timeout_secs: parse_optional(&lookup, "LDAP_CONNECT_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            search_timeout_secs: parse_optional(&lookup, "LDAP_SEARCH_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_SEARCH_TIMEOUT_SECS),
            bind_timeout_secs: parse_optional(&lookup, "LDAP_BIND_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_BIND_TIMEOUT_SECS),
            max_identifier_chars: DEFAULT_MAX_IDENTIFIER_CHARS,
            protocol_version: LDAP_PROTOCOL_VERSION,
            tls_verify: parse_optional(&lookup, "LDAP_TLS_VERIFY")?.unwrap_or(true),
            tls_ca_cert: lookup("LDAP_TLS_CA_CERT").map(PathBuf::from),
            starttls: parse_optional(&lookup, "LDAP_STARTTLS")?.unwrap_or(false),
        })
    }
}

fn parse_optional<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|err| AuthError::Configuration(format!("{key}: {err}")))
        })
        .transpose()
}

/// Validated, immutable engine configuration.
///
/// Built once at startup, either from [`DirectorySettings`] or with [`DirectoryConfig::new`]
/// and the `with_*` overrides, then shared read-only by every verification.
#[derive(Debug)]
pub struct DirectoryConfig {
    url: Url,
    credential: ServiceCredential,
    base_dn: DistinguishedName,
    attributes: AttributeMap,
    extra_attributes: Vec<String>,
    exclusion: ExclusionRules,
    max_identifier_chars: usize,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
    starttls: bool,
    connect_timeout_secs: u64,
    search_timeout_secs: u64,
    bind_timeout_secs: u64,
}

impl DirectoryConfig {
    /// Creates a configuration with default timeouts, attribute map and exclusion rules.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the URL is invalid or not an `ldap`/`ldaps` URL,
    /// or if the service credential is unusable.
    pub fn new(
        address: impl AsRef<str>,
        credential: ServiceCredential,
        base_dn: DistinguishedName,
    ) -> Result<Self> {
        let url = Url::parse(address.as_ref())?;
        if !matches!(url.scheme(), "ldap" | "ldaps") {
            return Err(AuthError::Configuration(format!(
                "unsupported directory URL scheme `{}`",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(AuthError::Configuration(
                "directory URL has no host".to_string(),
            ));
        }

        DistinguishedName::parse(credential.bind_dn())?;
        if credential.has_empty_secret() {
            return Err(AuthError::Configuration(
                "service bind secret is empty".to_string(),
            ));
        }

        Ok(Self {
            url,
            credential,
            base_dn,
            attributes: AttributeMap::default(),
            extra_attributes: Vec::new(),
            exclusion: ExclusionRules::default(),
            max_identifier_chars: DEFAULT_MAX_IDENTIFIER_CHARS,
            tls_verify: true,
            tls_ca_cert: None,
            starttls: false,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            search_timeout_secs: DEFAULT_SEARCH_TIMEOUT_SECS,
            bind_timeout_secs: DEFAULT_BIND_TIMEOUT_SECS,
        })
    }

    /// Validates `settings` and converts them.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if validation fails, if any DN is malformed, or if
    /// the credential bind timeout is longer than the search timeout.
    pub fn from_settings(settings: DirectorySettings) -> Result<Self> {
        settings.validate()?;

        if settings.bind_timeout_secs > settings.search_timeout_secs {
            return Err(AuthError::Configuration(format!(
                "bind timeout ({}s) must not exceed search timeout ({}s)",
                settings.bind_timeout_secs, settings.search_timeout_secs
            )));
        }

        let base_dn = DistinguishedName::parse(&settings.base_dn)?;
        let credential = ServiceCredential::new(settings.bind_dn, settings.bind_secret);

        let mut config = Self::new(&settings.address, credential, base_dn)?
            .with_attribute_map(settings.attributes)
            .with_search_attributes(settings.search_attributes)
            .with_exclusion_rules(settings.exclusion)
            .with_max_identifier_chars(settings.max_identifier_chars)
            .with_tls_verification(settings.tls_verify)
            .with_starttls(settings.starttls)
            .with_connect_timeout_secs(settings.connect_timeout_secs)
            .with_search_timeout_secs(settings.search_timeout_secs)
            .with_bind_timeout_secs(settings.bind_timeout_secs);

        if let Some(port) = settings.port {
            config = config.with_port(port)?;
        }
        if let Some(path) = settings.tls_ca_cert {
            config = config.with_tls_ca_cert(path);
        }

        Ok(config)
    }

    /// Returns the directory URL including the effective port.
    #[must_use]
    pub fn url(&self) -> String {
        let mut url = self.url.clone();
        if url.port().is_none() {
            // Cannot fail: `new` guarantees a host and an ldap/ldaps scheme.
            let _ = url.set_port(Some(self.port()));
        }
        url.to_string()
    }

    /// Returns the effective port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.url.port().unwrap_or(if self.url.scheme() == "ldaps" {
            LDAPS_DEFAULT_PORT
        } else {
            LDAP_DEFAULT_PORT
        })
    }

    /// Returns the service credential.
    #[must_use]
    pub const fn credential(&self) -> &ServiceCredential {
        &self.credential
    }

    /// Returns the search base.
    #[must_use]
    pub const fn base_dn(&self) -> &DistinguishedName {
        &self.base_dn
    }

    /// Returns the attribute map.
    #[must_use]
    pub const fn attribute_map(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Returns the exclusion rules.
    #[must_use]
    pub const fn exclusion_rules(&self) -> &ExclusionRules {
        &self.exclusion
    }

    /// Attributes requested by the user search: the mapped ones, those the exclusion rules
    /// re-check, and any configured extras, without duplicates.
    #[must_use]
    pub fn search_attributes(&self) -> Vec<String> {
        let mut attributes: Vec<String> = Vec::new();
        let candidates = self
            .attributes
            .attributes()
            .into_iter()
            .chain(self.exclusion.attributes())
            .chain(self.extra_attributes.iter().map(String::as_str));

        for name in candidates {
            if !attributes.iter().any(|known| known.eq_ignore_ascii_case(name)) {
                attributes.push(name.to_string());
            }
        }
        attributes
    }

    /// Returns the longest accepted identifier, in characters.
    #[must_use]
    pub const fn max_identifier_chars(&self) -> usize {
        self.max_identifier_chars
    }

    /// Returns whether TLS certificate verification is enabled.
    #[must_use]
    pub const fn tls_verify(&self) -> bool {
        self.tls_verify
    }

    /// Optional custom CA certificate path.
    #[must_use]
    pub fn tls_ca_cert(&self) -> Option<&PathBuf> {
        self.tls_ca_cert.as_ref()
    }

    /// Returns whether plain connections are upgraded with StartTLS.
    #[must_use]
    pub const fn starttls(&self) -> bool {
        self.starttls
    }

    /// Returns the connect timeout duration.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Returns the timeout for the service bind and the search.
    #[must_use]
    pub const fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }

    /// Returns the timeout for the credential bind.
    #[must_use]
    pub const fn bind_timeout(&self) -> Duration {
        Duration::from_secs(self.bind_timeout_secs)
    }

    /// Overrides the port.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Configuration`] if the URL cannot carry a port.
    pub fn with_port(mut self, port: u16) -> Result<Self> {
        self.url.set_port(Some(port)).map_err(|()| {
            AuthError::Configuration("directory URL cannot carry a port".to_string())
        })?;
        Ok(self)
    }

    /// Overrides the attribute map.
    #[must_use]
    pub fn with_attribute_map(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    /// Adds attributes to request alongside the mapped ones.
    #[must_use]
    pub fn with_search_attributes<I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.extra_attributes.extend(attributes);
        self
    }

    /// Overrides the exclusion rules.
    #[must_use]
    pub fn with_exclusion_rules(mut self, rules: ExclusionRules) -> Self {
        self.exclusion = rules;
        self
    }

    /// Overrides the identifier length limit.
    #[must_use]
    pub const fn with_max_identifier_chars(mut self, max: usize) -> Self {
        self.max_identifier_chars = max;
        self
    }

    /// Enables or disables TLS certificate verification.
    #[must_use]
    pub const fn with_tls_verification(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Sets the custom CA certificate path for TLS verification.
    #[must_use]
    pub fn with_tls_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Enables or disables StartTLS.
    #[must_use]
    pub const fn with_starttls(mut self, starttls: bool) -> Self {
        self.starttls = starttls;
        self
    }

    /// Overrides the connect timeout in seconds.
    #[must_use]
    pub const fn with_connect_timeout_secs(mut self, seconds: u64) -> Self {
        self.connect_timeout_secs = seconds;
        self
    }

    /// Overrides the service bind and search timeout in seconds.
    #[must_use]
    pub const fn with_search_timeout_secs(mut self, seconds: u64) -> Self {
        self.search_timeout_secs = seconds;
        self
    }

    /// Overrides the credential bind timeout in seconds.
    #[must_use]
    pub const fn with_bind_timeout_secs(mut self, seconds: u64) -> Self {
        self.bind_timeout_secs = seconds;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn credential() -> ServiceCredential {
        ServiceCredential::new(
            "cn=svc-auth,ou=ServiceAccounts,dc=example,dc=org",
            SecretString::from("secret".to_string()),
        )
    }

    fn base_dn() -> DistinguishedName {
        DistinguishedName::parse("dc=example,dc=org").unwrap()
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn required_env() -> HashMap<String, String> {
        env(&[
            ("LDAP_URL", "ldap://dc01.example.org"),
            ("LDAP_BASE_DN", "dc=example,dc=org"),
            ("LDAP_BIND_DN", "cn=svc-auth,ou=ServiceAccounts,dc=example,dc=org"),
            ("LDAP_BIND_PASSWORD", "secret"),
        ])
    }

    #[test]
    fn defaults() {
        let config = DirectoryConfig::new("ldap://dc01.example.org", credential(), base_dn()).unwrap();

        assert_eq!(config.url(), "ldap://dc01.example.org:389");
        assert_eq!(config.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.search_timeout(), Duration::from_secs(10));
        assert_eq!(config.bind_timeout(), Duration::from_secs(3));
        assert!(config.bind_timeout() < config.search_timeout());
        assert!(config.tls_verify());
        assert_eq!(
            config.search_attributes(),
            vec![
                "sAMAccountName",
                "displayName",
                "cn",
                "mail",
                "memberOf",
                "objectClass",
                "userAccountControl"
            ]
        );
    }

    #[test]
    fn ldaps_default_port_and_override() {
        let config = DirectoryConfig::new("ldaps://dc01.example.org", credential(), base_dn()).unwrap();
        assert_eq!(config.port(), 636);

        let config = config.with_port(3269).unwrap();
        assert_eq!(config.url(), "ldaps://dc01.example.org:3269");
    }

    #[test]
    fn builder_overrides() {
        let config = DirectoryConfig::new("ldap://dc01.example.org", credential(), base_dn())
            .unwrap()
            .with_search_attributes(vec!["department".to_string(), "MAIL".to_string()])
            .with_connect_timeout_secs(2)
            .with_search_timeout_secs(20)
            .with_bind_timeout_secs(4)
            .with_max_identifier_chars(64)
            .with_tls_verification(false);

        assert_eq!(config.connect_timeout(), Duration::from_secs(2));
        assert_eq!(config.search_timeout(), Duration::from_secs(20));
        assert_eq!(config.bind_timeout(), Duration::from_secs(4));
        assert_eq!(config.max_identifier_chars(), 64);
        assert!(!config.tls_verify());
        let attributes = config.search_attributes();
        assert_eq!(attributes.last().map(String::as_str), Some("department"));
        assert_eq!(
            attributes
                .iter()
                .filter(|name| name.eq_ignore_ascii_case("mail"))
                .count(),
            1
        );
    }

    #[test]
    fn rejects_bad_addresses_and_credentials() {
        assert!(matches!(
            DirectoryConfig::new("not a url", credential(), base_dn()),
            Err(AuthError::Configuration(_))
        ));
        assert!(matches!(
            DirectoryConfig::new("https://dc01.example.org", credential(), base_dn()),
            Err(AuthError::Configuration(_))
        ));

        let empty = ServiceCredential::new(
            "cn=svc-auth,dc=example,dc=org",
            SecretString::from(String::new()),
        );
        assert!(matches!(
            DirectoryConfig::new("ldap://dc01.example.org", empty, base_dn()),
            Err(AuthError::Configuration(_))
        ));

        let malformed = ServiceCredential::new("svc-auth", SecretString::from("x".to_string()));
        assert!(matches!(
            DirectoryConfig::new("ldap://dc01.example.org", malformed, base_dn()),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn settings_from_lookup() {
        let mut vars = required_env();
        vars.insert("LDAP_PORT".to_string(), "3268".to_string());
        vars.insert("LDAP_BIND_TIMEOUT_SECS".to_string(), "2".to_string());
        vars.insert("LDAP_SEARCH_ATTRIBUTES".to_string(), "department, title".to_string());

        let settings = DirectorySettings::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(settings.port, Some(3268));
        assert_eq!(settings.bind_timeout_secs, 2);
        assert_eq!(settings.search_attributes, vec!["department", "title"]);
        assert_eq!(settings.bind_secret.expose_secret(), "secret");

        let config = DirectoryConfig::from_settings(settings).unwrap();
        assert_eq!(config.url(), "ldap://dc01.example.org:3268");
        assert_eq!(config.base_dn().as_str(), "dc=example,dc=org");
        assert_eq!(config.bind_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn settings_require_secret() {
        let mut vars = required_env();
        vars.remove("LDAP_BIND_PASSWORD");

        let err = DirectorySettings::from_lookup(|key| vars.get(key).cloned()).unwrap_err();
        assert_eq!(
            err,
            AuthError::Configuration("LDAP_BIND_PASSWORD is not set".to_string())
        );
    }

    #[test]
    fn settings_reject_unparsable_numbers() {
        let mut vars = required_env();
        vars.insert("LDAP_PORT".to_string(), "ldap".to_string());

        assert!(matches!(
            DirectorySettings::from_lookup(|key| vars.get(key).cloned()),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn settings_validation() {
        let vars = required_env();
        let mut settings = DirectorySettings::from_lookup(|key| vars.get(key).cloned()).unwrap();
        settings.search_timeout_secs = 0;
        assert!(settings.validate().is_err());

        settings.search_timeout_secs = 10;
        settings.protocol_version = 2;
        assert!(matches!(
            DirectoryConfig::from_settings(settings),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn bind_timeout_may_not_exceed_search_timeout() {
        let vars = required_env();
        let mut settings = DirectorySettings::from_lookup(|key| vars.get(key).cloned()).unwrap();
        settings.bind_timeout_secs = 30;

        assert!(matches!(
            DirectoryConfig::from_settings(settings),
            Err(AuthError::Configuration(_))
        ));
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: DirectorySettings = serde_json::from_str(
            r#"{
                "address": "ldap://dc01.example.org",
                "base_dn": "dc=example,dc=org",
                "bind_dn": "cn=svc-auth,dc=example,dc=org",
                "bind_secret": "secret",
                "exclusion": { "excluded_classes": [] }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.connect_timeout_secs, DEFAULT_CONNECT_TIMEOUT_SECS);
        assert_eq!(settings.protocol_version, 3);
        assert!(settings.exclusion.excluded_classes.is_empty());
        assert_eq!(settings.exclusion.principal_class, "user");
        assert_eq!(settings.attributes.login, "sAMAccountName");
        assert!(!format!("{settings:?}").contains("\"secret\""));
        assert!(DirectoryConfig::from_settings(settings).is_ok());
    }
}

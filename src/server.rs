//! Server connection records.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::dn::Dn;
use crate::error::{RegistryError, Result};

/// Conventional plain-LDAP port.
pub const DEFAULT_PORT: u16 = 389;
/// Protocol version most directory services require.
pub const DEFAULT_PROTOCOL_VERSION: u8 = 3;

/// How the consuming UI obtains bind credentials.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Operator enters DN and password at login time; nothing is persisted.
    #[default]
    Session,
    /// Empty-credential bind.
    Anonymous,
    /// Bind with the credentials stored in the record.
    FixedCredentials,
}

/// Stored credentials for [`AuthMode::FixedCredentials`].
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindCredentials {
    /// DN presented to the directory on bind.
    pub bind_dn: Dn,
    /// Password presented to the directory on bind.
    pub bind_password: String,
}

impl fmt::Debug for BindCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindCredentials")
            .field("bind_dn", &self.bind_dn)
            .field("bind_password", &"<redacted>")
            .finish()
    }
}

/// Non-fatal findings an operator must see before going to production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityWarning {
    /// Credentials and directory traffic cross the wire unencrypted.
    PlaintextTransport { identifier: String },
    /// The directory may be read without credentials.
    AnonymousBindAllowed { identifier: String },
}

impl fmt::Display for SecurityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlaintextTransport { identifier } => write!(
                f,
                "server `{identifier}` disables TLS, credentials will be sent in plaintext"
            ),
            Self::AnonymousBindAllowed { identifier } => {
                write!(f, "server `{identifier}` permits anonymous binds")
            },
        }
    }
}

/// Connection parameters for one LDAP directory service.
///
/// Built once at startup and never mutated afterwards; the actual
/// connection and bind belong to the consuming LDAP client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ServerConnectionConfig {
    /// Unique key within the registry; comes from the registry, not the
    /// record body.
    #[serde(skip)]
    pub(crate) identifier: String,
    /// Human-readable label shown in the server selection UI.
    #[validate(length(min = 1, message = "display name must not be empty"))]
    pub display_name: String,
    /// Hostname or IP address of the directory service.
    #[validate(length(min = 1, message = "host must not be empty"))]
    pub host: String,
    /// TCP port, conventionally 389 (plain) or 636 (TLS).
    #[serde(default = "default_port")]
    #[validate(range(min = 1, message = "port must be a valid TCP port"))]
    pub port: u16,
    /// Search roots the directory client is expected to browse from.
    pub base_dn: Vec<Dn>,
    /// LDAP protocol version, 2 or 3.
    #[serde(default = "default_protocol_version")]
    pub protocol_version: u8,
    /// Negotiate transport encryption before binding.
    #[serde(default)]
    pub tls: bool,
    /// How bind credentials are obtained.
    #[serde(default)]
    pub auth_type: AuthMode,
    /// Permit empty-credential binds.
    #[serde(default)]
    pub allow_anonymous_bind: bool,
    /// Required for [`AuthMode::FixedCredentials`], forbidden otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<BindCredentials>,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_protocol_version() -> u8 {
    DEFAULT_PROTOCOL_VERSION
}

impl Default for ServerConnectionConfig {
    fn default() -> Self {
        Self {
            identifier: String::default(),
            display_name: String::default(),
            host: String::default(),
            port: DEFAULT_PORT,
            base_dn: Vec::new(),
            protocol_version: DEFAULT_PROTOCOL_VERSION,
            tls: false,
            auth_type: AuthMode::default(),
            allow_anonymous_bind: false,
            bind: None,
        }
    }
}

impl ServerConnectionConfig {
    /// Create a record for `identifier` with default connection parameters.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }

    /// Unique key of this record within its registry.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Endpoint URL for the external LDAP client, `ldap://` or `ldaps://`.
    pub fn url(&self) -> Result<Url> {
        let scheme = if self.tls { "ldaps" } else { "ldap" };
        Ok(Url::parse(&format!("{scheme}://{}:{}", self.host, self.port))?)
    }

    /// Whether the UI must prompt the operator for DN and password.
    pub fn prompts_for_credentials(&self) -> bool {
        self.auth_type == AuthMode::Session
    }

    /// Full load-time validation pass. No field assignment validates on its
    /// own; a registry refuses to assemble before every record passes here.
    pub fn ensure_valid(&self) -> Result<()> {
        if !is_slug(&self.identifier) {
            return Err(RegistryError::InvalidIdentifier(
                self.identifier.clone(),
            ));
        }

        self.validate()
            .map_err(|source| RegistryError::Validation {
                identifier: self.identifier.clone(),
                source,
            })?;

        if !matches!(self.protocol_version, 2 | 3) {
            return Err(RegistryError::InvalidProtocolVersion {
                identifier: self.identifier.clone(),
                version: self.protocol_version,
            });
        }

        if self.base_dn.is_empty() {
            return Err(RegistryError::EmptyBaseDn(self.identifier.clone()));
        }

        match (self.auth_type, &self.bind) {
            (AuthMode::FixedCredentials, None) => {
                return Err(RegistryError::MissingBindCredentials(
                    self.identifier.clone(),
                ));
            },
            (AuthMode::Session | AuthMode::Anonymous, Some(_)) => {
                return Err(RegistryError::UnexpectedBindCredentials(
                    self.identifier.clone(),
                ));
            },
            (AuthMode::Anonymous, None) if !self.allow_anonymous_bind => {
                return Err(RegistryError::AnonymousBindDisabled(
                    self.identifier.clone(),
                ));
            },
            _ => {},
        }

        // the host must form a usable endpoint.
        self.url()?;

        Ok(())
    }

    /// Security findings on this record.
    pub fn warnings(&self) -> Vec<SecurityWarning> {
        let mut warnings = Vec::new();

        if !self.tls {
            warnings.push(SecurityWarning::PlaintextTransport {
                identifier: self.identifier.clone(),
            });
        }

        if self.allow_anonymous_bind {
            warnings.push(SecurityWarning::AnonymousBindAllowed {
                identifier: self.identifier.clone(),
            });
        }

        warnings
    }
}

/// Identifiers are slugs: lowercase alphanumeric with `_` and `-`.
fn is_slug(input: &str) -> bool {
    let mut chars = input.chars();

    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {},
        _ => return false,
    }

    chars.all(|c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'
    })
}

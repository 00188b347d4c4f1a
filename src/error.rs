//! Error handler for the server registry.

use thiserror::Error;
use validator::ValidationErrors;

use crate::dn::DnError;

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Enum representing registry load-time errors.
///
/// Every variant is fatal: an application must refuse to start with a
/// malformed server registry rather than run partially configured.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("server `{0}` is already registered")]
    DuplicateServer(String),

    #[error("server `{0}` is not registered")]
    UnknownServer(String),

    #[error("server identifier `{0}` is not a lowercase slug")]
    InvalidIdentifier(String),

    #[error(
        "server `{identifier}` declares LDAP protocol version {version}, expected 2 or 3"
    )]
    InvalidProtocolVersion { identifier: String, version: u8 },

    #[error("server `{0}` declares no base DN to search from")]
    EmptyBaseDn(String),

    #[error("server `{0}` uses fixed credentials but has no `bind` entry")]
    MissingBindCredentials(String),

    #[error("server `{0}` carries a `bind` entry its auth mode never uses")]
    UnexpectedBindCredentials(String),

    #[error(
        "server `{0}` requests anonymous authentication while forbidding anonymous binds"
    )]
    AnonymousBindDisabled(String),

    #[error("server `{identifier}` failed field validation")]
    Validation {
        identifier: String,
        #[source]
        source: ValidationErrors,
    },

    #[error("malformed distinguished name: {0}")]
    Dn(#[from] DnError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to deserialize server registry: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("endpoint URL is invalid: {0}")]
    Url(#[from] url::ParseError),
}

//! Typed and validated LDAP server connection registry for directory
//! browsing frontends.
//!
//! One registry holds the named records describing how to reach and
//! authenticate against each LDAP directory service. The registry is read
//! from a YAML file once at startup, validated as a whole, and handed out
//! immutable; opening connections and binding stay with the consuming LDAP
//! client.

#![forbid(unsafe_code)]

pub mod config;
pub mod dn;
pub mod error;
pub mod registry;
pub mod server;
pub mod telemetry;

use std::path::PathBuf;

pub use config::Configuration;
pub use dn::Dn;
pub use error::{RegistryError, Result};
pub use registry::{RegistryBuilder, ServerRegistry};
pub use server::{
    AuthMode, BindCredentials, SecurityWarning, ServerConnectionConfig,
};

/// Load and validate the server registry from `path`, or from the default
/// location when `path` is `None`.
///
/// Every security finding is logged at `warn` level so an operator cannot
/// silently ship plaintext credential transmission to production.
pub fn load_registry(path: Option<PathBuf>) -> Result<ServerRegistry> {
    let mut config = Configuration::default();
    if let Some(path) = path {
        config = config.path(path);
    }

    let registry = config.read()?.into_registry()?;

    for warning in registry.security_warnings() {
        tracing::warn!(%warning, "insecure server configuration");
    }

    Ok(registry)
}

//! Server registry assembly and lookup.

use crate::error::{RegistryError, Result};
use crate::server::{SecurityWarning, ServerConnectionConfig};

/// Accumulates draft records, then validates them into a [`ServerRegistry`].
///
/// Field writes on a draft perform no validation; everything is checked in
/// one pass by [`RegistryBuilder::build`], and a single invalid record keeps
/// the whole registry from assembling.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    servers: Vec<ServerConnectionConfig>,
}

impl RegistryBuilder {
    /// Create an empty [`RegistryBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identifier` with default connection parameters.
    pub fn register(
        &mut self,
        identifier: impl Into<String>,
    ) -> Result<&mut ServerConnectionConfig> {
        self.insert(ServerConnectionConfig::new(identifier))?;

        let index = self.servers.len() - 1;
        Ok(&mut self.servers[index])
    }

    /// Register a fully assembled record.
    pub fn insert(&mut self, server: ServerConnectionConfig) -> Result<()> {
        if self
            .servers
            .iter()
            .any(|s| s.identifier() == server.identifier())
        {
            return Err(RegistryError::DuplicateServer(
                server.identifier().to_owned(),
            ));
        }

        self.servers.push(server);
        Ok(())
    }

    /// Typed access to a previously registered record.
    pub fn server_mut(
        &mut self,
        identifier: &str,
    ) -> Result<&mut ServerConnectionConfig> {
        self.servers
            .iter_mut()
            .find(|s| s.identifier() == identifier)
            .ok_or_else(|| RegistryError::UnknownServer(identifier.to_owned()))
    }

    /// Validate every record and seal the registry.
    pub fn build(self) -> Result<ServerRegistry> {
        for server in &self.servers {
            server.ensure_valid()?;
        }

        Ok(ServerRegistry {
            servers: self.servers,
        })
    }
}

/// Immutable, validated collection of server records.
///
/// Read-only after assembly; concurrent readers need no synchronization.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerRegistry {
    servers: Vec<ServerConnectionConfig>,
}

impl ServerRegistry {
    /// Start assembling a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Record for the connecting component.
    pub fn resolve(&self, identifier: &str) -> Option<&ServerConnectionConfig> {
        self.servers.iter().find(|s| s.identifier() == identifier)
    }

    /// Records in registration order, for the selection UI.
    pub fn iter(&self) -> impl Iterator<Item = &ServerConnectionConfig> {
        self.servers.iter()
    }

    /// Number of registered servers.
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// Whether no server is registered.
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Security findings across every record.
    pub fn security_warnings(&self) -> Vec<SecurityWarning> {
        self.servers.iter().flat_map(|s| s.warnings()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::AuthMode;

    /// The reference deployment: one Samba4 AD DC for a development domain.
    fn samba_registry() -> ServerRegistry {
        let mut builder = ServerRegistry::builder();

        let server = builder.register("ldap_pla").unwrap();
        server.display_name = "Samba4 AD – skola.local".into();
        server.host = "dc.skola.local".into();
        server.port = 389;
        server.base_dn = vec!["DC=skola,DC=local".parse().unwrap()];
        server.protocol_version = 3;
        server.tls = false;
        server.auth_type = AuthMode::Session;
        server.allow_anonymous_bind = false;

        builder.build().unwrap()
    }

    #[test]
    fn test_register_set_resolve() {
        let registry = samba_registry();
        let server = registry.resolve("ldap_pla").unwrap();

        assert_eq!(server.identifier(), "ldap_pla");
        assert_eq!(server.display_name, "Samba4 AD – skola.local");
        assert_eq!(server.host, "dc.skola.local");
        assert_eq!(server.port, 389);
        assert_eq!(server.base_dn.len(), 1);
        assert_eq!(server.base_dn[0].as_str(), "DC=skola,DC=local");
        assert_eq!(server.protocol_version, 3);
        assert!(!server.tls);
        assert_eq!(server.auth_type, AuthMode::Session);
        assert!(!server.allow_anonymous_bind);
        assert!(server.bind.is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let mut builder = ServerRegistry::builder();
        builder.register("primary").unwrap();

        // assignment order across fields must not matter.
        builder.server_mut("primary").unwrap().port = 10389;
        builder.server_mut("primary").unwrap().host = "old.example.org".into();
        builder.server_mut("primary").unwrap().display_name =
            "Primary".into();
        builder.server_mut("primary").unwrap().base_dn =
            vec!["DC=example,DC=org".parse().unwrap()];
        builder.server_mut("primary").unwrap().host = "dc.example.org".into();
        builder.server_mut("primary").unwrap().tls = true;

        let registry = builder.build().unwrap();
        let server = registry.resolve("primary").unwrap();
        assert_eq!(server.host, "dc.example.org");
        assert_eq!(server.port, 10389);
        assert!(server.tls);
    }

    #[test]
    fn test_duplicate_identifier() {
        let mut builder = ServerRegistry::builder();
        builder.register("ldap_pla").unwrap();

        assert!(matches!(
            builder.register("ldap_pla"),
            Err(RegistryError::DuplicateServer(identifier)) if identifier == "ldap_pla"
        ));
    }

    #[test]
    fn test_set_on_unregistered() {
        let mut builder = ServerRegistry::builder();

        assert!(matches!(
            builder.server_mut("ghost"),
            Err(RegistryError::UnknownServer(identifier)) if identifier == "ghost"
        ));
    }

    #[test]
    fn test_build_validates() {
        let mut builder = ServerRegistry::builder();
        builder.register("half-set").unwrap();

        // neither host nor base_dn were ever assigned.
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(samba_registry().resolve("ghost").is_none());
    }

    #[test]
    fn test_registration_order() {
        let mut builder = ServerRegistry::builder();
        for identifier in ["zeta", "alpha", "mid"] {
            let server = builder.register(identifier).unwrap();
            server.display_name = identifier.to_uppercase();
            server.host = format!("{identifier}.example.org");
            server.base_dn = vec!["DC=example,DC=org".parse().unwrap()];
        }

        let registry = builder.build().unwrap();
        let order: Vec<_> =
            registry.iter().map(ServerConnectionConfig::identifier).collect();
        assert_eq!(order, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_security_warnings() {
        let registry = samba_registry();
        assert_eq!(
            registry.security_warnings(),
            vec![SecurityWarning::PlaintextTransport {
                identifier: "ldap_pla".into()
            }]
        );
    }
}

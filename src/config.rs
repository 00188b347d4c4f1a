//! Configuration manager for the server registry.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::ServerRegistry;
use crate::server::ServerConnectionConfig;

const DEFAULT_CONFIG_PATH: &str = "servers.yaml";

/// On-disk layout: one mapping of server records keyed by identifier.
///
/// The mapping is order-independent; identifiers are unique by
/// construction of the format.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Registered servers, keyed by their unique identifier.
    pub servers: BTreeMap<String, ServerConnectionConfig>,
    #[serde(skip)]
    path: PathBuf,
}

impl Configuration {
    /// Override the configuration file location.
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Reads the registry file from the specified path or the default
    /// location.
    ///
    /// Unlike a best-effort loader, any IO or syntax problem is returned
    /// as-is: a misread registry must keep the application from starting.
    pub fn read(self) -> Result<Self> {
        let file_path = if self.path.as_os_str().is_empty() {
            Path::new(DEFAULT_CONFIG_PATH).to_path_buf()
        } else {
            self.path
        };

        let file = File::open(&file_path)?;
        let mut config: Configuration = serde_yaml::from_reader(file)?;
        config.path = file_path;

        tracing::debug!(
            path = %config.path.display(),
            servers = config.servers.len(),
            "read server registry file"
        );

        Ok(config)
    }

    /// Promote the raw file contents into a validated [`ServerRegistry`].
    pub fn into_registry(self) -> Result<ServerRegistry> {
        let mut builder = ServerRegistry::builder();

        for (identifier, mut server) in self.servers {
            server.identifier = identifier;
            builder.insert(server)?;
        }

        builder.build()
    }
}

impl From<&ServerRegistry> for Configuration {
    fn from(registry: &ServerRegistry) -> Self {
        Self {
            servers: registry
                .iter()
                .map(|server| {
                    (server.identifier().to_owned(), server.clone())
                })
                .collect(),
            path: PathBuf::default(),
        }
    }
}

use std::path::PathBuf;
use std::process::ExitCode;

use ldap_registry::{Configuration, telemetry};

/// Check a server registry file: load, validate, report.
///
/// Usage: `ldap-registry [path] [--json]`.
fn main() -> ExitCode {
    telemetry::init();

    let mut path = None;
    let mut json = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            _ => path = Some(PathBuf::from(arg)),
        }
    }

    let registry = match ldap_registry::load_registry(path) {
        Ok(registry) => registry,
        Err(err) => {
            tracing::error!(
                error = %err,
                "refusing to start with a malformed server registry"
            );
            return ExitCode::FAILURE;
        },
    };

    for server in registry.iter() {
        let endpoint = server
            .url()
            .map(|url| url.to_string())
            .unwrap_or_default();

        tracing::info!(
            identifier = %server.identifier(),
            name = %server.display_name,
            %endpoint,
            "registered LDAP server"
        );
    }

    if json {
        match serde_json::to_string_pretty(&Configuration::from(&registry)) {
            Ok(out) => println!("{out}"),
            Err(err) => {
                tracing::error!(error = %err, "cannot serialize registry");
                return ExitCode::FAILURE;
            },
        }
    }

    ExitCode::SUCCESS
}

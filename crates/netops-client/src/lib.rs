pub mod config;
pub mod error;
pub mod http;

use std::path::Path;

use netops_shared::UserOperatorServers;
use tracing_subscriber::{fmt, EnvFilter};

pub use config::ClientConfig;
pub use error::ConfigError;
pub use http::HttpAuthority;

/// Install the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,netops_core=debug,netops_client=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Read the user's operators and servers from a JSON file.
pub fn load_servers(path: &Path) -> Result<Vec<UserOperatorServers>, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let servers: Vec<UserOperatorServers> =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), entries = servers.len(), "Loaded servers file");
    Ok(servers)
}

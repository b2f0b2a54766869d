//! Shared client construction for CLI commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use c11n_client::Client;
use c11n_core::C11nConfig;
use c11n_core::types::{PublicKey, TransactionHash};

/// Config from env → file → defaults, with `--socket` taking precedence.
/// Writes a default config file on first run.
pub fn load_config(socket: Option<&str>) -> Result<C11nConfig> {
    if let Err(e) = C11nConfig::write_default_if_missing() {
        tracing::warn!(error = %e, "failed to write default config");
    }
    let mut config = C11nConfig::load().context("failed to load config")?;
    if let Some(socket) = socket {
        config.node.socket_path = PathBuf::from(socket);
    }
    Ok(config)
}

pub fn client(config: &C11nConfig) -> Result<Client> {
    Client::with_config(&config.node.socket_path, &config.transport).with_context(|| {
        format!(
            "failed to set up client for {}",
            config.node.socket_path.display()
        )
    })
}

/// Parse a comma-separated list of base64 keys. Empty entries are dropped.
pub fn parse_recipients(list: &str) -> Vec<PublicKey> {
    list.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(PublicKey::from)
        .collect()
}

pub fn parse_hash(b64: &str) -> Result<TransactionHash> {
    TransactionHash::from_base64(b64).with_context(|| format!("invalid transaction hash {b64}"))
}

/// Error context for calls that reach the node.
pub fn unreachable_hint(config: &C11nConfig) -> String {
    format!(
        "request to node at {} failed (is it running?)",
        config.node.socket_path.display()
    )
}

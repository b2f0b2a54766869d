//! Node lifecycle commands: upcheck, launch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use c11n_core::C11nConfig;

use super::connect::{client, unreachable_hint};

pub async fn cmd_upcheck(config: &C11nConfig) -> Result<()> {
    let client = client(config)?;
    client
        .probe()
        .await
        .with_context(|| unreachable_hint(config))?;
    println!("Node at {} is up.", config.node.socket_path.display());
    Ok(())
}

/// Launch the node, wait for it to answer, then stay in the foreground until
/// Ctrl-C (node is killed) or the node exits on its own.
pub async fn cmd_launch(config: &C11nConfig, node_config: Option<&str>) -> Result<()> {
    let mut config = config.clone();
    if let Some(path) = node_config {
        config.node.config_path = PathBuf::from(path);
    }

    let (mut node, _client) = c11n_client::start(&config).await.with_context(|| {
        format!(
            "failed to start {} with {}",
            config.node.binary.display(),
            config.node.config_path.display()
        )
    })?;

    println!("═══════════════════════════════════════");
    println!("  Node Running");
    println!("═══════════════════════════════════════");
    println!("  pid    : {}", node.id().map(|p| p.to_string()).unwrap_or_default());
    println!("  binary : {}", config.node.binary.display());
    println!("  config : {}", node.config_path().display());
    println!("  socket : {}", config.node.socket_path.display());

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown signal received");
            node.kill().await.context("failed to stop node")?;
            println!("Node stopped.");
        }
        status = node.wait() => {
            let status = status.context("failed to wait for node")?;
            tracing::warn!(%status, "node exited");
            anyhow::bail!("node exited: {}", status);
        }
    }

    Ok(())
}

//! Transaction metadata commands: is-sender, participants.

use anyhow::{Context, Result};
use c11n_core::C11nConfig;

use super::connect::{client, parse_hash, unreachable_hint};

pub async fn cmd_is_sender(config: &C11nConfig, b64_hash: &str) -> Result<()> {
    let hash = parse_hash(b64_hash)?;
    let client = client(config)?;
    let sender = client
        .is_sender(&hash)
        .await
        .with_context(|| unreachable_hint(config))?;
    println!("{}", sender);
    Ok(())
}

pub async fn cmd_participants(config: &C11nConfig, b64_hash: &str) -> Result<()> {
    let hash = parse_hash(b64_hash)?;
    let client = client(config)?;
    let participants = client
        .get_participants(&hash)
        .await
        .with_context(|| unreachable_hint(config))?;

    // An empty body comes back as a single empty entry.
    if participants.iter().all(|p| p.is_empty()) {
        println!("No participants recorded for {}.", hash);
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Participants ({})", participants.len());
    println!("═══════════════════════════════════════");
    for p in &participants {
        println!("  {}", p);
    }
    Ok(())
}

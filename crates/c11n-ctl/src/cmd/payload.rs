//! Payload commands: send, send-signed, receive.

use anyhow::{Context, Result};
use c11n_core::C11nConfig;
use c11n_core::types::PublicKey;
use c11n_core::wire;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use super::connect::{client, parse_recipients, unreachable_hint};

/// Read a payload from a file, or from stdin when `path` is `-`.
async fn read_payload(path: &str) -> Result<Vec<u8>> {
    if path == "-" {
        let mut buf = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut buf)
            .await
            .context("failed to read payload from stdin")?;
        return Ok(buf);
    }
    tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read payload file: {}", path))
}

pub async fn cmd_send(config: &C11nConfig, path: &str, to: &str, from: Option<&str>) -> Result<()> {
    let client = client(config)?;
    let payload = read_payload(path).await?;
    let recipients = parse_recipients(to);
    let from = from.map(PublicKey::from);
    let size = payload.len();

    let key = client
        .send_payload(payload, from.as_ref(), &recipients)
        .await
        .with_context(|| unreachable_hint(config))?;

    println!("Sent {} bytes to {} recipient(s).", size, recipients.len());
    println!("  key : {}", wire::encode_key(&key));
    Ok(())
}

pub async fn cmd_send_signed(config: &C11nConfig, path: &str, to: &str) -> Result<()> {
    let client = client(config)?;
    let payload = read_payload(path).await?;
    let recipients = parse_recipients(to);
    let size = payload.len();

    let key = client
        .send_signed_payload(payload, &recipients)
        .await
        .with_context(|| unreachable_hint(config))?;

    println!(
        "Sent {} signed bytes to {} recipient(s).",
        size,
        recipients.len()
    );
    println!("  key : {}", wire::encode_key(&key));
    Ok(())
}

/// Writes the raw payload to stdout so it can be piped.
pub async fn cmd_receive(config: &C11nConfig, b64_key: &str) -> Result<()> {
    let key = PublicKey::from(b64_key)
        .to_bytes()
        .with_context(|| format!("invalid key {b64_key}"))?;
    let client = client(config)?;
    let payload = client
        .receive_payload(&key)
        .await
        .with_context(|| unreachable_hint(config))?;

    let mut stdout = tokio::io::stdout();
    stdout.write_all(&payload).await?;
    stdout.flush().await?;
    Ok(())
}

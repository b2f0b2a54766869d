//! c11n-ctl: command-line interface for a local relay node.

mod cmd;

use anyhow::{Context, Result};

fn print_usage() {
    println!("Usage: c11n-ctl [--socket <path>] <command>");
    println!();
    println!("Commands:");
    println!("  upcheck                             Check that the node is serving");
    println!("  send <file|-> <to,...> [--from <key>]  Send a payload, print its key");
    println!("  send-signed <file|-> <to,...>       Send a signed payload, print its key");
    println!("  receive <key>                       Write the payload for <key> to stdout");
    println!("  is-sender <hash>                    Whether this node sent <hash>");
    println!("  participants <hash>                 List the parties to <hash>");
    println!("  launch [<node-config>]              Start the node and keep it running");
    println!();
    println!("Keys and hashes are standard base64. Recipients are comma-separated.");
    println!();
    println!("Options:");
    println!("  --socket <path>   Node socket (default: from config, $C11N_NODE__SOCKET_PATH)");
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse --socket and --from options
    let mut socket: Option<String> = None;
    let mut from: Option<String> = None;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--socket" => {
                i += 1;
                socket = Some(args.get(i).context("--socket requires a value")?.clone());
            }
            "--from" => {
                i += 1;
                from = Some(args.get(i).context("--from requires a value")?.clone());
            }
            other => remaining.push(other),
        }
        i += 1;
    }

    if matches!(remaining.as_slice(), ["help"] | ["--help"] | ["-h"]) {
        print_usage();
        return Ok(());
    }

    let config = cmd::connect::load_config(socket.as_deref())?;

    match remaining.as_slice() {
        ["upcheck"] | [] => cmd::node::cmd_upcheck(&config).await,
        ["send", path, to] => {
            cmd::payload::cmd_send(&config, path, to, from.as_deref()).await
        }
        ["send-signed", path, to] => cmd::payload::cmd_send_signed(&config, path, to).await,
        ["receive", key] => cmd::payload::cmd_receive(&config, key).await,
        ["is-sender", hash] => cmd::transaction::cmd_is_sender(&config, hash).await,
        ["participants", hash] => cmd::transaction::cmd_participants(&config, hash).await,
        ["launch"] => cmd::node::cmd_launch(&config, None).await,
        ["launch", node_config] => cmd::node::cmd_launch(&config, Some(*node_config)).await,
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

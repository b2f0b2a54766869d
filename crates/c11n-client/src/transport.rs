//! HTTP over the node's Unix domain socket.
//!
//! reqwest is pointed at a single socket path, so every URL addressed to the
//! virtual host (`http://c/...`) is delivered to the node without touching
//! the network stack. Requests are built exactly as they would be for TCP.

use std::path::Path;

use c11n_core::config::TransportConfig;

use crate::error::Result;

/// Build the HTTP client bound to `socket_path`.
///
/// reqwest has no separate response-header deadline; the read timeout bounds
/// the wait for each read, headers included, and the request timeout bounds
/// the whole exchange.
pub fn unix_client(socket_path: &Path, config: &TransportConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .unix_socket(socket_path.to_path_buf())
        .connect_timeout(config.connect_timeout())
        .timeout(config.request_timeout())
        .read_timeout(config.response_header_timeout())
        .build()?;
    Ok(client)
}

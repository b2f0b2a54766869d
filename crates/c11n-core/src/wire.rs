//! Node API wire format: paths, headers and body encodings.
//!
//! The node speaks HTTP/1.1 over a Unix domain socket. Every request is
//! addressed to the virtual host [`VIRTUAL_HOST`]; the transport routes that
//! host to the socket, so the host name itself never reaches the network.
//! Everything here is part of the node's external contract: renaming a header
//! or path breaks interoperability with deployed nodes.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::types::{PublicKey, TransactionHash};

// ── Addressing ────────────────────────────────────────────────────────────────

/// Virtual host mapped to the node's socket.
pub const VIRTUAL_HOST: &str = "c";

pub const PATH_UPCHECK: &str = "upcheck";
pub const PATH_SEND_RAW: &str = "sendraw";
pub const PATH_SEND_SIGNED: &str = "sendsignedtx";
pub const PATH_RECEIVE_RAW: &str = "receiveraw";
pub const PATH_TRANSACTION: &str = "transaction";
pub const LEAF_IS_SENDER: &str = "isSender";
pub const LEAF_PARTICIPANTS: &str = "participants";

/// Full request URL for a node API path, e.g. `http://c/upcheck`.
pub fn node_url(path: &str) -> String {
    format!("http://{}/{}", VIRTUAL_HOST, path.trim_start_matches('/'))
}

/// `transaction/{hash}/{leaf}` with the base64 hash percent-escaped.
///
/// Base64 uses `/`, which would otherwise split the segment, and `+`/`=`,
/// which some routers treat specially. All three are escaped.
pub fn transaction_path(hash: &TransactionHash, leaf: &str) -> String {
    format!(
        "{}/{}/{}",
        PATH_TRANSACTION,
        urlencoding::encode(&hash.to_base64()),
        leaf
    )
}

// ── Headers ───────────────────────────────────────────────────────────────────

/// Sender public key (base64). Omitted entirely for self-transactions.
pub const HEADER_FROM: &str = "c11n-from";
/// Recipient public keys, base64, comma-joined.
pub const HEADER_TO: &str = "c11n-to";
/// Lookup key (base64) for `receiveraw`.
pub const HEADER_KEY: &str = "c11n-key";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";

/// Value of the `c11n-to` header.
pub fn join_recipients(to: &[PublicKey]) -> String {
    to.iter()
        .map(PublicKey::as_base64)
        .collect::<Vec<_>>()
        .join(",")
}

/// Value of the `c11n-key` header.
pub fn encode_key(key: &[u8]) -> String {
    STANDARD.encode(key)
}

// ── Response bodies ───────────────────────────────────────────────────────────

/// Decode a base64 response body. Line breaks are ignored, matching what the
/// node's own streaming decoders accept.
pub fn decode_base64_body(body: &[u8]) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Vec<u8> = body
        .iter()
        .copied()
        .filter(|b| *b != b'\r' && *b != b'\n')
        .collect();
    STANDARD.decode(compact)
}

/// `isSender` answers with the literal `true`; any other body means false.
pub fn parse_is_sender(body: &[u8]) -> bool {
    body == b"true"
}

/// Split a `participants` body on commas.
///
/// An empty body yields `[""]`, not an empty list. Callers that care must
/// check for it; the quirk is kept so an upstream bug is not papered over.
pub fn split_participants(body: &str) -> Vec<String> {
    body.split(',').map(str::to_string).collect()
}

//! Payload client, the request/response contract of the node API.
//!
//! Every call is one independent HTTP exchange over the socket. A response
//! is checked for exactly 200 before anything looks at its body; any other
//! status becomes [`ClientError::UnexpectedStatus`] and the body is dropped
//! unread. Nothing here retries.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

use c11n_core::config::TransportConfig;
use c11n_core::types::{PublicKey, TransactionHash};
use c11n_core::wire::{self, HEADER_FROM, HEADER_KEY, HEADER_TO};

use crate::error::{ClientError, Result};
use crate::transport;

/// Handle to one node, bound to one socket.
///
/// Cheap to clone; clones share the connection pool. Safe to use from many
/// tasks at once since no call holds per-request state on the client.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    socket_path: Arc<PathBuf>,
}

impl Client {
    /// Client with the default 1s connect / 5s request timeouts.
    pub fn new(socket_path: impl Into<PathBuf>) -> Result<Self> {
        Self::with_config(socket_path, &TransportConfig::default())
    }

    pub fn with_config(socket_path: impl Into<PathBuf>, config: &TransportConfig) -> Result<Self> {
        let socket_path = socket_path.into();
        let http = transport::unix_client(&socket_path, config)?;
        Ok(Self {
            http,
            socket_path: Arc::new(socket_path),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    // ── Operations ───────────────────────────────────────────────────────────

    /// POST `body` as JSON to `path`. The caller decodes the response.
    pub async fn send_json<T>(&self, path: &str, body: &T) -> Result<Response>
    where
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_vec(body)?;
        let req = self
            .http
            .post(wire::node_url(path))
            .header(CONTENT_TYPE, wire::CONTENT_TYPE_JSON)
            .body(encoded);
        self.execute(path, req).await
    }

    /// Distribute `payload` to `to`. Returns the key the node stored it
    /// under.
    ///
    /// `from` may be `None` (or an empty key) for a self-transaction, in
    /// which case the `c11n-from` header is left off altogether.
    pub async fn send_payload(
        &self,
        payload: impl Into<Bytes>,
        from: Option<&PublicKey>,
        to: &[PublicKey],
    ) -> Result<Vec<u8>> {
        let mut req = self
            .http
            .post(wire::node_url(wire::PATH_SEND_RAW))
            .header(CONTENT_TYPE, wire::CONTENT_TYPE_OCTET_STREAM)
            .header(HEADER_TO, wire::join_recipients(to))
            .body(payload.into());
        if let Some(from) = from.filter(|k| !k.is_empty()) {
            req = req.header(HEADER_FROM, from.as_base64());
        }
        let res = self.execute(wire::PATH_SEND_RAW, req).await?;
        decode_key(res).await
    }

    /// Distribute an already signed payload. The signature identifies the
    /// sender, so no `c11n-from` is sent.
    pub async fn send_signed_payload(
        &self,
        signed_payload: impl Into<Bytes>,
        to: &[PublicKey],
    ) -> Result<Vec<u8>> {
        let req = self
            .http
            .post(wire::node_url(wire::PATH_SEND_SIGNED))
            .header(CONTENT_TYPE, wire::CONTENT_TYPE_OCTET_STREAM)
            .header(HEADER_TO, wire::join_recipients(to))
            .body(signed_payload.into());
        let res = self.execute(wire::PATH_SEND_SIGNED, req).await?;
        decode_key(res).await
    }

    /// Fetch the raw payload stored under `key`.
    pub async fn receive_payload(&self, key: &[u8]) -> Result<Bytes> {
        let req = self
            .http_get(wire::PATH_RECEIVE_RAW)
            .header(HEADER_KEY, wire::encode_key(key));
        let res = self.execute(wire::PATH_RECEIVE_RAW, req).await?;
        Ok(res.bytes().await?)
    }

    /// Whether this node sent `tx`. Only a body of exactly `true` counts.
    pub async fn is_sender(&self, tx: &TransactionHash) -> Result<bool> {
        let path = wire::transaction_path(tx, wire::LEAF_IS_SENDER);
        let req = self.http_get(&path);
        let res = self.execute(&path, req).await?;
        let body = res.bytes().await?;
        Ok(wire::parse_is_sender(&body))
    }

    /// Base64 keys of everyone party to `tx`, in the node's order.
    ///
    /// An empty body comes back as `vec![""]`, not an empty vec. The body
    /// must be UTF-8 whatever `Content-Type` says.
    pub async fn get_participants(&self, tx: &TransactionHash) -> Result<Vec<String>> {
        let path = wire::transaction_path(tx, wire::LEAF_PARTICIPANTS);
        let req = self.http_get(&path);
        let res = self.execute(&path, req).await?;
        let body = String::from_utf8(res.bytes().await?.to_vec())?;
        Ok(wire::split_participants(&body))
    }

    // ── Plumbing ─────────────────────────────────────────────────────────────

    pub(crate) fn http_get(&self, path: &str) -> RequestBuilder {
        self.http.get(wire::node_url(path))
    }

    /// Send and require exactly 200.
    pub(crate) async fn execute(&self, path: &str, req: RequestBuilder) -> Result<Response> {
        let res = req.send().await?;
        let status = res.status();
        debug!(path, status = status.as_u16(), "node response");
        if status != StatusCode::OK {
            return Err(ClientError::UnexpectedStatus {
                path: path.to_string(),
                status,
                headers: res.headers().clone(),
            });
        }
        Ok(res)
    }
}

async fn decode_key(res: Response) -> Result<Vec<u8>> {
    let body = res.bytes().await?;
    Ok(wire::decode_base64_body(&body)?)
}

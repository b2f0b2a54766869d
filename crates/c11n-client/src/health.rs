//! Liveness checks against `/upcheck`.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use c11n_core::wire;

use crate::client::Client;
use crate::error::{ClientError, Result};

impl Client {
    /// One `GET /upcheck`. Ok only on 200; no retry.
    pub async fn probe(&self) -> Result<()> {
        let req = self.http_get(wire::PATH_UPCHECK);
        match self.execute(wire::PATH_UPCHECK, req).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(socket = %self.socket_path().display(), error = %e, "node upcheck failed");
                Err(e)
            }
        }
    }

    /// Probe every `interval` until the node answers or `timeout` passes.
    ///
    /// Always probes at least once. On timeout the last probe error is kept
    /// in [`ClientError::NotReady`].
    pub async fn wait_until_ready(&self, interval: Duration, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let req = self.http_get(wire::PATH_UPCHECK);
            let err = match self.execute(wire::PATH_UPCHECK, req).await {
                Ok(_) => {
                    debug!(attempts, "node ready");
                    return Ok(());
                }
                Err(e) => e,
            };
            if Instant::now() + interval > deadline {
                warn!(attempts, error = %err, "node did not become ready");
                return Err(ClientError::NotReady {
                    timeout,
                    last: Box::new(err),
                });
            }
            debug!(attempts, error = %err, "node not ready yet");
            tokio::time::sleep(interval).await;
        }
    }
}

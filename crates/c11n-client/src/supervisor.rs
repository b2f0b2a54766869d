//! Node process supervision.
//!
//! The node is started as `<binary> <config_path>`. Its stderr is copied to
//! ours for as long as it runs; stdout is discarded. After spawning we sleep
//! a short settle interval so the node has a chance to bind its socket. That
//! is a heuristic only: callers must still probe before relying on the node,
//! which is what [`start`] does.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::{Child, Command};
use tracing::{debug, info};

use c11n_core::config::{C11nConfig, ReadinessMode, DEFAULT_NODE_BINARY, DEFAULT_SETTLE};

use crate::client::Client;
use crate::error::{ClientError, Result};

/// How to decide the node is up after launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessPolicy {
    /// Settle delay, then a single probe.
    Settle,
    /// Settle delay, then probe every `interval` until `timeout`.
    Poll { interval: Duration, timeout: Duration },
}

impl ReadinessPolicy {
    pub fn from_config(config: &C11nConfig) -> Self {
        match config.readiness.mode {
            ReadinessMode::Settle => ReadinessPolicy::Settle,
            ReadinessMode::Poll => ReadinessPolicy::Poll {
                interval: config.readiness.poll_interval(),
                timeout: config.readiness.poll_timeout(),
            },
        }
    }
}

/// Starts node processes.
#[derive(Debug, Clone)]
pub struct Supervisor {
    binary: PathBuf,
    settle: Duration,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new(DEFAULT_NODE_BINARY)
    }
}

impl Supervisor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            settle: DEFAULT_SETTLE,
        }
    }

    pub fn from_config(config: &C11nConfig) -> Self {
        Self::new(&config.node.binary).with_settle(config.node.settle())
    }

    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Spawn the node with `config_path` as its only argument.
    ///
    /// Returns once the spawn succeeded and the settle interval has passed.
    /// The node is not killed when the returned handle is dropped.
    pub async fn launch(&self, config_path: &Path) -> Result<NodeProcess> {
        let mut child = Command::new(&self.binary)
            .arg(config_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ClientError::Launch {
                binary: self.binary.clone(),
                source,
            })?;

        let pid = child.id();
        info!(binary = %self.binary.display(), pid, config = %config_path.display(), "node launched");

        if let Some(mut stderr) = child.stderr.take() {
            // Detached; a broken pipe here only costs us log output.
            tokio::spawn(async move {
                let mut out = tokio::io::stderr();
                match tokio::io::copy(&mut stderr, &mut out).await {
                    Ok(n) => debug!(pid, bytes = n, "node stderr closed"),
                    Err(e) => debug!(pid, error = %e, "node stderr forwarding stopped"),
                }
            });
        }

        tokio::time::sleep(self.settle).await;

        Ok(NodeProcess {
            child,
            config_path: config_path.to_path_buf(),
        })
    }
}

/// A running node started by [`Supervisor::launch`].
#[derive(Debug)]
pub struct NodeProcess {
    child: Child,
    config_path: PathBuf,
}

impl NodeProcess {
    /// OS pid, or `None` once the process has been reaped.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
        self.child.try_wait()
    }

    pub async fn wait(&mut self) -> std::io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// SIGKILL the node and reap it.
    pub async fn kill(&mut self) -> std::io::Result<()> {
        info!(pid = self.child.id(), "stopping node");
        self.child.kill().await
    }
}

/// Launch the node described by `config`, connect a client to its socket
/// and confirm it is serving.
///
/// If the readiness check fails the node is killed before the error is
/// returned.
pub async fn start(config: &C11nConfig) -> Result<(NodeProcess, Client)> {
    let supervisor = Supervisor::from_config(config);
    let mut node = supervisor.launch(&config.node.config_path).await?;
    let client = match Client::with_config(&config.node.socket_path, &config.transport) {
        Ok(c) => c,
        Err(e) => {
            let _ = node.kill().await;
            return Err(e);
        }
    };

    let ready = match ReadinessPolicy::from_config(config) {
        ReadinessPolicy::Settle => client.probe().await,
        ReadinessPolicy::Poll { interval, timeout } => {
            client.wait_until_ready(interval, timeout).await
        }
    };
    if let Err(e) = ready {
        let _ = node.kill().await;
        return Err(e);
    }

    Ok((node, client))
}

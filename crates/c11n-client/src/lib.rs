//! c11n-client: supervise a local relay node and talk to it over its Unix
//! socket.
//!
//! ```no_run
//! # async fn demo() -> c11n_client::Result<()> {
//! use c11n_client::{Client, PublicKey};
//!
//! let client = Client::new("/run/c11n/node.ipc")?;
//! client.probe().await?;
//! let to = [PublicKey::from("QfeDAys9MPDs2XHExtc84jKGHxZg/aj52DTh0vtA3Xc=")];
//! let key = client.send_payload(b"opaque".to_vec(), None, &to).await?;
//! let payload = client.receive_payload(&key).await?;
//! # let _ = payload;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod health;
pub mod supervisor;
pub mod transport;

pub use c11n_core::{PublicKey, TransactionHash};
pub use client::Client;
pub use error::{BodyError, ClientError, ErrorKind, Result};
pub use supervisor::{start, NodeProcess, ReadinessPolicy, Supervisor};

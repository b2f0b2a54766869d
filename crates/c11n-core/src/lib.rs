//! c11n-core: shared types, wire format and configuration for talking to a
//! local relay node. The client and ctl crates depend on this one.

pub mod config;
pub mod types;
pub mod wire;

pub use config::{C11nConfig, ReadinessMode, TransportConfig};
pub use types::{KeyError, PublicKey, TransactionHash, TRANSACTION_HASH_LEN};

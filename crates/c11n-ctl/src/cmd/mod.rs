//! CLI command modules.

pub mod connect;
pub mod node;
pub mod payload;
pub mod transaction;

//! # bondbot-ledger
//!
//! The ledger gateway boundary: the only contract the bots depend on.
//!
//! - [`LedgerGateway`]: per-party transaction and completion streams plus
//!   fire-and-forget submission
//! - [`MemoryLedger`]: channel-backed implementation for tests

pub mod gateway;
pub mod memory;

pub use gateway::LedgerGateway;
pub use memory::{MemoryLedger, MemoryLedgerHandle};

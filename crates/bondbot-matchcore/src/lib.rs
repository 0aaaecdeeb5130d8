//! # bondbot-matchcore
//!
//! Pure settlement state and greedy FIFO matching — zero side effects,
//! no I/O. The bots crate drives this from ledger events and turns the
//! resulting [`MatchResult`](bondbot_types::MatchResult)s into commands.
//!
//! - [`SettlementState`]: per-party inventories and obligation queues
//! - [`match_queues`]: one greedy matching pass over a single symbol

pub mod matcher;
pub mod state;

pub use matcher::match_queues;
pub use state::SettlementState;

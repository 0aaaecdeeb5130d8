//! # bondbot-bots
//!
//! The bot framework: reacts to a party's ordered ledger transaction
//! stream, derives outbound commands, submits them fire-and-forget, and
//! tracks their asynchronous completions.
//!
//! ```text
//! gateway ─ transactions ─► BotRunner ─► dispatch ─► BotHandler ─► CommandSubmitter ─► gateway
//! gateway ─ completions ──► BotRunner ─► resolve ──► success / failure hooks
//! ```
//!
//! - [`BotHandler`]: capability trait with one implementation per bot
//!   variant, selected by configuration via [`handler_for`]
//! - [`dispatch_transaction`]: events in delivery order → one command batch
//! - [`CommandSubmitter`] / [`PendingCommands`]: correlation ids and the
//!   pending-batch map
//! - [`BotRunner`]: the single-worker loop funneling both streams
//! - [`SettlementBot`], [`MarketSetupBot`], [`TradeInjectorBot`]: the
//!   three bot variants

pub mod dispatch;
pub mod handler;
pub mod market_setup;
mod records;
pub mod runner;
pub mod settlement;
pub mod submit;
pub mod trade_injector;

pub use dispatch::dispatch_transaction;
pub use handler::{handler_for, BotHandler, Flow};
pub use market_setup::MarketSetupBot;
pub use runner::BotRunner;
pub use settlement::SettlementBot;
pub use submit::{CommandSubmitter, PendingCommandRecord, PendingCommands};
pub use trade_injector::TradeInjectorBot;

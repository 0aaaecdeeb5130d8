//! # bondbot-types
//!
//! Shared types, errors, and configuration for the **bondbot** ledger bots.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Party`], [`ContractId`], [`WorkflowId`], [`CommandId`], [`TemplateId`]
//! - **Value model**: [`Value`], [`Record`] with typed, fail-loud accessors
//! - **Stream model**: [`Transaction`], [`Event`], [`CreatedEvent`], [`ArchivedEvent`], [`Completion`]
//! - **Command model**: [`Command`], [`SubmitRequest`]
//! - **Trading model**: [`Asset`], [`Obligation`], [`LegKind`], [`MatchResult`]
//! - **Configuration**: [`BotConfig`], [`BotKind`], [`SettlementConfig`]
//! - **Errors**: [`BondbotError`] with `BB_ERR_` prefix codes
//! - **Constants**: defaults and well-known template names

pub mod asset;
pub mod command;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
pub mod match_result;
pub mod obligation;
pub mod template;
pub mod value;

// Re-export all primary types at crate root for ergonomic imports:
//   use bondbot_types::{Asset, Obligation, Command, Transaction, ...};

pub use asset::*;
pub use command::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use match_result::*;
pub use obligation::*;
pub use template::*;
pub use value::*;

// Constants are accessed via `bondbot_types::constants::FOO`
// (not re-exported to avoid name collisions).

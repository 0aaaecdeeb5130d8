//! The gateway boundary.
//!
//! Everything the bots need from a ledger: two per-party push streams and
//! a fire-and-forget submit. Transport, serialization, authentication,
//! reconnection and retry all live behind this trait — the bots never see
//! them.

use async_trait::async_trait;
use bondbot_types::{Completion, Party, Result, SubmitRequest, Transaction};
use tokio::sync::mpsc;

/// A connection to a ledger, scoped to whatever parties it can act for.
///
/// Both streams are infinite and ordered. The bots treat closure of either
/// stream as fatal; resuming from an offset is a gateway concern.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    /// The ordered transaction stream visible to `party`.
    async fn subscribe_transactions(&self, party: &Party) -> Result<mpsc::Receiver<Transaction>>;

    /// The completion stream for commands submitted by `party`.
    async fn subscribe_completions(&self, party: &Party) -> Result<mpsc::Receiver<Completion>>;

    /// Submit a command batch. Fire-and-forget: returning `Ok` means the
    /// gateway took the batch, not that the ledger accepted it — the
    /// outcome arrives later on the completion stream.
    async fn submit(&self, request: SubmitRequest) -> Result<()>;
}

//! Channel-backed in-memory gateway for tests and local wiring.

use std::sync::Mutex;

use async_trait::async_trait;
use bondbot_types::{BondbotError, Completion, Party, Result, SubmitRequest, Transaction};
use tokio::sync::mpsc;

use crate::gateway::LedgerGateway;

const CHANNEL_CAPACITY: usize = 64;

/// In-memory [`LedgerGateway`] where the test drives both streams and
/// observes every submission.
///
/// Single-subscriber: each stream can be subscribed once.
pub struct MemoryLedger {
    transactions: Mutex<Option<mpsc::Receiver<Transaction>>>,
    completions: Mutex<Option<mpsc::Receiver<Completion>>>,
    submitted: mpsc::Sender<SubmitRequest>,
}

/// The driving side of a [`MemoryLedger`].
pub struct MemoryLedgerHandle {
    /// Feed transactions to the bot.
    pub transactions: mpsc::Sender<Transaction>,
    /// Feed completions to the bot.
    pub completions: mpsc::Sender<Completion>,
    /// Everything the bot submitted, in order.
    pub submitted: mpsc::Receiver<SubmitRequest>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> (Self, MemoryLedgerHandle) {
        let (tx_send, tx_recv) = mpsc::channel(CHANNEL_CAPACITY);
        let (comp_send, comp_recv) = mpsc::channel(CHANNEL_CAPACITY);
        let (submit_send, submit_recv) = mpsc::channel(CHANNEL_CAPACITY);

        let ledger = Self {
            transactions: Mutex::new(Some(tx_recv)),
            completions: Mutex::new(Some(comp_recv)),
            submitted: submit_send,
        };
        let handle = MemoryLedgerHandle {
            transactions: tx_send,
            completions: comp_send,
            submitted: submit_recv,
        };
        (ledger, handle)
    }

    fn take<T>(slot: &Mutex<Option<mpsc::Receiver<T>>>, stream: &str) -> Result<mpsc::Receiver<T>> {
        slot.lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
            .ok_or_else(|| BondbotError::SubscriptionUnavailable {
                reason: format!("{stream} stream already subscribed"),
            })
    }
}

#[async_trait]
impl LedgerGateway for MemoryLedger {
    async fn subscribe_transactions(&self, party: &Party) -> Result<mpsc::Receiver<Transaction>> {
        tracing::debug!(%party, "subscribing to in-memory transaction stream");
        Self::take(&self.transactions, "transaction")
    }

    async fn subscribe_completions(&self, party: &Party) -> Result<mpsc::Receiver<Completion>> {
        tracing::debug!(%party, "subscribing to in-memory completion stream");
        Self::take(&self.completions, "completion")
    }

    async fn submit(&self, request: SubmitRequest) -> Result<()> {
        tracing::debug!(
            party = %request.party,
            command_id = %request.command_id,
            commands = request.commands.len(),
            "in-memory submit"
        );
        self.submitted
            .send(request)
            .await
            .map_err(|_| BondbotError::SubmitFailed {
                reason: "memory ledger receiver dropped".to_string(),
            })
    }
}

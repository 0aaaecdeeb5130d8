//! The single-worker bot loop.
//!
//! Both per-party streams are funneled into one `select!` loop, so every
//! handler hook runs on one logical thread of control and the settlement
//! queues need no locking. Submission is fire-and-forget; the loop never
//! waits for a completion before processing further events.

use std::sync::Arc;
use std::time::Duration;

use bondbot_ledger::LedgerGateway;
use bondbot_types::{BondbotError, BotConfig, Party, Result, WorkflowId};
use tokio::sync::watch;
use tokio::time::{Interval, MissedTickBehavior};

use crate::dispatch::dispatch_transaction;
use crate::handler::{BotHandler, Flow};
use crate::submit::CommandSubmitter;

/// Drives one bot against one gateway until the bot finishes, a fatal
/// error occurs, or shutdown is signalled.
pub struct BotRunner<H, G> {
    handler: H,
    gateway: Arc<G>,
    submitter: CommandSubmitter<G>,
    party: Party,
    poll_interval: Option<Duration>,
    shutdown: watch::Receiver<bool>,
}

impl<H: BotHandler, G: LedgerGateway> BotRunner<H, G> {
    #[must_use]
    pub fn new(
        handler: H,
        gateway: Arc<G>,
        config: &BotConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let submitter = CommandSubmitter::new(
            Arc::clone(&gateway),
            config.party.clone(),
            config.application_id.clone(),
        );
        Self {
            handler,
            gateway,
            submitter,
            party: config.party.clone(),
            poll_interval: config.settlement.poll_interval,
            shutdown,
        }
    }

    /// Run to completion. `Ok(())` means the bot finished or shutdown was
    /// requested; any `Err` is fatal and maps to a non-zero process exit.
    pub async fn run(mut self) -> Result<()> {
        let mut transactions = self.gateway.subscribe_transactions(&self.party).await?;
        let mut completions = self.gateway.subscribe_completions(&self.party).await?;
        tracing::info!(party = %self.party, bot = self.handler.name(), "starts reading transactions");

        let startup = self.handler.on_start()?;
        self.submitter
            .submit(&WorkflowId::from(self.handler.name()), startup)
            .await?;

        let mut poll = self.poll_interval.map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            tokio::select! {
                tx = transactions.recv() => {
                    let Some(tx) = tx else {
                        tracing::error!(party = %self.party, "transaction stream closed");
                        return Err(BondbotError::TransactionStreamClosed(self.party.clone()));
                    };
                    let batch = dispatch_transaction(&mut self.handler, &tx)?;
                    self.submitter.submit(&tx.workflow_id, batch).await?;
                }
                completion = completions.recv() => {
                    let Some(completion) = completion else {
                        tracing::error!(party = %self.party, "completion stream closed");
                        return Err(BondbotError::CompletionStreamClosed(self.party.clone()));
                    };
                    let Some(record) = self.submitter.resolve(&completion) else {
                        continue;
                    };
                    let flow = if completion.is_success() {
                        tracing::debug!(
                            party = %self.party,
                            command_id = %completion.command_id,
                            "command completes successfully"
                        );
                        self.handler.on_submit_success(&completion, &record)?
                    } else {
                        tracing::error!(
                            party = %self.party,
                            command_id = %completion.command_id,
                            code = completion.status_code,
                            message = %completion.status_message,
                            "command completes with error"
                        );
                        self.handler.on_submit_failure(&completion, &record)?
                    };
                    if flow == Flow::Finished {
                        tracing::info!(party = %self.party, bot = self.handler.name(), "finished");
                        return Ok(());
                    }
                }
                () = maybe_tick(&mut poll) => {
                    let batch = self.handler.on_poll()?;
                    self.submitter
                        .submit(&WorkflowId::from(bondbot_types::constants::POLL_WORKFLOW_ID), batch)
                        .await?;
                }
                changed = self.shutdown.changed() => {
                    // A dropped sender counts as a shutdown request.
                    if changed.is_err() || *self.shutdown.borrow() {
                        tracing::info!(party = %self.party, bot = self.handler.name(), "shutdown requested");
                        return Ok(());
                    }
                }
            }
        }
    }
}

/// Awaits the next poll tick, or forever when polling is disabled.
async fn maybe_tick(poll: &mut Option<Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

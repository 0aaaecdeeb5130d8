//! The bot capability interface.
//!
//! One trait, three implementations. A handler is a pure state machine:
//! it receives decoded events and completion outcomes and returns the
//! commands to submit — all I/O stays in the runner and the gateway.

use bondbot_types::{
    ArchivedEvent, BondbotError, BotConfig, BotKind, Command, Completion, CreatedEvent, Result,
    WorkflowId,
};

use crate::submit::PendingCommandRecord;
use crate::{MarketSetupBot, SettlementBot, TradeInjectorBot};

/// Whether the runner keeps going after a completion hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The bot's job is done; the runner exits successfully. Used by the
    /// one-shot bots.
    Finished,
}

/// Event and completion hooks implemented by each bot variant.
///
/// Every hook runs on the single runner task, so implementations mutate
/// their state freely without synchronization. Hooks returning `Err` are
/// fatal: the runner propagates the error and the process exits non-zero.
pub trait BotHandler: Send + std::fmt::Debug {
    /// Short name used in logs and as the startup workflow id.
    fn name(&self) -> &'static str;

    /// Commands to submit before any event is processed.
    fn on_start(&mut self) -> Result<Vec<Command>> {
        Ok(Vec::new())
    }

    /// React to a contract creation.
    fn on_created(&mut self, workflow_id: &WorkflowId, event: &CreatedEvent)
        -> Result<Vec<Command>>;

    /// React to a contract archival.
    fn on_archived(
        &mut self,
        workflow_id: &WorkflowId,
        event: &ArchivedEvent,
    ) -> Result<Vec<Command>> {
        let _ = (workflow_id, event);
        Ok(Vec::new())
    }

    /// Runs after every event of one transaction has been applied; the
    /// returned commands join the same outbound batch.
    fn on_transaction_end(&mut self) -> Result<Vec<Command>> {
        Ok(Vec::new())
    }

    /// Runs on the periodic trigger, independent of incoming events.
    fn on_poll(&mut self) -> Result<Vec<Command>> {
        Ok(Vec::new())
    }

    /// A tracked command batch completed with status 0.
    fn on_submit_success(
        &mut self,
        completion: &Completion,
        record: &PendingCommandRecord,
    ) -> Result<Flow> {
        let _ = (completion, record);
        Ok(Flow::Continue)
    }

    /// A tracked command batch completed with a non-zero status. The
    /// default policy is fatal; overriding this hook is the only place a
    /// recoverable alternative could live.
    fn on_submit_failure(
        &mut self,
        completion: &Completion,
        record: &PendingCommandRecord,
    ) -> Result<Flow> {
        let _ = record;
        Err(BondbotError::CommandFailed {
            command_id: completion.command_id,
            code: completion.status_code,
            message: completion.status_message.clone(),
        })
    }
}

impl<T: BotHandler + ?Sized> BotHandler for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn on_start(&mut self) -> Result<Vec<Command>> {
        (**self).on_start()
    }

    fn on_created(
        &mut self,
        workflow_id: &WorkflowId,
        event: &CreatedEvent,
    ) -> Result<Vec<Command>> {
        (**self).on_created(workflow_id, event)
    }

    fn on_archived(
        &mut self,
        workflow_id: &WorkflowId,
        event: &ArchivedEvent,
    ) -> Result<Vec<Command>> {
        (**self).on_archived(workflow_id, event)
    }

    fn on_transaction_end(&mut self) -> Result<Vec<Command>> {
        (**self).on_transaction_end()
    }

    fn on_poll(&mut self) -> Result<Vec<Command>> {
        (**self).on_poll()
    }

    fn on_submit_success(
        &mut self,
        completion: &Completion,
        record: &PendingCommandRecord,
    ) -> Result<Flow> {
        (**self).on_submit_success(completion, record)
    }

    fn on_submit_failure(
        &mut self,
        completion: &Completion,
        record: &PendingCommandRecord,
    ) -> Result<Flow> {
        (**self).on_submit_failure(completion, record)
    }
}

/// Build the handler a configuration asks for.
pub fn handler_for(config: &BotConfig, package_id: &str) -> Result<Box<dyn BotHandler>> {
    match config.kind {
        BotKind::Settlement => Ok(Box::new(
            SettlementBot::new(config.party.clone(), package_id)
                .with_batch_size(config.settlement.batch_size),
        )),
        BotKind::MarketSetup => {
            let asset_file = config.asset_file.clone().ok_or_else(|| {
                BondbotError::Configuration("market setup requires asset_file".to_string())
            })?;
            Ok(Box::new(MarketSetupBot::new(
                config.party.clone(),
                package_id,
                asset_file,
            )))
        }
        BotKind::TradeInjector => {
            let trade_file = config.trade_file.clone().ok_or_else(|| {
                BondbotError::Configuration("trade injector requires trade_file".to_string())
            })?;
            Ok(Box::new(TradeInjectorBot::new(
                config.party.clone(),
                package_id,
                trade_file,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondbot_types::Party;

    #[test]
    fn factory_selects_by_kind() {
        let settlement = handler_for(&BotConfig::settlement(Party::from("Alice")), "pkg").unwrap();
        assert_eq!(settlement.name(), "settlement");

        let setup = handler_for(
            &BotConfig::market_setup(Party::from("Bank"), "assets.csv".into()),
            "pkg",
        )
        .unwrap();
        assert_eq!(setup.name(), "market-setup");

        let injector = handler_for(
            &BotConfig::trade_injector(Party::from("Alice"), "trades.csv".into()),
            "pkg",
        )
        .unwrap();
        assert_eq!(injector.name(), "trade-injection");
    }

    #[test]
    fn factory_rejects_missing_files() {
        let mut config = BotConfig::settlement(Party::from("Bank"));
        config.kind = BotKind::MarketSetup;
        let err = handler_for(&config, "pkg").unwrap_err();
        assert!(matches!(err, BondbotError::Configuration(_)));
    }
}

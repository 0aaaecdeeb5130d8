//! One-shot trade injector bot.
//!
//! Reads the trade CSV at startup, waits until its party's settlement
//! processor contract appears (signalling the settlement bot is up), then
//! proposes every trade where the party is the buyer as one batch of
//! `Dvp:DvpProposal` creates. Finishes when that batch completes; a
//! failed injection is fatal.

use std::path::{Path, PathBuf};

use bondbot_types::constants::templates;
use bondbot_types::{
    BondbotError, Command, Completion, CreatedEvent, Party, Record, Result, TemplateId, Value,
    WorkflowId,
};

use crate::handler::{BotHandler, Flow};
use crate::records::{read_rows, row_decimal, row_field, CsvRow};
use crate::submit::PendingCommandRecord;

/// Trade file columns: `buyer,seller,bondIssuer,bondIsin,bondAmount,
/// cashIssuer,cashCurrency,cashAmount,dvpId`.
#[derive(Debug)]
pub struct TradeInjectorBot {
    party: Party,
    package_id: String,
    trade_file: PathBuf,
    trades: Vec<CsvRow>,
    /// Shifts each proposal's settle time to the recent past instead of
    /// the epoch, for ledgers running on wall-clock time.
    use_wall_time: bool,
    injected: bool,
}

impl TradeInjectorBot {
    #[must_use]
    pub fn new(party: Party, package_id: impl Into<String>, trade_file: PathBuf) -> Self {
        Self {
            party,
            package_id: package_id.into(),
            trade_file,
            trades: Vec::new(),
            use_wall_time: false,
            injected: false,
        }
    }

    #[must_use]
    pub fn with_wall_time(mut self, use_wall_time: bool) -> Self {
        self.use_wall_time = use_wall_time;
        self
    }

    fn settle_time(&self) -> i64 {
        if self.use_wall_time {
            // A minute in the past, so the proposal is immediately settleable.
            (chrono::Utc::now() - chrono::Duration::minutes(1))
                .timestamp_micros()
        } else {
            0
        }
    }

    fn proposal_command(&self, row: &CsvRow, path: &Path) -> Result<Command> {
        let terms = Record::new()
            .with_field(
                "buyer",
                Value::Party(Party::new(row_field(row, "buyer", path)?)),
            )
            .with_field(
                "seller",
                Value::Party(Party::new(row_field(row, "seller", path)?)),
            )
            .with_field(
                "bondIssuer",
                Value::Party(Party::new(row_field(row, "bondIssuer", path)?)),
            )
            .with_field(
                "bondIsin",
                Value::Text(row_field(row, "bondIsin", path)?.to_string()),
            )
            .with_field(
                "bondAmount",
                Value::Decimal(row_decimal(row, "bondAmount", path)?),
            )
            .with_field(
                "cashIssuer",
                Value::Party(Party::new(row_field(row, "cashIssuer", path)?)),
            )
            .with_field(
                "cashCurrency",
                Value::Text(row_field(row, "cashCurrency", path)?.to_string()),
            )
            .with_field(
                "cashAmount",
                Value::Decimal(row_decimal(row, "cashAmount", path)?),
            )
            .with_field("settleTime", Value::Timestamp(self.settle_time()))
            .with_field(
                "dvpId",
                Value::Text(row_field(row, "dvpId", path)?.to_string()),
            );

        Ok(Command::create(
            TemplateId::from_qualified(&self.package_id, templates::DVP_PROPOSAL),
            Record::new().with_field("c", Value::Record(terms)),
        ))
    }
}

impl BotHandler for TradeInjectorBot {
    fn name(&self) -> &'static str {
        "trade-injection"
    }

    fn on_start(&mut self) -> Result<Vec<Command>> {
        let rows = read_rows(&self.trade_file)?;
        self.trades = rows
            .into_iter()
            .filter(|row| row.get("buyer").is_some_and(|b| *b == self.party.0))
            .collect();
        tracing::info!(
            party = %self.party,
            trades = self.trades.len(),
            file = %self.trade_file.display(),
            "loaded trades"
        );
        Ok(Vec::new())
    }

    fn on_created(
        &mut self,
        _workflow_id: &WorkflowId,
        event: &CreatedEvent,
    ) -> Result<Vec<Command>> {
        if event.template_id.qualified() != templates::SETTLEMENT_PROCESSOR || self.injected {
            return Ok(Vec::new());
        }
        self.injected = true;

        tracing::info!(party = %self.party, trades = self.trades.len(), "starts trade injection");
        let path = self.trade_file.clone();
        self.trades
            .iter()
            .map(|row| self.proposal_command(row, &path))
            .collect()
    }

    fn on_submit_success(
        &mut self,
        _completion: &Completion,
        record: &PendingCommandRecord,
    ) -> Result<Flow> {
        if self.injected {
            tracing::info!(
                party = %self.party,
                trades = record.commands.len(),
                "trade injection complete"
            );
            return Ok(Flow::Finished);
        }
        Ok(Flow::Continue)
    }

    fn on_submit_failure(
        &mut self,
        completion: &Completion,
        record: &PendingCommandRecord,
    ) -> Result<Flow> {
        for command in &record.commands {
            if let Command::Create { arguments, .. } = command {
                let trade_id = arguments
                    .record("c")
                    .and_then(|terms| terms.text("dvpId").map(ToString::to_string))
                    .unwrap_or_else(|_| "<unknown>".to_string());
                tracing::error!(
                    party = %self.party,
                    trade = %trade_id,
                    code = completion.status_code,
                    message = %completion.status_message,
                    "trade injection failed"
                );
            }
        }
        Err(BondbotError::CommandFailed {
            command_id: completion.command_id,
            code: completion.status_code,
            message: completion.status_message.clone(),
        })
    }
}

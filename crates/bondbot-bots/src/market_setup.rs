//! One-shot market setup bot.
//!
//! Run by the issuer: reads the asset CSV, creates one
//! `Setup:MarketSetupJob` carrying every party's initial bond and cash
//! entries, exercises `Process` on the job contract once it appears, and
//! finishes when that exercise completes.

use std::path::PathBuf;

use bondbot_types::constants::templates;
use bondbot_types::{
    Command, Completion, CreatedEvent, Party, Record, Result, TemplateId, Value, WorkflowId,
};

use crate::handler::{BotHandler, Flow};
use crate::records::{read_rows, row_decimal, row_field, CsvRow};
use crate::submit::PendingCommandRecord;

/// Asset file columns: `party,assetName,symbol,amount` where `assetName`
/// is `Bond` or `Cash`.
#[derive(Debug)]
pub struct MarketSetupBot {
    party: Party,
    package_id: String,
    asset_file: PathBuf,
}

impl MarketSetupBot {
    #[must_use]
    pub fn new(party: Party, package_id: impl Into<String>, asset_file: PathBuf) -> Self {
        Self {
            party,
            package_id: package_id.into(),
            asset_file,
        }
    }

    fn template(&self, qualified: &str) -> TemplateId {
        TemplateId::from_qualified(&self.package_id, qualified)
    }

    fn entry_values(&self, rows: &[CsvRow], party: &str, asset_name: &str) -> Result<Vec<Value>> {
        let mut entries = Vec::new();
        for row in rows
            .iter()
            .filter(|r| r.get("party").is_some_and(|p| p == party))
            .filter(|r| r.get("assetName").is_some_and(|a| a == asset_name))
        {
            let symbol_label = if asset_name == "Bond" { "isin" } else { "currency" };
            entries.push(Value::Record(
                Record::new()
                    .with_field(
                        symbol_label,
                        Value::Text(row_field(row, "symbol", &self.asset_file)?.to_string()),
                    )
                    .with_field(
                        "amount",
                        Value::Decimal(row_decimal(row, "amount", &self.asset_file)?),
                    ),
            ));
        }
        Ok(entries)
    }

    /// Build the one `MarketSetupJob` create from the asset file.
    fn setup_job(&self) -> Result<Command> {
        let rows = read_rows(&self.asset_file)?;

        // Parties in first-appearance order, deduplicated.
        let mut parties: Vec<String> = Vec::new();
        for row in &rows {
            let party = row_field(row, "party", &self.asset_file)?;
            if !parties.iter().any(|p| p == party) {
                parties.push(party.to_string());
            }
        }

        let mut entries = Vec::new();
        for party in &parties {
            entries.push(Value::Record(
                Record::new()
                    .with_field("party", Value::Party(Party::new(party.clone())))
                    .with_field(
                        "bondEntries",
                        Value::List(self.entry_values(&rows, party, "Bond")?),
                    )
                    .with_field(
                        "cashEntries",
                        Value::List(self.entry_values(&rows, party, "Cash")?),
                    ),
            ));
        }

        tracing::info!(
            party = %self.party,
            parties = parties.len(),
            rows = rows.len(),
            "starts market setup"
        );
        Ok(Command::create(
            self.template(templates::MARKET_SETUP_JOB),
            Record::new()
                .with_field("issuer", Value::Party(self.party.clone()))
                .with_field("entries", Value::List(entries)),
        ))
    }
}

impl BotHandler for MarketSetupBot {
    fn name(&self) -> &'static str {
        "market-setup"
    }

    fn on_start(&mut self) -> Result<Vec<Command>> {
        Ok(vec![self.setup_job()?])
    }

    fn on_created(
        &mut self,
        _workflow_id: &WorkflowId,
        event: &CreatedEvent,
    ) -> Result<Vec<Command>> {
        if event.template_id.qualified() == templates::MARKET_SETUP_JOB {
            tracing::info!(party = %self.party, "setup job created");
            return Ok(vec![Command::exercise(
                event.template_id.clone(),
                event.contract_id.clone(),
                "Process",
                Value::empty_record(),
            )]);
        }
        Ok(Vec::new())
    }

    fn on_submit_success(
        &mut self,
        _completion: &Completion,
        record: &PendingCommandRecord,
    ) -> Result<Flow> {
        let processed = record
            .commands
            .iter()
            .any(|c| matches!(c, Command::Exercise { choice, .. } if choice == "Process"));
        if processed {
            tracing::info!(party = %self.party, "market setup complete");
            return Ok(Flow::Finished);
        }
        Ok(Flow::Continue)
    }
}

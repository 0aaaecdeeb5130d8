//! The settlement reactor.
//!
//! Tracks cash, bonds and open obligations for one trading party, and
//! after every transaction runs a matching pass that turns available
//! inventory into `AllocateCash` / `SettleMany` commands on the party's
//! settlement processor contract.
//!
//! The reactor keeps no bookkeeping of in-flight settlements: the event
//! stream is the sole source of truth, so successful commands show up as
//! new and archived contracts and update state there. A failed settlement
//! command is fatal.

use bondbot_matchcore::SettlementState;
use bondbot_types::constants::templates;
use bondbot_types::{
    ArchivedEvent, Asset, BondbotError, Command, Completion, ContractId, CreatedEvent, MatchResult,
    Obligation, Party, Record, Result, TemplateId, Value, WorkflowId,
};

use crate::handler::{BotHandler, Flow};
use crate::submit::PendingCommandRecord;

/// Long-running settlement bot for one party.
#[derive(Debug)]
pub struct SettlementBot {
    party: Party,
    package_id: String,
    /// The party's own settlement processor contract, once observed.
    processor: Option<ContractId>,
    state: SettlementState,
    batch_size: usize,
}

impl SettlementBot {
    #[must_use]
    pub fn new(party: Party, package_id: impl Into<String>) -> Self {
        Self {
            party,
            package_id: package_id.into(),
            processor: None,
            state: SettlementState::new(),
            batch_size: bondbot_types::constants::DEFAULT_SETTLEMENT_BATCH_SIZE,
        }
    }

    /// Override the minimum queue length a symbol needs before a matching
    /// pass considers it.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn state(&self) -> &SettlementState {
        &self.state
    }

    fn template(&self, qualified: &str) -> TemplateId {
        TemplateId::from_qualified(&self.package_id, qualified)
    }

    fn on_transfer_request(&self, event: &CreatedEvent) -> Result<Vec<Command>> {
        let new_owner = event.arguments.party("newOwner")?;
        if *new_owner != self.party {
            return Ok(Vec::new());
        }
        tracing::info!(
            party = %self.party,
            template = %event.template_id,
            "receives transfer request, accepting"
        );
        Ok(vec![Command::accept(
            event.template_id.clone(),
            event.contract_id.clone(),
        )])
    }

    fn on_cash(&mut self, event: &CreatedEvent) -> Result<()> {
        let asset = Asset::cash_from(event)?;
        let locker = event.arguments.party("locker")?;
        // Only unlocked cash is spendable: owner == locker.
        if asset.owner == self.party && *locker == self.party {
            tracing::info!(party = %self.party, cash = %asset, "receives cash");
            self.state.add_cash(asset);
        } else {
            tracing::debug!(
                party = %self.party,
                contract_id = %event.contract_id,
                %locker,
                "ignoring locked or foreign cash"
            );
        }
        Ok(())
    }

    fn on_bond(&mut self, event: &CreatedEvent) -> Result<()> {
        let asset = Asset::bond_from(event)?;
        if asset.owner == self.party {
            tracing::info!(party = %self.party, bonds = %asset, "receives bonds");
            self.state.add_bond(asset);
        }
        Ok(())
    }

    fn on_proposal(&self, event: &CreatedEvent) -> Result<Vec<Command>> {
        let obligation = Obligation::from_created(event)?;
        if obligation.seller != self.party {
            return Ok(Vec::new());
        }
        tracing::info!(party = %self.party, trade = %obligation, "accepts proposal to trade");
        Ok(vec![Command::accept(
            event.template_id.clone(),
            event.contract_id.clone(),
        )])
    }

    fn settlement_command(
        &self,
        result: &MatchResult,
        choice: &str,
        asset_label: &str,
        obligation_label: &str,
    ) -> Result<Command> {
        let processor = self
            .processor
            .clone()
            .ok_or_else(|| BondbotError::CoordinatorUnavailable(self.party.clone()))?;
        Ok(Command::exercise(
            self.template(templates::SETTLEMENT_PROCESSOR),
            processor,
            choice,
            result.as_settlement_argument(asset_label, obligation_label),
        ))
    }

    /// One matching pass over every symbol with enough queued obligations,
    /// for both obligation classes.
    fn run_settlement(&mut self) -> Result<Vec<Command>> {
        let mut commands = Vec::new();

        for currency in self.state.active_currencies(self.batch_size) {
            let result = self.state.allocate_cash(&currency);
            if result.has_selections() {
                tracing::info!(
                    party = %self.party,
                    total = %result.consumed,
                    symbol = %result.symbol,
                    trades = %result.summary(),
                    "allocates cash"
                );
                commands.push(self.settlement_command(
                    &result,
                    "AllocateCash",
                    "cashCids",
                    "dvpCids",
                )?);
            }
        }

        for isin in self.state.active_isins(self.batch_size) {
            let result = self.state.settle_bonds(&isin);
            if result.has_selections() {
                tracing::info!(
                    party = %self.party,
                    total = %result.consumed,
                    symbol = %result.symbol,
                    trades = %result.summary(),
                    "settles bonds"
                );
                commands.push(self.settlement_command(
                    &result,
                    "SettleMany",
                    "bondCids",
                    "dvpAllocatedCids",
                )?);
            }
        }

        Ok(commands)
    }

    fn log_balances(&self) {
        let cash: Vec<String> = self
            .state
            .cash_symbols()
            .into_iter()
            .map(|s| format!("{} {s}", self.state.cash_total(&s)))
            .collect();
        let bonds: Vec<String> = self
            .state
            .bond_symbols()
            .into_iter()
            .map(|s| format!("{} {s}", self.state.bond_total(&s)))
            .collect();
        tracing::info!(
            party = %self.party,
            cash = cash.join(", "),
            bonds = bonds.join(", "),
            "balances"
        );
    }
}

impl BotHandler for SettlementBot {
    fn name(&self) -> &'static str {
        "settlement"
    }

    fn on_start(&mut self) -> Result<Vec<Command>> {
        // Create this party's settlement processor; its creation event
        // comes back on the transaction stream and is recorded there.
        Ok(vec![Command::create(
            self.template(templates::SETTLEMENT_PROCESSOR),
            Record::new().with_field("party", Value::Party(self.party.clone())),
        )])
    }

    fn on_created(
        &mut self,
        _workflow_id: &WorkflowId,
        event: &CreatedEvent,
    ) -> Result<Vec<Command>> {
        match event.template_id.qualified().as_str() {
            templates::CASH_TRANSFER_REQUEST | templates::BOND_TRANSFER_REQUEST => {
                self.on_transfer_request(event)
            }
            templates::SETTLEMENT_PROCESSOR => {
                tracing::info!(party = %self.party, contract_id = %event.contract_id, "settlement processor created");
                self.processor = Some(event.contract_id.clone());
                Ok(Vec::new())
            }
            templates::CASH => {
                self.on_cash(event)?;
                Ok(Vec::new())
            }
            templates::BOND => {
                self.on_bond(event)?;
                Ok(Vec::new())
            }
            templates::DVP_PROPOSAL => self.on_proposal(event),
            templates::DVP => {
                let obligation = Obligation::from_created(event)?;
                if obligation.buyer == self.party {
                    self.state.add_accepted(obligation);
                }
                Ok(Vec::new())
            }
            templates::DVP_ALLOCATED => {
                let obligation = Obligation::from_created(event)?;
                if obligation.seller == self.party {
                    self.state.add_allocated(obligation);
                }
                Ok(Vec::new())
            }
            templates::DVP_NOTIFICATION => {
                let obligation = Obligation::from_created(event)?;
                tracing::info!(party = %self.party, trade = %obligation.obligation_id, "settles trade");
                Ok(Vec::new())
            }
            _ => Ok(Vec::new()),
        }
    }

    fn on_archived(
        &mut self,
        _workflow_id: &WorkflowId,
        event: &ArchivedEvent,
    ) -> Result<Vec<Command>> {
        match event.template_id.qualified().as_str() {
            templates::CASH => {
                self.state.archive_cash(&event.contract_id);
            }
            templates::BOND => {
                self.state.archive_bond(&event.contract_id);
            }
            templates::DVP => {
                self.state.archive_accepted(&event.contract_id);
            }
            templates::DVP_ALLOCATED => {
                self.state.archive_allocated(&event.contract_id);
            }
            _ => {}
        }
        Ok(Vec::new())
    }

    fn on_transaction_end(&mut self) -> Result<Vec<Command>> {
        self.log_balances();
        self.run_settlement()
    }

    fn on_poll(&mut self) -> Result<Vec<Command>> {
        self.run_settlement()
    }

    fn on_submit_failure(
        &mut self,
        completion: &Completion,
        record: &PendingCommandRecord,
    ) -> Result<Flow> {
        let commands: Vec<String> = record.commands.iter().map(Command::description).collect();
        tracing::error!(
            party = %self.party,
            command_id = %completion.command_id,
            code = completion.status_code,
            message = %completion.status_message,
            commands = commands.join("; "),
            "settlement command failed"
        );
        Err(BondbotError::CommandFailed {
            command_id: completion.command_id,
            code: completion.status_code,
            message: completion.status_message.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const PKG: &str = "pkg-1";
    const CURRENCY: &str = "USD";
    const ISIN: &str = "US-12345678-9";

    fn bot() -> SettlementBot {
        let mut bot = SettlementBot::new(Party::from("Alice"), PKG);
        bot.processor = Some(ContractId::from("#proc:0"));
        bot
    }

    fn wf() -> WorkflowId {
        WorkflowId::from("wf")
    }

    fn cash_event(cid: &str, owner: &str, locker: &str, amount: i64) -> CreatedEvent {
        CreatedEvent {
            contract_id: ContractId::from(cid),
            template_id: TemplateId::from_qualified(PKG, templates::CASH),
            arguments: Record::new()
                .with_field("issuer", Value::Party(Party::from("Bank")))
                .with_field("owner", Value::Party(Party::from(owner)))
                .with_field("currency", Value::Text(CURRENCY.into()))
                .with_field("amount", Value::Decimal(Decimal::new(amount, 0)))
                .with_field("locker", Value::Party(Party::from(locker))),
        }
    }

    fn bond_event(cid: &str, owner: &str, amount: i64) -> CreatedEvent {
        CreatedEvent {
            contract_id: ContractId::from(cid),
            template_id: TemplateId::from_qualified(PKG, templates::BOND),
            arguments: Record::new()
                .with_field("issuer", Value::Party(Party::from("Bank")))
                .with_field("owner", Value::Party(Party::from(owner)))
                .with_field("isin", Value::Text(ISIN.into()))
                .with_field("amount", Value::Decimal(Decimal::new(amount, 0))),
        }
    }

    fn dvp_terms(buyer: &str, seller: &str, cash_amount: i64, bond_amount: i64) -> Record {
        Record::new()
            .with_field("buyer", Value::Party(Party::from(buyer)))
            .with_field("seller", Value::Party(Party::from(seller)))
            .with_field("bondIssuer", Value::Party(Party::from("Bank")))
            .with_field("bondIsin", Value::Text(ISIN.into()))
            .with_field("bondAmount", Value::Decimal(Decimal::new(bond_amount, 0)))
            .with_field("cashIssuer", Value::Party(Party::from("Bank")))
            .with_field("cashCurrency", Value::Text(CURRENCY.into()))
            .with_field("cashAmount", Value::Decimal(Decimal::new(cash_amount, 0)))
            .with_field("settleTime", Value::Timestamp(0))
            .with_field("dvpId", Value::Text("trade-1".into()))
    }

    fn dvp_event(cid: &str, template: &str, terms: Record) -> CreatedEvent {
        CreatedEvent {
            contract_id: ContractId::from(cid),
            template_id: TemplateId::from_qualified(PKG, template),
            arguments: Record::new().with_field("c", Value::Record(terms)),
        }
    }

    fn transfer_request(cid: &str, new_owner: &str) -> CreatedEvent {
        CreatedEvent {
            contract_id: ContractId::from(cid),
            template_id: TemplateId::from_qualified(PKG, templates::CASH_TRANSFER_REQUEST),
            arguments: Record::new()
                .with_field("newOwner", Value::Party(Party::from(new_owner))),
        }
    }

    #[test]
    fn start_creates_the_settlement_processor() {
        let mut bot = SettlementBot::new(Party::from("Alice"), PKG);
        let commands = bot.on_start().unwrap();
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            Command::Create { template_id, arguments } => {
                assert_eq!(template_id.qualified(), templates::SETTLEMENT_PROCESSOR);
                assert_eq!(arguments.party("party").unwrap(), &Party::from("Alice"));
            }
            Command::Exercise { .. } => panic!("expected create"),
        }
    }

    #[test]
    fn transfer_request_for_me_is_accepted() {
        let mut bot = bot();
        let commands = bot.on_created(&wf(), &transfer_request("#t:0", "Alice")).unwrap();
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            Command::Exercise { choice, contract_id, .. } => {
                assert_eq!(choice, "Accept");
                assert_eq!(contract_id, &ContractId::from("#t:0"));
            }
            Command::Create { .. } => panic!("expected exercise"),
        }
    }

    #[test]
    fn transfer_request_for_someone_else_is_ignored() {
        let mut bot = bot();
        let commands = bot.on_created(&wf(), &transfer_request("#t:0", "Bob")).unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn unlocked_own_cash_is_queued() {
        let mut bot = bot();
        bot.on_created(&wf(), &cash_event("#c:0", "Alice", "Alice", 10_000))
            .unwrap();
        assert_eq!(bot.state().cash_total(CURRENCY), Decimal::new(10_000, 0));
    }

    #[test]
    fn locked_cash_is_ignored() {
        let mut bot = bot();
        bot.on_created(&wf(), &cash_event("#c:0", "Alice", "Bank", 10_000))
            .unwrap();
        assert_eq!(bot.state().cash_total(CURRENCY), Decimal::ZERO);
    }

    #[test]
    fn foreign_cash_is_ignored() {
        let mut bot = bot();
        bot.on_created(&wf(), &cash_event("#c:0", "Bob", "Bob", 10_000))
            .unwrap();
        assert_eq!(bot.state().cash_total(CURRENCY), Decimal::ZERO);
    }

    #[test]
    fn own_bonds_are_queued() {
        let mut bot = bot();
        bot.on_created(&wf(), &bond_event("#b:0", "Alice", 50_000)).unwrap();
        assert_eq!(bot.state().bond_total(ISIN), Decimal::new(50_000, 0));
    }

    #[test]
    fn proposal_to_sell_is_accepted() {
        let mut bot = bot();
        let event = dvp_event(
            "#p:0",
            templates::DVP_PROPOSAL,
            dvp_terms("Bob", "Alice", 20_000, 100_000),
        );
        let commands = bot.on_created(&wf(), &event).unwrap();
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn proposal_to_buy_is_not_accepted() {
        let mut bot = bot();
        let event = dvp_event(
            "#p:0",
            templates::DVP_PROPOSAL,
            dvp_terms("Alice", "Bob", 20_000, 100_000),
        );
        let commands = bot.on_created(&wf(), &event).unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn accepted_trade_as_buyer_queues_and_matches() {
        let mut bot = bot();
        bot.on_created(&wf(), &cash_event("#c:0", "Alice", "Alice", 25_000))
            .unwrap();
        let event = dvp_event("#d:0", templates::DVP, dvp_terms("Alice", "Bob", 20_000, 100_000));
        bot.on_created(&wf(), &event).unwrap();

        let commands = bot.on_transaction_end().unwrap();
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            Command::Exercise { choice, contract_id, argument, .. } => {
                assert_eq!(choice, "AllocateCash");
                assert_eq!(contract_id, &ContractId::from("#proc:0"));
                let Value::Record(record) = argument else {
                    panic!("expected record argument");
                };
                assert_eq!(
                    record.list("cashCids").unwrap(),
                    &[Value::ContractId("#c:0".into())]
                );
                assert_eq!(
                    record.list("dvpCids").unwrap(),
                    &[Value::ContractId("#d:0".into())]
                );
            }
            Command::Create { .. } => panic!("expected exercise"),
        }
        // The matched entries left the queues.
        assert_eq!(bot.state().cash_total(CURRENCY), Decimal::ZERO);
        assert_eq!(bot.state().accepted_len(CURRENCY), 0);
    }

    #[test]
    fn allocated_trade_as_seller_settles_from_bonds() {
        let mut bot = bot();
        bot.on_created(&wf(), &bond_event("#b:0", "Alice", 100_000)).unwrap();
        let event = dvp_event(
            "#d:0",
            templates::DVP_ALLOCATED,
            dvp_terms("Bob", "Alice", 20_000, 100_000),
        );
        bot.on_created(&wf(), &event).unwrap();

        let commands = bot.on_transaction_end().unwrap();
        assert_eq!(commands.len(), 1);
        match &commands[0] {
            Command::Exercise { choice, argument, .. } => {
                assert_eq!(choice, "SettleMany");
                let Value::Record(record) = argument else {
                    panic!("expected record argument");
                };
                assert_eq!(
                    record.list("bondCids").unwrap(),
                    &[Value::ContractId("#b:0".into())]
                );
                assert_eq!(
                    record.list("dvpAllocatedCids").unwrap(),
                    &[Value::ContractId("#d:0".into())]
                );
            }
            Command::Create { .. } => panic!("expected exercise"),
        }
    }

    #[test]
    fn insufficient_inventory_emits_nothing() {
        let mut bot = bot();
        bot.on_created(&wf(), &cash_event("#c:0", "Alice", "Alice", 10_000))
            .unwrap();
        let event = dvp_event("#d:0", templates::DVP, dvp_terms("Alice", "Bob", 20_000, 100_000));
        bot.on_created(&wf(), &event).unwrap();

        let commands = bot.on_transaction_end().unwrap();
        assert!(commands.is_empty());
        // Everything stays queued for a later pass.
        assert_eq!(bot.state().cash_total(CURRENCY), Decimal::new(10_000, 0));
        assert_eq!(bot.state().accepted_len(CURRENCY), 1);
    }

    #[test]
    fn matching_without_processor_is_an_error() {
        let mut bot = SettlementBot::new(Party::from("Alice"), PKG);
        bot.on_created(&wf(), &cash_event("#c:0", "Alice", "Alice", 25_000))
            .unwrap();
        let event = dvp_event("#d:0", templates::DVP, dvp_terms("Alice", "Bob", 20_000, 100_000));
        bot.on_created(&wf(), &event).unwrap();

        let err = bot.on_transaction_end().unwrap_err();
        assert!(matches!(err, BondbotError::CoordinatorUnavailable(_)));
    }

    #[test]
    fn archive_removes_queued_entries() {
        let mut bot = bot();
        bot.on_created(&wf(), &cash_event("#c:0", "Alice", "Alice", 25_000))
            .unwrap();
        bot.on_archived(
            &wf(),
            &ArchivedEvent {
                contract_id: ContractId::from("#c:0"),
                template_id: TemplateId::from_qualified(PKG, templates::CASH),
            },
        )
        .unwrap();
        assert_eq!(bot.state().cash_total(CURRENCY), Decimal::ZERO);
    }

    #[test]
    fn batch_size_gates_the_matching_pass() {
        let mut bot = bot().with_batch_size(2);
        bot.on_created(&wf(), &cash_event("#c:0", "Alice", "Alice", 25_000))
            .unwrap();
        let event = dvp_event("#d:0", templates::DVP, dvp_terms("Alice", "Bob", 20_000, 100_000));
        bot.on_created(&wf(), &event).unwrap();

        // One queued obligation < batch size 2: symbol is not considered.
        assert!(bot.on_transaction_end().unwrap().is_empty());

        let second = dvp_event("#d:1", templates::DVP, dvp_terms("Alice", "Bob", 5_000, 50_000));
        bot.on_created(&wf(), &second).unwrap();
        let commands = bot.on_transaction_end().unwrap();
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn poll_runs_the_same_matching_pass() {
        let mut bot = bot();
        bot.on_created(&wf(), &cash_event("#c:0", "Alice", "Alice", 25_000))
            .unwrap();
        let event = dvp_event("#d:0", templates::DVP, dvp_terms("Alice", "Bob", 20_000, 100_000));
        bot.on_created(&wf(), &event).unwrap();

        let commands = bot.on_poll().unwrap();
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn failed_completion_is_fatal() {
        let mut bot = bot();
        let id = bondbot_types::CommandId::new();
        let record = PendingCommandRecord {
            workflow_id: wf(),
            command_id: id,
            commands: vec![Command::accept(
                TemplateId::from_qualified(PKG, templates::DVP_PROPOSAL),
                ContractId::from("#p:0"),
            )],
        };
        let err = bot
            .on_submit_failure(&Completion::failure(id, 3, "contract not found"), &record)
            .unwrap_err();
        assert!(matches!(err, BondbotError::CommandFailed { code: 3, .. }));
    }
}

//! System-wide constants and the well-known template names of the bond
//! trading model.

/// Application id attached to every submitted command batch.
pub const DEFAULT_APPLICATION_ID: &str = "bond-trading-bots";

/// Minimum queued obligations per symbol before a matching pass considers
/// that symbol.
pub const DEFAULT_SETTLEMENT_BATCH_SIZE: usize = 1;

/// Default period of the re-match trigger that retries funding
/// opportunities arriving without further events.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

/// Workflow id attached to batches produced by the periodic trigger.
pub const POLL_WORKFLOW_ID: &str = "settlement-poll";

/// Qualified `Module:Entity` template names.
pub mod templates {
    pub const CASH: &str = "Cash:Cash";
    pub const CASH_TRANSFER_REQUEST: &str = "Cash:CashTransferRequest";
    pub const BOND: &str = "Bond:Bond";
    pub const BOND_TRANSFER_REQUEST: &str = "Bond:BondTransferRequest";
    pub const DVP_PROPOSAL: &str = "Dvp:DvpProposal";
    pub const DVP: &str = "Dvp:Dvp";
    pub const DVP_ALLOCATED: &str = "Dvp:DvpAllocated";
    pub const DVP_NOTIFICATION: &str = "Dvp:DvpNotification";
    pub const SETTLEMENT_PROCESSOR: &str = "Settlement:SettlementProcessor";
    pub const MARKET_SETUP_JOB: &str = "Setup:MarketSetupJob";
}

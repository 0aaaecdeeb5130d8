//! Fungible asset holdings.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{ContractId, CreatedEvent, Party, Result};

/// A quantity of a fungible resource owned by a party: one cash or bond
/// contract as observed on the ledger.
///
/// Immutable once constructed. Consumption means removal from its queue,
/// never in-place mutation; a single asset record is never split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Absent only for synthetic records built by tests.
    pub contract_id: Option<ContractId>,
    pub amount: Decimal,
    /// Currency code for cash, instrument id (ISIN) for bonds.
    pub symbol: String,
    pub owner: Party,
    pub issuer: Party,
}

impl Asset {
    /// Decode a `Cash:Cash` create: fields `amount`, `currency`, `owner`,
    /// `issuer`.
    pub fn cash_from(event: &CreatedEvent) -> Result<Self> {
        let args = &event.arguments;
        Ok(Self {
            contract_id: Some(event.contract_id.clone()),
            amount: args.decimal("amount")?,
            symbol: args.text("currency")?.to_string(),
            owner: args.party("owner")?.clone(),
            issuer: args.party("issuer")?.clone(),
        })
    }

    /// Decode a `Bond:Bond` create: fields `amount`, `isin`, `owner`,
    /// `issuer`.
    pub fn bond_from(event: &CreatedEvent) -> Result<Self> {
        let args = &event.arguments;
        Ok(Self {
            contract_id: Some(event.contract_id.clone()),
            amount: args.decimal("amount")?,
            symbol: args.text("isin")?.to_string(),
            owner: args.party("owner")?.clone(),
            issuer: args.party("issuer")?.clone(),
        })
    }

    /// Detailed rendering for failure logs.
    #[must_use]
    pub fn log_string(&self) -> String {
        format!(
            "[{} {}, owner={}, issuer={}, cid={}]",
            self.amount,
            self.symbol,
            self.owner,
            self.issuer,
            self.contract_id
                .as_ref()
                .map_or("<none>", ContractId::as_str),
        )
    }

    /// A synthetic asset with no on-ledger contract, for tests.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn synthetic(amount: i64, symbol: &str) -> Self {
        Self {
            contract_id: None,
            amount: Decimal::new(amount, 0),
            symbol: symbol.to_string(),
            owner: Party::from("test-owner"),
            issuer: Party::from("test-issuer"),
        }
    }

    /// Like [`Asset::synthetic`] but carrying a contract reference, so the
    /// record can be selected and archived like a real holding.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn synthetic_with_cid(amount: i64, symbol: &str, cid: &str) -> Self {
        Self {
            contract_id: Some(ContractId::from(cid)),
            ..Self::synthetic(amount, symbol)
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.symbol)
    }
}

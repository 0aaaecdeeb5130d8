//! Trade obligations (DvP legs).

use std::fmt;

use chrono::DateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Asset, ContractId, CreatedEvent, Party, Result};

/// Selects which leg of an obligation the matcher compares amounts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegKind {
    /// The buyer's payment leg, denominated in a currency.
    Cash,
    /// The seller's delivery leg, denominated in an instrument.
    Bond,
}

/// A delivery-versus-payment trade instance: the buyer owes the cash leg,
/// the seller owes the bond leg. Queued while awaiting funding
/// (accepted, buyer side) or delivery (allocated, seller side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    /// Absent only for synthetic records built by tests.
    pub contract_id: Option<ContractId>,
    pub buyer: Party,
    pub seller: Party,
    /// Microseconds since the UNIX epoch.
    pub settle_time: i64,
    pub obligation_id: String,
    pub cash_leg: Asset,
    pub bond_leg: Asset,
}

impl Obligation {
    /// Decode from a create event whose arguments nest the trade terms
    /// record under the `c` field.
    pub fn from_created(event: &CreatedEvent) -> Result<Self> {
        let terms = event.arguments.record("c")?;
        let buyer = terms.party("buyer")?.clone();
        let seller = terms.party("seller")?.clone();

        let cash_leg = Asset {
            contract_id: None,
            amount: terms.decimal("cashAmount")?,
            symbol: terms.text("cashCurrency")?.to_string(),
            owner: buyer.clone(),
            issuer: terms.party("cashIssuer")?.clone(),
        };
        let bond_leg = Asset {
            contract_id: None,
            amount: terms.decimal("bondAmount")?,
            symbol: terms.text("bondIsin")?.to_string(),
            owner: seller.clone(),
            issuer: terms.party("bondIssuer")?.clone(),
        };

        Ok(Self {
            contract_id: Some(event.contract_id.clone()),
            buyer,
            seller,
            settle_time: terms.timestamp("settleTime")?,
            obligation_id: terms.text("dvpId")?.to_string(),
            cash_leg,
            bond_leg,
        })
    }

    #[must_use]
    pub fn leg(&self, kind: LegKind) -> &Asset {
        match kind {
            LegKind::Cash => &self.cash_leg,
            LegKind::Bond => &self.bond_leg,
        }
    }

    #[must_use]
    pub fn leg_amount(&self, kind: LegKind) -> Decimal {
        self.leg(kind).amount
    }

    /// Detailed rendering for failure logs.
    #[must_use]
    pub fn log_string(&self) -> String {
        let settle = DateTime::from_timestamp_micros(self.settle_time)
            .map_or_else(|| self.settle_time.to_string(), |t| t.to_rfc3339());
        format!(
            "Obligation({}, cash={}, bond={}, settle={}, cid={})",
            self.obligation_id,
            self.cash_leg.log_string(),
            self.bond_leg.log_string(),
            settle,
            self.contract_id
                .as_ref()
                .map_or("<none>", ContractId::as_str),
        )
    }

    /// A synthetic obligation with no on-ledger contract, for tests.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn synthetic(cash_leg: Asset, bond_leg: Asset) -> Self {
        Self {
            contract_id: None,
            buyer: cash_leg.owner.clone(),
            seller: bond_leg.owner.clone(),
            settle_time: 0,
            obligation_id: String::new(),
            cash_leg,
            bond_leg,
        }
    }

    /// Like [`Obligation::synthetic`] but carrying a contract reference.
    #[cfg(any(test, feature = "test-helpers"))]
    #[must_use]
    pub fn synthetic_with_cid(cash_leg: Asset, bond_leg: Asset, cid: &str) -> Self {
        Self {
            contract_id: Some(ContractId::from(cid)),
            ..Self::synthetic(cash_leg, bond_leg)
        }
    }
}

impl fmt::Display for Obligation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} buys {} from {} for {}, id={}",
            self.buyer, self.bond_leg, self.seller, self.cash_leg, self.obligation_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Record, TemplateId, Value};

    fn terms() -> Record {
        Record::new()
            .with_field("buyer", Value::Party(Party::from("Alice")))
            .with_field("seller", Value::Party(Party::from("Bob")))
            .with_field("bondIssuer", Value::Party(Party::from("Bank")))
            .with_field("bondIsin", Value::Text("US-12345678-9".into()))
            .with_field("bondAmount", Value::Decimal(Decimal::new(100_000, 0)))
            .with_field("cashIssuer", Value::Party(Party::from("Bank")))
            .with_field("cashCurrency", Value::Text("USD".into()))
            .with_field("cashAmount", Value::Decimal(Decimal::new(20_000, 0)))
            .with_field("settleTime", Value::Timestamp(0))
            .with_field("dvpId", Value::Text("trade-42".into()))
    }

    fn dvp_event() -> CreatedEvent {
        CreatedEvent {
            contract_id: ContractId::from("#20:0"),
            template_id: TemplateId::new("pkg", "Dvp", "Dvp"),
            arguments: Record::new().with_field("c", Value::Record(terms())),
        }
    }

    #[test]
    fn decodes_both_legs_from_nested_terms() {
        let ob = Obligation::from_created(&dvp_event()).unwrap();
        assert_eq!(ob.buyer, Party::from("Alice"));
        assert_eq!(ob.seller, Party::from("Bob"));
        assert_eq!(ob.obligation_id, "trade-42");
        assert_eq!(ob.cash_leg.amount, Decimal::new(20_000, 0));
        assert_eq!(ob.cash_leg.symbol, "USD");
        assert_eq!(ob.cash_leg.owner, Party::from("Alice"));
        assert_eq!(ob.bond_leg.amount, Decimal::new(100_000, 0));
        assert_eq!(ob.bond_leg.symbol, "US-12345678-9");
        assert_eq!(ob.bond_leg.owner, Party::from("Bob"));
    }

    #[test]
    fn leg_selection() {
        let ob = Obligation::from_created(&dvp_event()).unwrap();
        assert_eq!(ob.leg_amount(LegKind::Cash), Decimal::new(20_000, 0));
        assert_eq!(ob.leg_amount(LegKind::Bond), Decimal::new(100_000, 0));
    }

    #[test]
    fn missing_terms_record_fails_loudly() {
        let mut event = dvp_event();
        event.arguments = Record::new();
        assert!(Obligation::from_created(&event).is_err());
    }
}

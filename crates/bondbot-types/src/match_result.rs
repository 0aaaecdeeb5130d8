//! Result of one matching attempt for one symbol.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Asset, Obligation, Record, Value};

/// What one greedy matching pass selected for a single symbol: the consumed
/// asset records, the satisfied obligations, and the aggregate consumed
/// amount. Both lists preserve queue order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub assets: Vec<Asset>,
    pub obligations: Vec<Obligation>,
    /// Sum of the selected asset amounts, in `symbol` units.
    pub consumed: Decimal,
    pub symbol: String,
}

impl MatchResult {
    #[must_use]
    pub fn empty(symbol: impl Into<String>) -> Self {
        Self {
            assets: Vec::new(),
            obligations: Vec::new(),
            consumed: Decimal::ZERO,
            symbol: symbol.into(),
        }
    }

    /// Whether the pass selected anything. True iff at least one
    /// obligation was satisfied.
    #[must_use]
    pub fn has_selections(&self) -> bool {
        !self.obligations.is_empty()
    }

    /// Build the choice argument for a settlement command: a record with
    /// two contract-id lists under the given labels. Records without a
    /// contract reference (synthetic test data) are skipped.
    #[must_use]
    pub fn as_settlement_argument(&self, asset_label: &str, obligation_label: &str) -> Value {
        let asset_cids: Vec<Value> = self
            .assets
            .iter()
            .filter_map(|a| a.contract_id.clone())
            .map(Value::ContractId)
            .collect();
        let obligation_cids: Vec<Value> = self
            .obligations
            .iter()
            .filter_map(|o| o.contract_id.clone())
            .map(Value::ContractId)
            .collect();

        Value::Record(
            Record::new()
                .with_field(asset_label, Value::List(asset_cids))
                .with_field(obligation_label, Value::List(obligation_cids)),
        )
    }

    /// One-line-per-obligation rendering for progress logs.
    #[must_use]
    pub fn summary(&self) -> String {
        self.obligations
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_no_selections() {
        let result = MatchResult::empty("USD");
        assert!(!result.has_selections());
        assert_eq!(result.consumed, Decimal::ZERO);
    }

    #[test]
    fn settlement_argument_lists_contract_ids_in_order() {
        let result = MatchResult {
            assets: vec![
                Asset::synthetic_with_cid(10_000, "USD", "#1:0"),
                Asset::synthetic_with_cid(15_000, "USD", "#2:0"),
            ],
            obligations: vec![Obligation::synthetic_with_cid(
                Asset::synthetic(20_000, "USD"),
                Asset::synthetic(100_000, "US-12345678-9"),
                "#3:0",
            )],
            consumed: Decimal::new(25_000, 0),
            symbol: "USD".into(),
        };
        assert!(result.has_selections());

        let Value::Record(record) = result.as_settlement_argument("cashCids", "dvpCids") else {
            panic!("expected record argument");
        };
        let cash = record.list("cashCids").unwrap();
        assert_eq!(
            cash,
            &[
                Value::ContractId("#1:0".into()),
                Value::ContractId("#2:0".into()),
            ]
        );
        let dvps = record.list("dvpCids").unwrap();
        assert_eq!(dvps, &[Value::ContractId("#3:0".into())]);
    }
}

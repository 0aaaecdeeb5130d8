//! Per-party settlement state: asset inventories and obligation queues.

use std::collections::{HashMap, VecDeque};

use bondbot_types::{Asset, ContractId, LegKind, MatchResult, Obligation};
use rust_decimal::Decimal;

use crate::matcher::match_queues;

/// Everything one party tracks between matching passes.
///
/// Four maps of FIFO queues: cash and bonds the party owns, obligations it
/// must fund as buyer (keyed by currency) and obligations it must deliver
/// on as seller (keyed by instrument). Queue order equals arrival order;
/// only the matcher and archive events remove entries.
#[derive(Debug, Default)]
pub struct SettlementState {
    /// Cash I own, indexed by currency.
    cash: HashMap<String, VecDeque<Asset>>,
    /// Bonds I own, indexed by ISIN.
    bonds: HashMap<String, VecDeque<Asset>>,
    /// Obligations I'm the buyer on, indexed by currency — accepted
    /// proposals awaiting cash allocation.
    accepted: HashMap<String, VecDeque<Obligation>>,
    /// Obligations I'm the seller on, indexed by ISIN — cash already
    /// allocated, awaiting bond settlement.
    allocated: HashMap<String, VecDeque<Obligation>>,
}

impl SettlementState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_cash(&mut self, asset: Asset) {
        self.cash
            .entry(asset.symbol.clone())
            .or_default()
            .push_back(asset);
    }

    pub fn add_bond(&mut self, asset: Asset) {
        self.bonds
            .entry(asset.symbol.clone())
            .or_default()
            .push_back(asset);
    }

    pub fn add_accepted(&mut self, obligation: Obligation) {
        self.accepted
            .entry(obligation.cash_leg.symbol.clone())
            .or_default()
            .push_back(obligation);
    }

    pub fn add_allocated(&mut self, obligation: Obligation) {
        self.allocated
            .entry(obligation.bond_leg.symbol.clone())
            .or_default()
            .push_back(obligation);
    }

    /// Remove an archived cash holding. Returns whether anything matched.
    pub fn archive_cash(&mut self, contract_id: &ContractId) -> bool {
        remove_asset(&mut self.cash, contract_id)
    }

    /// Remove an archived bond holding.
    pub fn archive_bond(&mut self, contract_id: &ContractId) -> bool {
        remove_asset(&mut self.bonds, contract_id)
    }

    /// Remove an archived accepted obligation.
    pub fn archive_accepted(&mut self, contract_id: &ContractId) -> bool {
        remove_obligation(&mut self.accepted, contract_id)
    }

    /// Remove an archived allocated obligation.
    pub fn archive_allocated(&mut self, contract_id: &ContractId) -> bool {
        remove_obligation(&mut self.allocated, contract_id)
    }

    /// Currencies with at least `min_queued` obligations waiting for cash
    /// allocation, sorted for deterministic pass order.
    #[must_use]
    pub fn active_currencies(&self, min_queued: usize) -> Vec<String> {
        active_symbols(&self.accepted, min_queued)
    }

    /// ISINs with at least `min_queued` obligations waiting for bond
    /// settlement, sorted for deterministic pass order.
    #[must_use]
    pub fn active_isins(&self, min_queued: usize) -> Vec<String> {
        active_symbols(&self.allocated, min_queued)
    }

    /// Match cash inventory against buy-side obligations for one currency.
    pub fn allocate_cash(&mut self, currency: &str) -> MatchResult {
        match (self.cash.get_mut(currency), self.accepted.get_mut(currency)) {
            (Some(assets), Some(obligations)) => {
                let result = match_queues(assets, obligations, LegKind::Cash, currency);
                tracing::debug!(
                    currency,
                    selected = result.obligations.len(),
                    consumed = %result.consumed,
                    "cash allocation pass"
                );
                result
            }
            _ => MatchResult::empty(currency),
        }
    }

    /// Match bond inventory against sell-side obligations for one ISIN.
    pub fn settle_bonds(&mut self, isin: &str) -> MatchResult {
        match (self.bonds.get_mut(isin), self.allocated.get_mut(isin)) {
            (Some(assets), Some(obligations)) => {
                let result = match_queues(assets, obligations, LegKind::Bond, isin);
                tracing::debug!(
                    isin,
                    selected = result.obligations.len(),
                    consumed = %result.consumed,
                    "bond settlement pass"
                );
                result
            }
            _ => MatchResult::empty(isin),
        }
    }

    /// Sum of all cash holdings in one currency.
    #[must_use]
    pub fn cash_total(&self, currency: &str) -> Decimal {
        total(&self.cash, currency)
    }

    /// Sum of all bond holdings in one ISIN.
    #[must_use]
    pub fn bond_total(&self, isin: &str) -> Decimal {
        total(&self.bonds, isin)
    }

    /// Currencies with any cash held, sorted.
    #[must_use]
    pub fn cash_symbols(&self) -> Vec<String> {
        sorted_keys(&self.cash)
    }

    /// ISINs with any bonds held, sorted.
    #[must_use]
    pub fn bond_symbols(&self) -> Vec<String> {
        sorted_keys(&self.bonds)
    }

    /// Number of queued buy-side obligations for one currency.
    #[must_use]
    pub fn accepted_len(&self, currency: &str) -> usize {
        self.accepted.get(currency).map_or(0, VecDeque::len)
    }

    /// Number of queued sell-side obligations for one ISIN.
    #[must_use]
    pub fn allocated_len(&self, isin: &str) -> usize {
        self.allocated.get(isin).map_or(0, VecDeque::len)
    }
}

fn remove_asset(queues: &mut HashMap<String, VecDeque<Asset>>, contract_id: &ContractId) -> bool {
    let mut removed = false;
    for queue in queues.values_mut() {
        let before = queue.len();
        queue.retain(|asset| asset.contract_id.as_ref() != Some(contract_id));
        removed |= queue.len() != before;
    }
    removed
}

fn remove_obligation(
    queues: &mut HashMap<String, VecDeque<Obligation>>,
    contract_id: &ContractId,
) -> bool {
    let mut removed = false;
    for queue in queues.values_mut() {
        let before = queue.len();
        queue.retain(|obligation| obligation.contract_id.as_ref() != Some(contract_id));
        removed |= queue.len() != before;
    }
    removed
}

fn active_symbols(queues: &HashMap<String, VecDeque<Obligation>>, min_queued: usize) -> Vec<String> {
    let mut symbols: Vec<String> = queues
        .iter()
        .filter(|(_, queue)| queue.len() >= min_queued)
        .map(|(symbol, _)| symbol.clone())
        .collect();
    symbols.sort();
    symbols
}

fn total(queues: &HashMap<String, VecDeque<Asset>>, symbol: &str) -> Decimal {
    queues
        .get(symbol)
        .map_or(Decimal::ZERO, |queue| queue.iter().map(|a| a.amount).sum())
}

fn sorted_keys<V>(map: &HashMap<String, V>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

//! Greedy FIFO matching of asset inventory against queued obligations.
//!
//! The one matching function: takes an asset queue and an obligation queue
//! for a single symbol and selects which obligations the current inventory
//! can cover. This is the **only** operation matchcore exposes over the
//! queues — no I/O, no command building.
//!
//! ```text
//! match_queues(assets, obligations, leg, symbol) -> MatchResult
//! ```
//!
//! ## Fairness
//!
//! Obligations are satisfied strictly oldest-first: an obligation is never
//! skipped past an older, still-unsatisfied one. Unselected entries keep
//! their relative order.

use std::collections::VecDeque;

use bondbot_types::{Asset, LegKind, MatchResult, Obligation};
use rust_decimal::Decimal;

/// Run one greedy matching pass over a single symbol's queues.
///
/// ## Algorithm
///
/// 1. If either queue is empty, return an empty result without touching
///    either queue.
/// 2. Peek the oldest obligation and tentatively dequeue assets until the
///    running consumed total covers it or the inventory runs dry.
/// 3. Covered: commit the tentative batch and the obligation, and carry
///    any surplus forward as consumed credit toward the next obligation.
/// 4. Not covered: push the tentative batch back onto the inventory head
///    in its original order and stop — this and all younger obligations
///    stay queued for a later pass.
///
/// An individual asset record is never split, and an obligation is
/// committed only once fully covered: `consumed >= satisfied` holds at
/// every commit.
pub fn match_queues(
    assets: &mut VecDeque<Asset>,
    obligations: &mut VecDeque<Obligation>,
    leg: LegKind,
    symbol: &str,
) -> MatchResult {
    let mut selected_assets: Vec<Asset> = Vec::new();
    let mut selected_obligations: Vec<Obligation> = Vec::new();
    let mut consumed = Decimal::ZERO;
    let mut satisfied = Decimal::ZERO;

    while !assets.is_empty() && !obligations.is_empty() {
        let Some(next) = obligations.front() else {
            break;
        };
        let target = satisfied + next.leg_amount(leg);

        let mut tentative: Vec<Asset> = Vec::new();
        let mut tentative_sum = Decimal::ZERO;
        while consumed + tentative_sum < target {
            let Some(asset) = assets.pop_front() else {
                break;
            };
            tentative_sum += asset.amount;
            tentative.push(asset);
        }

        if consumed + tentative_sum >= target {
            // Fully covered: commit the batch and the obligation. Surplus
            // beyond the exact amount stays consumed and counts toward the
            // next obligation.
            consumed += tentative_sum;
            satisfied = target;
            selected_assets.extend(tentative);
            if let Some(obligation) = obligations.pop_front() {
                selected_obligations.push(obligation);
            }
        } else {
            // Inventory exhausted short of the target: restore the
            // tentative batch to the queue head in original order.
            for asset in tentative.into_iter().rev() {
                assets.push_front(asset);
            }
            break;
        }
    }

    MatchResult {
        assets: selected_assets,
        obligations: selected_obligations,
        consumed,
        symbol: symbol.to_string(),
    }
}

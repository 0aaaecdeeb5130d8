//! Transaction dispatch: one transaction in, one command batch out.

use bondbot_types::{Command, Event, Result, Transaction};

use crate::handler::BotHandler;

/// Route every event of one transaction through the handler, in delivery
/// order, and concatenate the resulting commands into one batch.
///
/// Created and Archived events are dispatched; any other event kind is
/// ignored. The `on_transaction_end` hook runs once after the last event
/// and its commands join the same batch. An empty batch means nothing to
/// submit.
pub fn dispatch_transaction<H: BotHandler + ?Sized>(
    handler: &mut H,
    tx: &Transaction,
) -> Result<Vec<Command>> {
    let mut batch: Vec<Command> = Vec::new();

    for event in &tx.events {
        tracing::debug!(
            transaction_id = %tx.transaction_id,
            workflow_id = %tx.workflow_id,
            kind = event.kind(),
            template = %event.template_id(),
            contract_id = %event.contract_id(),
            "dispatching event"
        );
        match event {
            Event::Created(created) => {
                batch.extend(handler.on_created(&tx.workflow_id, created)?);
            }
            Event::Archived(archived) => {
                batch.extend(handler.on_archived(&tx.workflow_id, archived)?);
            }
            Event::Exercised(_) => {}
        }
    }

    batch.extend(handler.on_transaction_end()?);
    Ok(batch)
}

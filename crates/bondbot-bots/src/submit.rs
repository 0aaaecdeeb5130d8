//! Command submission and completion tracking.
//!
//! Every non-empty batch gets a fresh correlation id and is recorded
//! pending before the gateway sees it, so the completion can never race
//! ahead of the record. Unknown completion ids are tolerated: they arise
//! from restarts or already-resolved batches, not from bugs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use bondbot_ledger::LedgerGateway;
use bondbot_types::{
    Command, CommandId, Completion, Party, Result, SubmitRequest, WorkflowId,
};

/// One in-flight command batch.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCommandRecord {
    pub workflow_id: WorkflowId,
    pub command_id: CommandId,
    pub commands: Vec<Command>,
}

/// The pending-batch map. Exposes only atomic `insert` and
/// `take_if_present`, so the submit path and the completion path can
/// interleave from different tasks without further coordination.
#[derive(Debug, Default)]
pub struct PendingCommands {
    inner: Mutex<HashMap<CommandId, PendingCommandRecord>>,
}

impl PendingCommands {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: PendingCommandRecord) {
        self.lock().insert(record.command_id, record);
    }

    /// Atomically remove and return the record for `command_id`, if any.
    pub fn take_if_present(&self, command_id: &CommandId) -> Option<PendingCommandRecord> {
        self.lock().remove(command_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<CommandId, PendingCommandRecord>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Assigns correlation ids, records batches pending, and hands them to
/// the gateway. Fire-and-forget: `submit` returns as soon as the gateway
/// takes the batch.
pub struct CommandSubmitter<G> {
    gateway: Arc<G>,
    pending: PendingCommands,
    party: Party,
    application_id: String,
}

impl<G: LedgerGateway> CommandSubmitter<G> {
    #[must_use]
    pub fn new(gateway: Arc<G>, party: Party, application_id: impl Into<String>) -> Self {
        Self {
            gateway,
            pending: PendingCommands::new(),
            party,
            application_id: application_id.into(),
        }
    }

    /// Submit a batch under the given workflow id. An empty batch is a
    /// no-op and returns `None`; otherwise returns the correlation id the
    /// batch was recorded under.
    pub async fn submit(
        &self,
        workflow_id: &WorkflowId,
        commands: Vec<Command>,
    ) -> Result<Option<CommandId>> {
        if commands.is_empty() {
            return Ok(None);
        }

        let command_id = CommandId::new();
        for command in &commands {
            tracing::debug!(
                party = %self.party,
                %command_id,
                command = %command.description(),
                "sending command"
            );
        }
        tracing::info!(
            party = %self.party,
            %command_id,
            %workflow_id,
            commands = commands.len(),
            "submitting command batch"
        );

        self.pending.insert(PendingCommandRecord {
            workflow_id: workflow_id.clone(),
            command_id,
            commands: commands.clone(),
        });
        self.gateway
            .submit(SubmitRequest {
                party: self.party.clone(),
                application_id: self.application_id.clone(),
                workflow_id: workflow_id.clone(),
                command_id,
                commands,
            })
            .await?;

        Ok(Some(command_id))
    }

    /// Resolve a completion against the pending map. Unknown ids are
    /// logged and ignored; no other pending entry is touched.
    pub fn resolve(&self, completion: &Completion) -> Option<PendingCommandRecord> {
        let record = self.pending.take_if_present(&completion.command_id);
        if record.is_none() {
            tracing::debug!(
                party = %self.party,
                command_id = %completion.command_id,
                "completion for unknown command id, ignoring"
            );
        }
        record
    }

    /// Number of batches still awaiting completion.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondbot_ledger::MemoryLedger;
    use bondbot_types::{Record, TemplateId};

    fn submitter() -> (CommandSubmitter<MemoryLedger>, bondbot_ledger::MemoryLedgerHandle) {
        let (ledger, handle) = MemoryLedger::new();
        (
            CommandSubmitter::new(Arc::new(ledger), Party::from("Alice"), "test-app"),
            handle,
        )
    }

    fn one_command() -> Vec<Command> {
        vec![Command::create(
            TemplateId::new("pkg", "Settlement", "SettlementProcessor"),
            Record::new(),
        )]
    }

    #[tokio::test]
    async fn empty_batch_is_a_no_op() {
        let (submitter, mut handle) = submitter();
        let id = submitter
            .submit(&WorkflowId::from("wf"), Vec::new())
            .await
            .unwrap();
        assert!(id.is_none());
        assert_eq!(submitter.pending_len(), 0);
        assert!(handle.submitted.try_recv().is_err());
    }

    #[tokio::test]
    async fn submitted_batch_is_recorded_then_sent() {
        let (submitter, mut handle) = submitter();
        let id = submitter
            .submit(&WorkflowId::from("wf"), one_command())
            .await
            .unwrap()
            .expect("non-empty batch gets an id");

        assert_eq!(submitter.pending_len(), 1);
        let request = handle.submitted.recv().await.unwrap();
        assert_eq!(request.command_id, id);
        assert_eq!(request.workflow_id, WorkflowId::from("wf"));
        assert_eq!(request.application_id, "test-app");
    }

    #[tokio::test]
    async fn resolve_removes_exactly_one_record() {
        let (submitter, _handle) = submitter();
        let first = submitter
            .submit(&WorkflowId::from("wf-1"), one_command())
            .await
            .unwrap()
            .unwrap();
        let second = submitter
            .submit(&WorkflowId::from("wf-2"), one_command())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(submitter.pending_len(), 2);

        let record = submitter
            .resolve(&Completion::success(first))
            .expect("first batch is pending");
        assert_eq!(record.workflow_id, WorkflowId::from("wf-1"));
        assert_eq!(submitter.pending_len(), 1);

        // Resolving the same id again finds nothing.
        assert!(submitter.resolve(&Completion::success(first)).is_none());
        // The other record is untouched.
        assert!(submitter.resolve(&Completion::success(second)).is_some());
    }

    #[tokio::test]
    async fn unknown_completion_is_tolerated() {
        let (submitter, _handle) = submitter();
        submitter
            .submit(&WorkflowId::from("wf"), one_command())
            .await
            .unwrap();

        let unknown = Completion::success(CommandId::new());
        assert!(submitter.resolve(&unknown).is_none());
        // The pending entry for the real batch is unaffected.
        assert_eq!(submitter.pending_len(), 1);
    }
}

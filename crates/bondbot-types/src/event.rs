//! Transactions, events, and completions as delivered by the ledger
//! gateway.

use serde::{Deserialize, Serialize};

use crate::{CommandId, ContractId, Record, TemplateId, WorkflowId};

/// A contract was created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedEvent {
    pub contract_id: ContractId,
    pub template_id: TemplateId,
    pub arguments: Record,
}

/// A contract was archived (consumed or expired).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivedEvent {
    pub contract_id: ContractId,
    pub template_id: TemplateId,
}

/// A choice was exercised on a contract. Bots observe these but do not
/// react to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExercisedEvent {
    pub contract_id: ContractId,
    pub template_id: TemplateId,
    pub choice: String,
}

/// One event within a transaction. Dispatch reacts to `Created` and
/// `Archived`; every other kind is ignored, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Created(CreatedEvent),
    Archived(ArchivedEvent),
    Exercised(ExercisedEvent),
}

impl Event {
    /// Short event kind for logging.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Created(_) => "created",
            Self::Archived(_) => "archived",
            Self::Exercised(_) => "exercised",
        }
    }

    #[must_use]
    pub fn template_id(&self) -> &TemplateId {
        match self {
            Self::Created(e) => &e.template_id,
            Self::Archived(e) => &e.template_id,
            Self::Exercised(e) => &e.template_id,
        }
    }

    #[must_use]
    pub fn contract_id(&self) -> &ContractId {
        match self {
            Self::Created(e) => &e.contract_id,
            Self::Archived(e) => &e.contract_id,
            Self::Exercised(e) => &e.contract_id,
        }
    }
}

/// One ledger transaction: an ordered list of events sharing a workflow id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    pub workflow_id: WorkflowId,
    /// Opaque stream position, owned by the gateway.
    pub offset: String,
    pub events: Vec<Event>,
}

/// Terminal status of one submitted command batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub command_id: CommandId,
    pub status_code: i32,
    pub status_message: String,
}

impl Completion {
    #[must_use]
    pub fn success(command_id: CommandId) -> Self {
        Self {
            command_id,
            status_code: 0,
            status_message: String::new(),
        }
    }

    #[must_use]
    pub fn failure(command_id: CommandId, status_code: i32, message: impl Into<String>) -> Self {
        Self {
            command_id,
            status_code,
            status_message: message.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code == 0
    }
}

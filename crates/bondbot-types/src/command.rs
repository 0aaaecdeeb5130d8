//! Outbound commands and the submission envelope.

use serde::{Deserialize, Serialize};

use crate::{CommandId, ContractId, Party, Record, TemplateId, Value, WorkflowId};

/// One outbound ledger command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    Create {
        template_id: TemplateId,
        arguments: Record,
    },
    Exercise {
        template_id: TemplateId,
        contract_id: ContractId,
        choice: String,
        argument: Value,
    },
}

impl Command {
    #[must_use]
    pub fn create(template_id: TemplateId, arguments: Record) -> Self {
        Self::Create {
            template_id,
            arguments,
        }
    }

    #[must_use]
    pub fn exercise(
        template_id: TemplateId,
        contract_id: ContractId,
        choice: impl Into<String>,
        argument: Value,
    ) -> Self {
        Self::Exercise {
            template_id,
            contract_id,
            choice: choice.into(),
            argument,
        }
    }

    /// Exercise the conventional no-argument `Accept` choice.
    #[must_use]
    pub fn accept(template_id: TemplateId, contract_id: ContractId) -> Self {
        Self::exercise(template_id, contract_id, "Accept", Value::empty_record())
    }

    /// One-line rendering for debug logs.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Create { template_id, .. } => format!("create {template_id}"),
            Self::Exercise {
                template_id,
                contract_id,
                choice,
                ..
            } => format!("exercise {choice} on {template_id} {contract_id}"),
        }
    }
}

/// A command batch addressed to the ledger, correlated by `command_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub party: Party,
    pub application_id: String,
    pub workflow_id: WorkflowId,
    pub command_id: CommandId,
    pub commands: Vec<Command>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accept_builds_empty_record_exercise() {
        let cmd = Command::accept(
            TemplateId::new("pkg", "Dvp", "DvpProposal"),
            ContractId::from("#7:1"),
        );
        match cmd {
            Command::Exercise {
                choice, argument, ..
            } => {
                assert_eq!(choice, "Accept");
                assert_eq!(argument, Value::empty_record());
            }
            Command::Create { .. } => panic!("expected exercise"),
        }
    }

    #[test]
    fn description_names_choice_and_contract() {
        let cmd = Command::exercise(
            TemplateId::new("pkg", "Settlement", "SettlementProcessor"),
            ContractId::from("#2:0"),
            "AllocateCash",
            Value::empty_record(),
        );
        let desc = cmd.description();
        assert!(desc.contains("AllocateCash"));
        assert!(desc.contains("#2:0"));
    }
}

//! Error types for the bondbot workspace.
//!
//! All errors use the `BB_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Event decoding / schema errors
//! - 2xx: Stream errors
//! - 3xx: Submission / completion errors
//! - 4xx: Settlement errors
//! - 5xx: File / configuration errors
//! - 9xx: General / internal errors

use thiserror::Error;

use crate::{CommandId, Party};

/// Central error enum for all bondbot operations.
#[derive(Debug, Error)]
pub enum BondbotError {
    // =================================================================
    // Event Decoding Errors (1xx)
    // =================================================================
    /// A record lacks an expected field. This is a schema incompatibility
    /// between the bot and the ledger, not a recoverable condition.
    #[error("BB_ERR_100: Missing record field '{label}'")]
    MissingField { label: String },

    /// A field was present but held a different value variant.
    #[error("BB_ERR_101: Field '{label}': expected {expected}, found {found}")]
    WrongValueKind {
        label: String,
        expected: &'static str,
        found: &'static str,
    },

    // =================================================================
    // Stream Errors (2xx)
    // =================================================================
    /// The per-party transaction stream ended or failed. Fatal; the bot
    /// performs no reconnect.
    #[error("BB_ERR_200: Transaction stream for {0} closed")]
    TransactionStreamClosed(Party),

    /// The per-party completion stream ended or failed. Fatal.
    #[error("BB_ERR_201: Completion stream for {0} closed")]
    CompletionStreamClosed(Party),

    /// A stream subscription could not be established.
    #[error("BB_ERR_202: Subscription unavailable: {reason}")]
    SubscriptionUnavailable { reason: String },

    // =================================================================
    // Submission / Completion Errors (3xx)
    // =================================================================
    /// A tracked command batch completed with a non-zero status.
    #[error("BB_ERR_300: Command {command_id} failed with status {code}: '{message}'")]
    CommandFailed {
        command_id: CommandId,
        code: i32,
        message: String,
    },

    /// The gateway rejected or dropped a submission.
    #[error("BB_ERR_301: Submission failed: {reason}")]
    SubmitFailed { reason: String },

    // =================================================================
    // Settlement Errors (4xx)
    // =================================================================
    /// A matching pass produced commands before the settlement processor
    /// contract for this party was observed.
    #[error("BB_ERR_400: No settlement processor contract recorded for {0}")]
    CoordinatorUnavailable(Party),

    // =================================================================
    // File / Configuration Errors (5xx)
    // =================================================================
    /// A CSV input file had a structurally invalid row.
    #[error("BB_ERR_500: {path}:{line}: {reason}")]
    MalformedCsv {
        path: String,
        line: usize,
        reason: String,
    },

    /// An input file does not exist.
    #[error("BB_ERR_501: {0}: no such file")]
    FileNotFound(String),

    /// Configuration error (missing fields, invalid combinations).
    #[error("BB_ERR_502: Configuration error: {0}")]
    Configuration(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("BB_ERR_900: Internal error: {0}")]
    Internal(String),

    /// I/O error (disk, network).
    #[error("BB_ERR_903: I/O error: {0}")]
    Io(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, BondbotError>;

// Conversion from std::io::Error
impl From<std::io::Error> for BondbotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

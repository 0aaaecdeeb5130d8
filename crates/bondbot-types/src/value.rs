//! The ledger value model.
//!
//! Contract arguments and choice arguments travel as [`Value`] trees: a
//! small closed set of scalar kinds plus records and lists. A [`Record`]
//! is an *ordered* list of labeled fields; the typed accessors fail loudly
//! on a missing label or a mismatched variant, since that indicates a
//! schema incompatibility with the ledger rather than a recoverable
//! condition.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{BondbotError, ContractId, Party, Result};

/// A ledger value: scalar, record, or list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Decimal(Decimal),
    Party(Party),
    /// Microseconds since the UNIX epoch.
    Timestamp(i64),
    ContractId(ContractId),
    Record(Record),
    List(Vec<Value>),
}

impl Value {
    /// The empty-record value used as a no-argument choice payload.
    #[must_use]
    pub fn empty_record() -> Self {
        Self::Record(Record::new())
    }

    /// Short name of the variant, for error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Decimal(_) => "decimal",
            Self::Party(_) => "party",
            Self::Timestamp(_) => "timestamp",
            Self::ContractId(_) => "contract-id",
            Self::Record(_) => "record",
            Self::List(_) => "list",
        }
    }
}

/// An ordered list of labeled field values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Builder-style field append, used when constructing command arguments.
    #[must_use]
    pub fn with_field(mut self, label: impl Into<String>, value: Value) -> Self {
        self.fields.push((label.into(), value));
        self
    }

    pub fn push(&mut self, label: impl Into<String>, value: Value) {
        self.fields.push((label.into(), value));
    }

    #[must_use]
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by label. The first match wins, mirroring the wire
    /// format where duplicate labels do not occur.
    pub fn field(&self, label: &str) -> Result<&Value> {
        self.fields
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, v)| v)
            .ok_or_else(|| BondbotError::MissingField {
                label: label.to_string(),
            })
    }

    pub fn text(&self, label: &str) -> Result<&str> {
        match self.field(label)? {
            Value::Text(s) => Ok(s),
            other => Err(wrong_kind(label, "text", other)),
        }
    }

    pub fn decimal(&self, label: &str) -> Result<Decimal> {
        match self.field(label)? {
            Value::Decimal(d) => Ok(*d),
            other => Err(wrong_kind(label, "decimal", other)),
        }
    }

    pub fn party(&self, label: &str) -> Result<&Party> {
        match self.field(label)? {
            Value::Party(p) => Ok(p),
            other => Err(wrong_kind(label, "party", other)),
        }
    }

    pub fn timestamp(&self, label: &str) -> Result<i64> {
        match self.field(label)? {
            Value::Timestamp(t) => Ok(*t),
            other => Err(wrong_kind(label, "timestamp", other)),
        }
    }

    pub fn contract_id(&self, label: &str) -> Result<&ContractId> {
        match self.field(label)? {
            Value::ContractId(c) => Ok(c),
            other => Err(wrong_kind(label, "contract-id", other)),
        }
    }

    pub fn record(&self, label: &str) -> Result<&Record> {
        match self.field(label)? {
            Value::Record(r) => Ok(r),
            other => Err(wrong_kind(label, "record", other)),
        }
    }

    pub fn list(&self, label: &str) -> Result<&[Value]> {
        match self.field(label)? {
            Value::List(items) => Ok(items),
            other => Err(wrong_kind(label, "list", other)),
        }
    }
}

fn wrong_kind(label: &str, expected: &'static str, found: &Value) -> BondbotError {
    BondbotError::WrongValueKind {
        label: label.to_string(),
        expected,
        found: found.kind(),
    }
}

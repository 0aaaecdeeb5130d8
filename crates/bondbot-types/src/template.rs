//! Template identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a contract schema: package plus `Module:Entity` name.
///
/// Event routing matches on the qualified `Module:Entity` name only; the
/// package id is carried so outbound commands can reference the package
/// the ledger actually has installed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemplateId {
    pub package_id: String,
    pub module: String,
    pub entity: String,
}

impl TemplateId {
    #[must_use]
    pub fn new(
        package_id: impl Into<String>,
        module: impl Into<String>,
        entity: impl Into<String>,
    ) -> Self {
        Self {
            package_id: package_id.into(),
            module: module.into(),
            entity: entity.into(),
        }
    }

    /// Build from a `"Module:Entity"` name as listed in
    /// [`constants::templates`](crate::constants::templates).
    #[must_use]
    pub fn from_qualified(package_id: impl Into<String>, qualified: &str) -> Self {
        let (module, entity) = qualified.split_once(':').unwrap_or(("", qualified));
        Self::new(package_id, module, entity)
    }

    /// The `"Module:Entity"` name used for event routing.
    #[must_use]
    pub fn qualified(&self) -> String {
        format!("{}:{}", self.module, self.entity)
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.entity)
    }
}

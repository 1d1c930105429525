use std::str::FromStr;

use serde::{Deserialize, Serialize};
use trellis_core::AppError;

/// Model-level operations gated by the permission layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrudOperation {
    /// Create a new record.
    Create,
    /// Read a record or record list.
    Read,
    /// Update an existing record.
    Edit,
    /// Delete a record.
    Delete,
}

impl CrudOperation {
    /// Returns the stable configuration value for this operation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "allow_create",
            Self::Read => "allow_read",
            Self::Edit => "allow_edit",
            Self::Delete => "allow_delete",
        }
    }

    /// Returns all known operations.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[CrudOperation] = &[
            CrudOperation::Create,
            CrudOperation::Read,
            CrudOperation::Edit,
            CrudOperation::Delete,
        ];

        ALL
    }
}

impl FromStr for CrudOperation {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "allow_create" => Ok(Self::Create),
            "allow_read" => Ok(Self::Read),
            "allow_edit" => Ok(Self::Edit),
            "allow_delete" => Ok(Self::Delete),
            _ => Err(AppError::Validation(format!(
                "unknown operation value '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::CrudOperation;

    #[test]
    fn operation_roundtrip_configuration_value() {
        for operation in CrudOperation::all() {
            let restored = CrudOperation::from_str(operation.as_str());
            assert_eq!(restored.ok(), Some(*operation));
        }
    }

    #[test]
    fn unknown_operation_is_rejected() {
        let parsed = CrudOperation::from_str("allow_publish");
        assert!(parsed.is_err());
    }
}

use thiserror::Error;

use crate::model::{Role, Side};

#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty substring list, clashing suffixes, ...).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// No column of the table matches the role's substrings.
    #[error("could not detect a {} column in the {side}", .role.describe())]
    RoleNotDetected { role: Role, side: Side },
    /// Two headers of one table collapse to the same normalized name.
    #[error("{side}: columns {first:?} and {second:?} both normalize to {normalized:?}")]
    DuplicateColumn {
        side: Side,
        first: String,
        second: String,
        normalized: String,
    },
    /// A selected column is not present in the table.
    #[error("{side}: no column named {column:?}")]
    UnknownColumn { side: Side, column: String },
    /// Suffixing collided columns still produced a duplicate output name.
    #[error("joined result would contain column {0:?} twice")]
    DuplicateOutputColumn(String),
}

impl ReconError {
    /// Errors the operator fixes by picking different columns or re-uploading.
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateColumn { .. } | Self::UnknownColumn { .. } | Self::DuplicateOutputColumn(_)
        )
    }
}

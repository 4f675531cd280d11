use std::fmt;

use dupcheck_core::Table;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Mode + roles
// ---------------------------------------------------------------------------

/// Which key rule links the two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    ByName,
    ByPhone,
    ByNameAndPhone,
}

impl MatchMode {
    /// Roles whose columns must be detected in both tables.
    pub fn roles(&self) -> &'static [Role] {
        match self {
            Self::ByName => &[Role::Name],
            Self::ByPhone => &[Role::Phone],
            Self::ByNameAndPhone => &[Role::Name, Role::Phone],
        }
    }

    /// Sheet name used when exporting the result.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::ByPhone => "PhoneMatches",
            Self::ByName | Self::ByNameAndPhone => "SideBySideMatches",
        }
    }

    pub fn default_file_name(&self) -> &'static str {
        match self {
            Self::ByPhone => "phone_matches.xlsx",
            Self::ByName | Self::ByNameAndPhone => "side_by_side_matches.xlsx",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName => write!(f, "name"),
            Self::ByPhone => write!(f, "phone"),
            Self::ByNameAndPhone => write!(f, "name+phone"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Name,
    Phone,
}

impl Role {
    /// Operator-facing description used in error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Name => "name-like",
            Self::Phone => "mobile/phone-like",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Phone => write!(f, "phone"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "first file",
            Side::Right => "second file",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column detection + selection
// ---------------------------------------------------------------------------

/// Candidate columns per role for one table, in table order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Candidates {
    pub name: Vec<String>,
    pub phone: Vec<String>,
}

impl Candidates {
    pub fn for_role(&self, role: Role) -> &[String] {
        match role {
            Role::Name => &self.name,
            Role::Phone => &self.phone,
        }
    }
}

/// Columns chosen to build the key for one table.
///
/// `phone` is unused in `ByName` mode and `name` is unused in `ByPhone` mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSelection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ColumnSelection {
    pub fn by_name(col: impl Into<String>) -> Self {
        Self { name: Some(col.into()), phone: None }
    }

    pub fn by_phone(col: impl Into<String>) -> Self {
        Self { name: None, phone: Some(col.into()) }
    }

    pub fn both(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self { name: Some(name.into()), phone: Some(phone.into()) }
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Name => self.name.as_deref(),
            Role::Phone => self.phone.as_deref(),
        }
    }

    pub fn set(&mut self, role: Role, column: String) {
        match role {
            Role::Name => self.name = Some(column),
            Role::Phone => self.phone = Some(column),
        }
    }
}

/// One comparison request: the mode plus optional operator column choices.
/// Missing choices fall back to the first detected candidate.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub mode: MatchMode,
    pub left: ColumnSelection,
    pub right: ColumnSelection,
}

impl MatchRequest {
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            left: ColumnSelection::default(),
            right: ColumnSelection::default(),
        }
    }

    pub fn with_left(mut self, selection: ColumnSelection) -> Self {
        self.left = selection;
        self
    }

    pub fn with_right(mut self, selection: ColumnSelection) -> Self {
        self.right = selection;
        self
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Derived join attribute. Never part of any output table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey(pub String);

impl MatchKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A table with its per-row match key column attached.
///
/// The key column lives beside the table rather than inside it, so user
/// columns can never clash with it.
#[derive(Debug, Clone)]
pub struct KeyedTable {
    pub table: Table,
    pub keys: Vec<MatchKey>,
}

/// Inner-join output, still carrying the key of every joined row.
#[derive(Debug, Clone)]
pub struct JoinedTable {
    pub table: Table,
    pub keys: Vec<MatchKey>,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub mode: MatchMode,
    pub left_rows: usize,
    pub right_rows: usize,
    pub matched_rows: usize,
    pub distinct_keys: usize,
    pub left_selection: ColumnSelection,
    pub right_selection: ColumnSelection,
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchMeta {
    pub engine_version: String,
    pub run_at: String,
}

/// Result of one comparison run.
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    pub meta: MatchMeta,
    pub summary: MatchSummary,
    pub result: Table,
}

impl MatchOutcome {
    /// No common keys. Informational, not an error.
    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }

    pub fn sheet_name(&self) -> &'static str {
        self.summary.mode.sheet_name()
    }
}

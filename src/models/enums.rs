//! Enumeration types for the Domo API.

use serde::{Deserialize, Serialize};

/// Column type in a dataset schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ColumnType {
    /// Free text
    #[default]
    String,
    /// Fixed-point decimal
    Decimal,
    /// 64-bit integer
    Long,
    /// Floating point
    Double,
    /// Calendar date
    Date,
    /// Date and time
    Datetime,
}

impl ColumnType {
    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::Long => "LONG",
            ColumnType::Double => "DOUBLE",
            ColumnType::Date => "DATE",
            ColumnType::Datetime => "DATETIME",
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How uploaded rows are applied to a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateMethod {
    /// Add rows to the existing data
    Append,
    /// Replace all existing data
    #[default]
    Replace,
}

impl UpdateMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateMethod::Append => "APPEND",
            UpdateMethod::Replace => "REPLACE",
        }
    }
}

impl std::fmt::Display for UpdateMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a stream execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    /// Accepting parts
    Active,
    /// Commit in progress
    Committing,
    /// Committed
    Success,
    /// Aborted by a client
    Aborted,
    /// Failed server-side
    Failed,
    /// State not known to this client
    #[serde(other)]
    Unknown,
}

impl ExecutionState {
    /// Returns `true` if the execution can no longer accept parts.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionState::Success | ExecutionState::Aborted | ExecutionState::Failed
        )
    }
}

/// Kind of personalized data policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    /// Policy created by a user
    #[default]
    User,
    /// Built-in "All Rows" policy
    System,
}

/// Comparison applied by a policy filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperator {
    /// Exact match
    Equals,
    /// SQL-style pattern
    Like,
    /// Strictly greater
    GreaterThan,
    /// Strictly less
    LessThan,
    /// Greater or equal
    GreaterThanEqual,
    /// Less or equal
    LessThanEqual,
    /// Inclusive range
    Between,
    /// Prefix match
    BeginsWith,
    /// Suffix match
    EndsWith,
    /// Substring match
    Contains,
}

//! Dataset, schema and personalized data policy models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ColumnType, FilterOperator, PolicyType};
use super::primitives::{DataSetId, GroupId, PolicyId, UserId};

/// One column of a dataset schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column type
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    /// Column name
    pub name: String,
}

impl Column {
    /// Create a column.
    pub fn new(column_type: ColumnType, name: impl Into<String>) -> Self {
        Self {
            column_type,
            name: name.into(),
        }
    }
}

/// Ordered column list of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    /// Columns in upload order
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Schema {
    /// Create a schema from columns.
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }
}

/// Owner of a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    /// User id of the owner
    pub id: UserId,
    /// Display name
    #[serde(default)]
    pub name: String,
}

/// A dataset as returned by get and list operations.
///
/// List results omit the schema and policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    /// Dataset id
    pub id: DataSetId,
    /// Dataset name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Number of rows
    #[serde(default)]
    pub rows: u64,
    /// Number of columns
    #[serde(default)]
    pub columns: u64,
    /// Column schema (absent in list results)
    #[serde(default)]
    pub schema: Option<Schema>,
    /// Owner
    #[serde(default)]
    pub owner: Option<Owner>,
    /// Time data was last current
    #[serde(default)]
    pub data_current_at: Option<DateTime<Utc>>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether personalized data policies are enabled
    #[serde(default)]
    pub pdp_enabled: bool,
    /// Attached policies
    #[serde(default)]
    pub policies: Vec<Policy>,
}

/// Request body for creating or updating a dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSetRequest {
    /// Dataset name
    pub name: String,
    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Column schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

impl DataSetRequest {
    /// Create a request with a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }
}

/// Filters accepted by the dataset list endpoint.
#[derive(Debug, Clone, Default)]
pub struct DataSetListFilter {
    /// Sort key (e.g. `name`, `lastTouched`, `lastUpdated`)
    pub sort: Option<String>,
    /// Only datasets whose name contains this text
    pub name_like: Option<String>,
}

/// One row or column filter of a policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyFilter {
    /// Column the filter applies to
    pub column: String,
    /// Values compared against the column
    #[serde(default)]
    pub values: Vec<String>,
    /// Comparison operator
    pub operator: FilterOperator,
    /// Invert the match
    #[serde(default)]
    pub not: bool,
}

/// A personalized data policy attached to a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Policy id
    pub id: PolicyId,
    /// Policy kind
    #[serde(rename = "type", default)]
    pub policy_type: PolicyType,
    /// Policy name
    #[serde(default)]
    pub name: String,
    /// Row filters
    #[serde(default)]
    pub filters: Vec<PolicyFilter>,
    /// Users the policy applies to
    #[serde(default)]
    pub users: Vec<UserId>,
    /// Groups the policy applies to
    #[serde(default)]
    pub groups: Vec<GroupId>,
}

/// Request body for creating or updating a policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyRequest {
    /// Policy name
    pub name: String,
    /// Policy kind
    #[serde(rename = "type")]
    pub policy_type: PolicyType,
    /// Row filters
    pub filters: Vec<PolicyFilter>,
    /// Users the policy applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<UserId>,
    /// Groups the policy applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<GroupId>,
}

/// Result of a SQL query against a dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Dataset the query ran against
    #[serde(default)]
    pub datasource: Option<String>,
    /// Column names in result order
    #[serde(default)]
    pub columns: Vec<String>,
    /// Result rows
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Row count
    #[serde(default)]
    pub num_rows: u64,
    /// Column count
    #[serde(default)]
    pub num_columns: u64,
}

//! Data account and role models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::{AccountId, RoleId};

/// Connector type of a data account, with its credential properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountType {
    /// Connector type id (e.g. `amazon-s3`)
    pub id: String,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Connector-specific properties
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub properties: serde_json::Map<String, serde_json::Value>,
}

/// A data account holding connector credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account id
    pub id: AccountId,
    /// Account name
    #[serde(default)]
    pub name: String,
    /// Whether the stored credentials are valid
    #[serde(default)]
    pub valid: Option<bool>,
    /// Connector type
    #[serde(rename = "type", default)]
    pub account_type: Option<AccountType>,
}

/// Request body for creating an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRequest {
    /// Account name
    pub name: String,
    /// Connector type and properties
    #[serde(rename = "type")]
    pub account_type: AccountType,
}

impl AccountRequest {
    /// Create a request.
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            name: name.into(),
            account_type,
        }
    }
}

/// Partial update of an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New connector type or properties
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
}

/// A role granting a set of authorities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    /// Role id
    pub id: RoleId,
    /// Role name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Number of authorities granted
    #[serde(default)]
    pub authority_count: Option<u64>,
    /// Number of users holding the role
    #[serde(default)]
    pub user_count: Option<u64>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

//! User and group models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::primitives::{GroupId, RoleId, UserId};

/// A Domo user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// User id
    pub id: UserId,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Primary email
    #[serde(default)]
    pub email: String,
    /// Role name (e.g. "Admin", "Privileged", "Participant")
    #[serde(default)]
    pub role: Option<String>,
    /// Role id
    #[serde(default)]
    pub role_id: Option<RoleId>,
    /// Job title
    #[serde(default)]
    pub title: Option<String>,
    /// Secondary email
    #[serde(default)]
    pub alternate_email: Option<String>,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Office location
    #[serde(default)]
    pub location: Option<String>,
    /// IANA time zone
    #[serde(default)]
    pub timezone: Option<String>,
    /// Locale
    #[serde(default)]
    pub locale: Option<String>,
    /// Employee number
    #[serde(default)]
    pub employee_number: Option<String>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for creating or updating a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    /// Display name
    pub name: String,
    /// Primary email
    pub email: String,
    /// Role name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Job title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Secondary email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_email: Option<String>,
    /// Phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Office location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// IANA time zone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Employee number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_number: Option<String>,
}

impl UserRequest {
    /// Create a request with the required fields.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Set the role name.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// A user group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group id
    pub id: GroupId,
    /// Group name
    #[serde(default)]
    pub name: String,
    /// Whether the group is active
    #[serde(default = "default_true")]
    pub active: bool,
    /// Creator
    #[serde(default)]
    pub creator_id: Option<UserId>,
    /// Whether new users join this group automatically
    #[serde(default)]
    pub default: bool,
    /// Member count
    #[serde(default)]
    pub member_count: Option<u64>,
}

fn default_true() -> bool {
    true
}

/// Request body for creating or updating a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    /// Group name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the group is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Whether new users join this group automatically
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<bool>,
}

impl GroupRequest {
    /// Create a request that names the group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

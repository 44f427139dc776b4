//! Roles service.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::{Role, RoleId};
use crate::Result;

const URL_BASE: &str = "/v1/roles";
const ROLE_DESC: &str = "Role";

/// Service for read-only role lookups.
pub struct RolesService {
    inner: Arc<ClientInner>,
}

impl RolesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get a role.
    pub async fn get(&self, id: RoleId) -> Result<Role> {
        self.inner
            .fetch(&format!("{URL_BASE}/{id}"), ROLE_DESC)
            .await
    }

    /// List all roles.
    pub async fn list(&self) -> Result<Vec<Role>> {
        self.inner.fetch(URL_BASE, ROLE_DESC).await
    }
}

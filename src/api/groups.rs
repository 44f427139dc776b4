//! Groups service, including group membership.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::client::{ClientInner, ListOptions, Paginator, PaginatorBuilder};
use crate::models::{Group, GroupId, GroupRequest, UserId};
use crate::Result;

const URL_BASE: &str = "/v1/groups";
const GROUP_DESC: &str = "Group";
const MEMBER_DESC: &str = "a User in a Group";

/// Largest page the group endpoints accept.
const MAX_GROUP_PAGE_SIZE: u32 = 500;

/// Service for group operations.
pub struct GroupsService {
    inner: Arc<ClientInner>,
}

impl GroupsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create a group.
    pub async fn create(&self, request: &GroupRequest) -> Result<Group> {
        self.inner.create(URL_BASE, request, &[], GROUP_DESC).await
    }

    /// Get a group.
    pub async fn get(&self, id: GroupId) -> Result<Group> {
        self.inner.fetch(&group_path(id), GROUP_DESC).await
    }

    /// List groups, up to 500 per page.
    pub fn list(&self, options: ListOptions) -> Result<Paginator<Group>> {
        PaginatorBuilder::new(self.inner.clone(), URL_BASE, GROUP_DESC)
            .max_page_size(MAX_GROUP_PAGE_SIZE)
            .build(options)
    }

    /// Update a group.
    pub async fn update(&self, id: GroupId, request: &GroupRequest) -> Result<Option<Group>> {
        self.inner
            .modify(Method::PUT, &group_path(id), request, &[StatusCode::OK], GROUP_DESC)
            .await
    }

    /// Delete a group.
    pub async fn delete(&self, id: GroupId) -> Result<()> {
        self.inner.remove(&group_path(id), GROUP_DESC).await
    }

    /// Add a user to a group.
    pub async fn add_user(&self, id: GroupId, user_id: UserId) -> Result<()> {
        self.inner
            .put(&member_path(id, user_id), &serde_json::json!({}))
            .await?
            .expect_status(&[StatusCode::NO_CONTENT], "updating", MEMBER_DESC)?;
        Ok(())
    }

    /// Remove a user from a group.
    pub async fn remove_user(&self, id: GroupId, user_id: UserId) -> Result<()> {
        self.inner.remove(&member_path(id, user_id), MEMBER_DESC).await
    }

    /// List the ids of a group's members.
    pub fn list_users(&self, id: GroupId, options: ListOptions) -> Result<Paginator<UserId>> {
        PaginatorBuilder::new(self.inner.clone(), format!("{}/users", group_path(id)), MEMBER_DESC)
            .max_page_size(MAX_GROUP_PAGE_SIZE)
            .build(options)
    }
}

fn group_path(id: GroupId) -> String {
    format!("{URL_BASE}/{id}")
}

fn member_path(id: GroupId, user_id: UserId) -> String {
    format!("{URL_BASE}/{id}/users/{user_id}")
}

//! Users service.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::client::{ClientInner, ListOptions, Paginator, PaginatorBuilder};
use crate::models::{User, UserId, UserRequest};
use crate::Result;

const URL_BASE: &str = "/v1/users";
const USER_DESC: &str = "User";

/// Largest page the users endpoint accepts.
const MAX_USER_PAGE_SIZE: u32 = 500;

/// Service for user operations.
///
/// # Example
///
/// ```no_run
/// use domo_rs::{ListOptions, UserRequest};
///
/// # async fn example(client: domo_rs::DomoClient) -> domo_rs::Result<()> {
/// let request = UserRequest::new("Leonhard Euler", "leonhard@example.com").with_role("Participant");
/// let user = client.users().create(&request, false).await?;
///
/// let everyone = client
///     .users()
///     .list(ListOptions::default().page_size(500))?
///     .collect_all()
///     .await?;
/// println!("{} of {} users", user.id, everyone.len());
/// # Ok(())
/// # }
/// ```
pub struct UsersService {
    inner: Arc<ClientInner>,
}

impl UsersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create a user, optionally emailing them an invitation.
    pub async fn create(&self, request: &UserRequest, send_invite: bool) -> Result<User> {
        self.inner
            .create(
                URL_BASE,
                request,
                &[("sendInvite", send_invite.to_string())],
                USER_DESC,
            )
            .await
    }

    /// Get a user.
    pub async fn get(&self, id: UserId) -> Result<User> {
        self.inner.fetch(&user_path(id), USER_DESC).await
    }

    /// List users, up to 500 per page.
    pub fn list(&self, options: ListOptions) -> Result<Paginator<User>> {
        PaginatorBuilder::new(self.inner.clone(), URL_BASE, USER_DESC)
            .max_page_size(MAX_USER_PAGE_SIZE)
            .build(options)
    }

    /// Update a user.
    pub async fn update(&self, id: UserId, request: &UserRequest) -> Result<Option<User>> {
        self.inner
            .modify(Method::PUT, &user_path(id), request, &[StatusCode::OK], USER_DESC)
            .await
    }

    /// Delete a user.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.inner.remove(&user_path(id), USER_DESC).await
    }
}

fn user_path(id: UserId) -> String {
    format!("{URL_BASE}/{id}")
}

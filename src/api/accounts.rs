//! Accounts service for connector credentials.

use std::sync::Arc;

use reqwest::{Method, StatusCode};

use crate::client::{ClientInner, ListOptions, Paginator, PaginatorBuilder};
use crate::models::{Account, AccountId, AccountRequest, AccountUpdate};
use crate::Result;

const URL_BASE: &str = "/v1/accounts";
const ACCOUNT_DESC: &str = "Account";

/// Service for data account operations.
///
/// # Example
///
/// ```no_run
/// use domo_rs::ListOptions;
///
/// # async fn example(client: domo_rs::DomoClient) -> domo_rs::Result<()> {
/// // First ten accounts, fetched in a single page of ten.
/// let mut accounts = client.accounts().list(ListOptions::default().limit(10))?;
/// while let Some(account) = accounts.next().await {
///     println!("{}", account?.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct AccountsService {
    inner: Arc<ClientInner>,
}

impl AccountsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create an account.
    pub async fn create(&self, request: &AccountRequest) -> Result<Account> {
        self.inner.create(URL_BASE, request, &[], ACCOUNT_DESC).await
    }

    /// Get an account.
    pub async fn get(&self, id: AccountId) -> Result<Account> {
        self.inner.fetch(&account_path(id), ACCOUNT_DESC).await
    }

    /// List accounts, up to 50 per page.
    pub fn list(&self, options: ListOptions) -> Result<Paginator<Account>> {
        PaginatorBuilder::new(self.inner.clone(), URL_BASE, ACCOUNT_DESC).build(options)
    }

    /// Update an account.
    pub async fn update(&self, id: AccountId, update: &AccountUpdate) -> Result<Option<Account>> {
        self.inner
            .modify(
                Method::PATCH,
                &account_path(id),
                update,
                &[StatusCode::OK, StatusCode::NO_CONTENT],
                ACCOUNT_DESC,
            )
            .await
    }

    /// Delete an account.
    pub async fn delete(&self, id: AccountId) -> Result<()> {
        self.inner.remove(&account_path(id), ACCOUNT_DESC).await
    }
}

fn account_path(id: AccountId) -> String {
    format!("{URL_BASE}/{id}")
}

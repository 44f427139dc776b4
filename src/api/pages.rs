//! Pages service, including card collections.

use std::sync::Arc;

use reqwest::StatusCode;

use crate::client::{ClientInner, ListOptions, Paginator, PaginatorBuilder};
use crate::models::{
    Collection, CollectionId, CollectionRequest, CollectionUpdate, Page, PageId, PageRequest,
    PageUpdate,
};
use crate::Result;

const URL_BASE: &str = "/v1/pages";
const PAGE_DESC: &str = "Page";
const COLLECTION_DESC: &str = "Collection";

/// Service for page operations.
///
/// # Example
///
/// ```no_run
/// use domo_rs::{PageRequest, PageUpdate};
///
/// # async fn example(client: domo_rs::DomoClient) -> domo_rs::Result<()> {
/// let page = client.pages().create(&PageRequest::new("Operations")).await?;
///
/// let update = PageUpdate::try_from(serde_json::json!({"locked": true}))?;
/// client.pages().update(page.id, &update).await?;
/// # Ok(())
/// # }
/// ```
pub struct PagesService {
    inner: Arc<ClientInner>,
}

impl PagesService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create a page.
    pub async fn create(&self, request: &PageRequest) -> Result<Page> {
        self.inner.create(URL_BASE, request, &[], PAGE_DESC).await
    }

    /// Get a page.
    pub async fn get(&self, id: PageId) -> Result<Page> {
        self.inner.fetch(&page_path(id), PAGE_DESC).await
    }

    /// List pages. Sub-pages are nested in each page's `children`.
    pub fn list(&self, options: ListOptions) -> Result<Paginator<Page>> {
        PaginatorBuilder::new(self.inner.clone(), URL_BASE, PAGE_DESC).build(options)
    }

    /// Update a page.
    pub async fn update(&self, id: PageId, update: &PageUpdate) -> Result<()> {
        self.inner
            .put(&page_path(id), update)
            .await?
            .expect_status(&[StatusCode::NO_CONTENT], "updating", PAGE_DESC)?;
        Ok(())
    }

    /// Delete a page.
    pub async fn delete(&self, id: PageId) -> Result<()> {
        self.inner.remove(&page_path(id), PAGE_DESC).await
    }

    /// Create a collection on a page.
    pub async fn create_collection(&self, id: PageId, request: &CollectionRequest) -> Result<Collection> {
        self.inner
            .create(&collections_path(id), request, &[], COLLECTION_DESC)
            .await
    }

    /// List a page's collections.
    pub async fn list_collections(&self, id: PageId) -> Result<Vec<Collection>> {
        self.inner
            .fetch(&collections_path(id), COLLECTION_DESC)
            .await
    }

    /// Update a collection.
    pub async fn update_collection(
        &self,
        id: PageId,
        collection_id: CollectionId,
        update: &CollectionUpdate,
    ) -> Result<()> {
        self.inner
            .put(&collection_path(id, collection_id), update)
            .await?
            .expect_status(&[StatusCode::NO_CONTENT], "updating", COLLECTION_DESC)?;
        Ok(())
    }

    /// Delete a collection.
    pub async fn delete_collection(&self, id: PageId, collection_id: CollectionId) -> Result<()> {
        self.inner
            .remove(&collection_path(id, collection_id), COLLECTION_DESC)
            .await
    }
}

fn page_path(id: PageId) -> String {
    format!("{URL_BASE}/{id}")
}

fn collections_path(id: PageId) -> String {
    format!("{URL_BASE}/{id}/collections")
}

fn collection_path(id: PageId, collection_id: CollectionId) -> String {
    format!("{URL_BASE}/{id}/collections/{collection_id}")
}

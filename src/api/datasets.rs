//! DataSets service: dataset CRUD, CSV import/export, queries and
//! personalized data policies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures_util::StreamExt;
use reqwest::{Method, StatusCode};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::client::{ClientInner, ListOptions, MediaType, Paginator, PaginatorBuilder, Payload, RequestTemplate};
use crate::models::{
    DataSet, DataSetId, DataSetListFilter, DataSetRequest, Policy, PolicyId, PolicyRequest,
    QueryResult, Schema, UpdateMethod,
};
use crate::{Error, Result};

const URL_BASE: &str = "/v1/datasets";
const DATASET_DESC: &str = "DataSet";
const PDP_DESC: &str = "Personalized Data Policy (PDP)";

const UPDATE_ACCEPTED: &[StatusCode] = &[StatusCode::OK, StatusCode::ACCEPTED, StatusCode::NO_CONTENT];

/// Service for dataset operations.
///
/// # Example
///
/// ```no_run
/// use domo_rs::{DataSetId, UpdateMethod};
///
/// # async fn example(client: domo_rs::DomoClient) -> domo_rs::Result<()> {
/// let id = DataSetId::new("08a061e2-12a2-4646-b4bc-20beddb403e3");
///
/// client
///     .datasets()
///     .import_csv(&id, "Euler,1707\nGauss,1777\n", UpdateMethod::Replace)
///     .await?;
///
/// let csv = client.datasets().export(&id, true).await?;
/// println!("{csv}");
/// # Ok(())
/// # }
/// ```
pub struct DataSetsService {
    inner: Arc<ClientInner>,
}

impl DataSetsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create a dataset.
    pub async fn create(&self, request: &DataSetRequest) -> Result<DataSet> {
        self.inner.create(URL_BASE, request, &[], DATASET_DESC).await
    }

    /// Get a dataset, including its schema and policies.
    pub async fn get(&self, id: &DataSetId) -> Result<DataSet> {
        self.inner.fetch(&dataset_path(id), DATASET_DESC).await
    }

    /// List datasets.
    ///
    /// At most 50 datasets are requested per page.
    pub fn list(&self, filter: DataSetListFilter, options: ListOptions) -> Result<Paginator<DataSet>> {
        PaginatorBuilder::new(self.inner.clone(), URL_BASE, DATASET_DESC)
            .filter_opt("sort", filter.sort)
            .filter_opt("nameLike", filter.name_like)
            .build(options)
    }

    /// Update a dataset's name, description or schema.
    ///
    /// Returns `None` when the server answers without a body.
    pub async fn update(&self, id: &DataSetId, request: &DataSetRequest) -> Result<Option<DataSet>> {
        self.inner
            .modify(Method::PUT, &dataset_path(id), request, UPDATE_ACCEPTED, DATASET_DESC)
            .await
    }

    /// Replace a dataset's schema, leaving its other metadata untouched.
    pub async fn update_schema(&self, id: &DataSetId, schema: &Schema) -> Result<()> {
        #[derive(Serialize)]
        struct SchemaUpdate<'a> {
            schema: &'a Schema,
        }

        self.inner
            .put(&dataset_path(id), &SchemaUpdate { schema })
            .await?
            .expect_status(UPDATE_ACCEPTED, "updating", DATASET_DESC)?;
        Ok(())
    }

    /// Delete a dataset.
    pub async fn delete(&self, id: &DataSetId) -> Result<()> {
        self.inner.remove(&dataset_path(id), DATASET_DESC).await
    }

    /// Import CSV text (no header line) into a dataset in one request.
    pub async fn import_csv(
        &self,
        id: &DataSetId,
        csv: impl Into<String>,
        update_method: UpdateMethod,
    ) -> Result<()> {
        self.import(id, Payload::csv(csv), update_method).await
    }

    /// Import a CSV file, streaming it from disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] without sending the import if the file
    /// does not exist.
    pub async fn import_file(
        &self,
        id: &DataSetId,
        path: impl AsRef<Path>,
        update_method: UpdateMethod,
    ) -> Result<()> {
        let payload = Payload::CsvFile(path.as_ref().to_path_buf());
        self.import(id, payload, update_method).await
    }

    async fn import(&self, id: &DataSetId, payload: Payload, update_method: UpdateMethod) -> Result<()> {
        info!(dataset = %id, method = %update_method, "importing data");
        self.inner
            .put_csv(
                &data_path(id),
                payload,
                &[("updateMethod", update_method.to_string())],
            )
            .await?
            .expect_status(&[StatusCode::NO_CONTENT], "importing", DATASET_DESC)?;
        Ok(())
    }

    /// Export a dataset's rows as CSV text.
    pub async fn export(&self, id: &DataSetId, include_header: bool) -> Result<String> {
        let response = self
            .inner
            .get_csv(&data_path(id), &export_query(id, include_header))
            .await?
            .expect_status(&[StatusCode::OK], "exporting", DATASET_DESC)?;
        Ok(response.text())
    }

    /// Export a dataset to a CSV file, streaming the response to disk.
    ///
    /// A `.csv` extension is added when the path has none. Returns the path
    /// written.
    pub async fn export_to_file(
        &self,
        id: &DataSetId,
        path: impl AsRef<Path>,
        include_header: bool,
    ) -> Result<PathBuf> {
        let mut path = path.as_ref().to_path_buf();
        if path.extension().map_or(true, |ext| ext != "csv") {
            let mut name = path.clone().into_os_string();
            name.push(".csv");
            path = PathBuf::from(name);
        }

        let request = RequestTemplate::new(Method::GET, data_path(id))
            .queries(export_query(id, include_header))
            .accept(MediaType::Csv);
        let response = self.inner.send_streaming(request).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::resource("exporting", DATASET_DESC, status.as_u16(), body));
        }

        let mut file = tokio::fs::File::create(&path).await?;
        let mut body = response.bytes_stream();
        let mut written = 0u64;
        while let Some(chunk) = body.next().await {
            let chunk = chunk?;
            written += chunk.len() as u64;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(dataset = %id, bytes = written, path = %path.display(), "export written");
        Ok(path)
    }

    /// Run a SQL query against a dataset.
    pub async fn query(&self, id: &DataSetId, sql: &str) -> Result<QueryResult> {
        #[derive(Serialize)]
        struct Query<'a> {
            sql: &'a str,
        }

        let path = format!("{URL_BASE}/query/execute/{id}");
        self.inner
            .post(&path, &Query { sql }, &[])
            .await?
            .expect_status(&[StatusCode::OK], "querying", DATASET_DESC)?
            .json()
    }

    /// Create a personalized data policy.
    pub async fn create_policy(&self, id: &DataSetId, request: &PolicyRequest) -> Result<Policy> {
        self.inner
            .create(&policies_path(id), request, &[], PDP_DESC)
            .await
    }

    /// Get one policy.
    pub async fn get_policy(&self, id: &DataSetId, policy_id: PolicyId) -> Result<Policy> {
        self.inner
            .fetch(&policy_path(id, policy_id), PDP_DESC)
            .await
    }

    /// List all policies on a dataset.
    pub async fn list_policies(&self, id: &DataSetId) -> Result<Vec<Policy>> {
        self.inner.fetch(&policies_path(id), PDP_DESC).await
    }

    /// Update a policy.
    pub async fn update_policy(
        &self,
        id: &DataSetId,
        policy_id: PolicyId,
        request: &PolicyRequest,
    ) -> Result<Option<Policy>> {
        self.inner
            .modify(
                Method::PUT,
                &policy_path(id, policy_id),
                request,
                UPDATE_ACCEPTED,
                PDP_DESC,
            )
            .await
    }

    /// Delete a policy.
    pub async fn delete_policy(&self, id: &DataSetId, policy_id: PolicyId) -> Result<()> {
        self.inner
            .remove(&policy_path(id, policy_id), PDP_DESC)
            .await
    }
}

fn dataset_path(id: &DataSetId) -> String {
    format!("{URL_BASE}/{id}")
}

fn data_path(id: &DataSetId) -> String {
    format!("{URL_BASE}/{id}/data")
}

fn policies_path(id: &DataSetId) -> String {
    format!("{URL_BASE}/{id}/policies")
}

fn policy_path(id: &DataSetId, policy_id: PolicyId) -> String {
    format!("{URL_BASE}/{id}/policies/{policy_id}")
}

fn export_query(id: &DataSetId, include_header: bool) -> [(&'static str, String); 2] {
    [
        ("includeHeader", include_header.to_string()),
        ("fileName", format!("{id}.csv")),
    ]
}

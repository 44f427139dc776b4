//! Streams service: upload pipelines and their multi-part executions.
//!
//! A stream is bound to exactly one dataset. Data is written by opening an
//! execution, uploading parts to it, and committing it. The
//! execution/upload/commit sequence is not atomic: an execution left open
//! after a failed part stays open until it is committed or aborted.

use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::{Method, StatusCode};
use tracing::debug;

use crate::client::{ClientInner, ListOptions, Paginator, PaginatorBuilder, Payload};
use crate::models::{
    DataSetId, Execution, ExecutionId, ExecutionRequest, PartNumber, Stream, StreamId,
    StreamRequest, StreamUpdate, UpdateMethod,
};
use crate::{Error, Result};

const URL_BASE: &str = "/v1/streams";
const STREAM_DESC: &str = "Stream";
const EXECUTION_DESC: &str = "Execution";

/// Largest page the stream list endpoints accept.
const MAX_STREAM_PAGE_SIZE: u32 = 500;

/// Service for stream and execution operations.
///
/// # Example
///
/// ```no_run
/// use domo_rs::{PartNumber, StreamId};
///
/// # async fn example(client: domo_rs::DomoClient) -> domo_rs::Result<()> {
/// let streams = client.streams();
/// let stream = StreamId::new(42);
///
/// let execution = streams.create_execution(stream, None).await?;
/// streams
///     .upload_part_csv(stream, execution.id, PartNumber::new(0), "Euler,1707\n")
///     .await?;
/// streams.commit_execution(stream, execution.id).await?;
/// # Ok(())
/// # }
/// ```
pub struct StreamsService {
    inner: Arc<ClientInner>,
}

impl StreamsService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Create a stream together with a new dataset.
    pub async fn create(&self, request: &StreamRequest) -> Result<Stream> {
        self.inner.create(URL_BASE, request, &[], STREAM_DESC).await
    }

    /// Get a stream.
    pub async fn get(&self, id: StreamId) -> Result<Stream> {
        self.inner.fetch(&stream_path(id), STREAM_DESC).await
    }

    /// List streams with all fields populated.
    pub fn list(&self, options: ListOptions) -> Result<Paginator<Stream>> {
        PaginatorBuilder::new(self.inner.clone(), URL_BASE, STREAM_DESC)
            .filter("fields", "all")
            .max_page_size(MAX_STREAM_PAGE_SIZE)
            .build(options)
    }

    /// Update a stream's metadata.
    pub async fn update(&self, id: StreamId, update: &StreamUpdate) -> Result<Option<Stream>> {
        self.inner
            .modify(Method::PATCH, &stream_path(id), update, &[StatusCode::OK], STREAM_DESC)
            .await
    }

    /// Search streams by property, e.g. `dataSource.id:<dataset id>`.
    pub async fn search(&self, query: &str) -> Result<Vec<Stream>> {
        self.inner
            .get(
                &format!("{URL_BASE}/search"),
                &[("q", query.to_string()), ("fields", "all".to_string())],
            )
            .await?
            .expect_status(&[StatusCode::OK], "retrieving", STREAM_DESC)?
            .json()
    }

    /// Find the stream that writes into a dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resource`] with status 404 when no stream is bound
    /// to the dataset.
    pub async fn find_by_dataset(&self, dataset_id: &DataSetId) -> Result<StreamId> {
        let matches = self
            .search(&format!("dataSource.id:{dataset_id}"))
            .await?;

        match matches.first() {
            Some(stream) => {
                debug!(dataset = %dataset_id, stream = %stream.id, "resolved stream");
                Ok(stream.id)
            }
            None => Err(Error::resource(
                "retrieving",
                format!("{STREAM_DESC} for DataSet {dataset_id}"),
                StatusCode::NOT_FOUND.as_u16(),
                "no stream is bound to this dataset",
            )),
        }
    }

    /// Delete a stream. The dataset it writes into is kept.
    pub async fn delete(&self, id: StreamId) -> Result<()> {
        self.inner.remove(&stream_path(id), STREAM_DESC).await
    }

    /// Open an execution on a stream.
    ///
    /// Without an update method the stream's own setting applies. The
    /// server refuses a second open execution on the same stream.
    pub async fn create_execution(
        &self,
        id: StreamId,
        update_method: Option<UpdateMethod>,
    ) -> Result<Execution> {
        self.inner
            .create(
                &executions_path(id),
                &ExecutionRequest { update_method },
                &[],
                EXECUTION_DESC,
            )
            .await
    }

    /// Get an execution.
    pub async fn get_execution(&self, id: StreamId, execution_id: ExecutionId) -> Result<Execution> {
        self.inner
            .fetch(&execution_path(id, execution_id), EXECUTION_DESC)
            .await
    }

    /// List a stream's executions.
    pub fn list_executions(&self, id: StreamId, options: ListOptions) -> Result<Paginator<Execution>> {
        PaginatorBuilder::new(self.inner.clone(), executions_path(id), EXECUTION_DESC)
            .max_page_size(MAX_STREAM_PAGE_SIZE)
            .build(options)
    }

    /// Upload one part of an execution.
    ///
    /// Parts must not carry a header line. This takes `&self` and may be
    /// called concurrently for different parts of the same execution.
    pub async fn upload_part(
        &self,
        id: StreamId,
        execution_id: ExecutionId,
        part: PartNumber,
        payload: Payload,
    ) -> Result<()> {
        let path = format!("{}/part/{part}", execution_path(id, execution_id));
        let resource = format!(
            "Data Part on {EXECUTION_DESC} {execution_id} on {STREAM_DESC} {id}"
        );

        self.inner
            .put_csv(&path, payload, &[])
            .await?
            .expect_status(&[StatusCode::OK], "uploading", &resource)?;
        Ok(())
    }

    /// Upload a part from CSV text.
    pub async fn upload_part_csv(
        &self,
        id: StreamId,
        execution_id: ExecutionId,
        part: PartNumber,
        csv: impl Into<String>,
    ) -> Result<()> {
        self.upload_part(id, execution_id, part, Payload::csv(csv))
            .await
    }

    /// Upload a part from gzip-compressed CSV.
    pub async fn upload_part_gzip(
        &self,
        id: StreamId,
        execution_id: ExecutionId,
        part: PartNumber,
        compressed: Bytes,
    ) -> Result<()> {
        self.upload_part(id, execution_id, part, Payload::GzipCsv(compressed))
            .await
    }

    /// Upload a part streamed from a CSV file.
    pub async fn upload_part_file(
        &self,
        id: StreamId,
        execution_id: ExecutionId,
        part: PartNumber,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let payload = Payload::CsvFile(path.as_ref().to_path_buf());
        self.upload_part(id, execution_id, part, payload).await
    }

    /// Commit an execution, applying all uploaded parts.
    pub async fn commit_execution(
        &self,
        id: StreamId,
        execution_id: ExecutionId,
    ) -> Result<Option<Execution>> {
        let path = format!("{}/commit", execution_path(id, execution_id));
        self.inner
            .modify(Method::PUT, &path, &serde_json::json!({}), &[StatusCode::OK], EXECUTION_DESC)
            .await
    }

    /// Abort an execution, discarding its parts.
    pub async fn abort_execution(
        &self,
        id: StreamId,
        execution_id: ExecutionId,
    ) -> Result<Option<Execution>> {
        let path = format!("{}/abort", execution_path(id, execution_id));
        self.inner
            .modify(Method::PUT, &path, &serde_json::json!({}), &[StatusCode::OK], EXECUTION_DESC)
            .await
    }

    /// Abort whatever execution is currently open on a stream.
    pub async fn abort_current_execution(&self, id: StreamId) -> Result<()> {
        let path = format!("{}/abort", executions_path(id));
        self.inner
            .put(&path, &serde_json::json!({}))
            .await?
            .expect_status(&[StatusCode::NO_CONTENT], "updating", EXECUTION_DESC)?;
        Ok(())
    }
}

fn stream_path(id: StreamId) -> String {
    format!("{URL_BASE}/{id}")
}

fn executions_path(id: StreamId) -> String {
    format!("{URL_BASE}/{id}/executions")
}

fn execution_path(id: StreamId, execution_id: ExecutionId) -> String {
    format!("{URL_BASE}/{id}/executions/{execution_id}")
}

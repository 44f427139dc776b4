//! Execution-driving stream uploader.

use std::io::Write;
use std::sync::Arc;

use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, error, info, warn};

use super::plan::{ChunkPlan, UploadExecution};
use crate::api::{DataSetsService, StreamsService};
use crate::client::{ClientInner, Payload, UploadConfig};
use crate::models::{
    DataSetId, DataSetRequest, ExecutionId, PartNumber, StreamId, StreamRequest, Table,
    UpdateMethod,
};
use crate::{Error, Result};

/// Options for one stream upload.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Log a warning when the dataset schema has to be changed
    pub warn_schema_change: bool,
    /// Override the stream's update method for this execution
    pub update_method: Option<UpdateMethod>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            warn_schema_change: true,
            update_method: None,
        }
    }
}

impl UploadOptions {
    /// Override the stream's update method.
    pub fn with_update_method(mut self, update_method: UpdateMethod) -> Self {
        self.update_method = Some(update_method);
        self
    }

    /// Update the schema silently.
    pub fn without_schema_warning(mut self) -> Self {
        self.warn_schema_change = false;
        self
    }
}

/// Options for creating a stream-backed dataset from a table.
#[derive(Debug, Clone, Default)]
pub struct CreateDataSetOptions {
    /// Default update method of the new stream
    pub update_method: UpdateMethod,
    /// Key columns an upsert matches rows on
    pub key_column_names: Vec<String>,
}

impl CreateDataSetOptions {
    /// Set the stream's default update method.
    pub fn with_update_method(mut self, update_method: UpdateMethod) -> Self {
        self.update_method = update_method;
        self
    }

    /// Set the upsert key columns.
    pub fn with_key_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_column_names = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Outcome of a committed stream upload.
#[derive(Debug, Clone)]
pub struct UploadReport {
    /// Stream written through
    pub stream_id: StreamId,
    /// Committed execution
    pub execution_id: ExecutionId,
    /// Part numbers uploaded, in order
    pub parts: Vec<PartNumber>,
    /// Rows uploaded
    pub rows: usize,
    /// Whether the dataset schema was replaced before uploading
    pub schema_updated: bool,
}

/// Uploads tables through a dataset's stream in bounded parts.
///
/// An upload resolves the dataset's stream, brings the dataset schema in
/// line with the table, opens an execution, uploads one header-less CSV
/// part per chunk, and commits. If a part fails the error is returned and
/// the execution is left open; abort it with
/// [`StreamsService::abort_execution`] or retry the upload after aborting.
///
/// # Example
///
/// ```no_run
/// use domo_rs::{Cell, DataSetId, Table, UploadOptions};
///
/// # async fn example(client: domo_rs::DomoClient) -> domo_rs::Result<()> {
/// let mut table = Table::new(vec!["friend".into(), "attending".into()]);
/// table.push_row(vec!["Euler".into(), Cell::Long(1)])?;
///
/// let id = DataSetId::new("08a061e2-12a2-4646-b4bc-20beddb403e3");
/// let report = client.uploader().upload(&id, &table, UploadOptions::default()).await?;
/// println!("committed {} parts", report.parts.len());
/// # Ok(())
/// # }
/// ```
pub struct StreamUploader {
    inner: Arc<ClientInner>,
}

impl StreamUploader {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Upload a table into an existing stream-backed dataset.
    ///
    /// An empty table still opens and commits an execution, which with
    /// `REPLACE` clears the dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resource`] (404) if no stream is bound to the
    /// dataset, and whatever error a failing part or commit produced.
    pub async fn upload(
        &self,
        dataset_id: &DataSetId,
        table: &Table,
        options: UploadOptions,
    ) -> Result<UploadReport> {
        validate_config(&self.inner.config.upload)?;
        let stream_id = self.streams().find_by_dataset(dataset_id).await?;
        self.upload_to_stream(stream_id, dataset_id, table, &options)
            .await
    }

    /// Create a stream and dataset shaped like the table, then upload the
    /// table into it. Returns the new dataset's id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] before any request if a key column is
    /// not a column of the table.
    pub async fn create_and_upload(
        &self,
        table: &Table,
        name: &str,
        description: &str,
        options: CreateDataSetOptions,
    ) -> Result<DataSetId> {
        validate_config(&self.inner.config.upload)?;

        let schema = table.schema();
        if let Some(missing) = options
            .key_column_names
            .iter()
            .find(|key| !schema.columns.iter().any(|column| &column.name == *key))
        {
            return Err(Error::Validation(format!(
                "key column {missing} is not a column of the table"
            )));
        }

        let dataset = DataSetRequest::new(name)
            .with_description(description)
            .with_schema(schema);
        let request = StreamRequest::new(dataset, options.update_method)
            .with_key_columns(options.key_column_names);
        let stream = self.streams().create(&request).await?;

        let dataset_id = match stream.data_set {
            Some(dataset) => dataset.id,
            None => {
                let missing = <serde_json::Error as serde::de::Error>::missing_field("dataSet");
                return Err(Error::Json(missing));
            }
        };
        info!(dataset = %dataset_id, stream = %stream.id, "created stream-backed dataset");

        let options = UploadOptions::default().without_schema_warning();
        self.upload_to_stream(stream.id, &dataset_id, table, &options)
            .await?;
        Ok(dataset_id)
    }

    async fn upload_to_stream(
        &self,
        stream_id: StreamId,
        dataset_id: &DataSetId,
        table: &Table,
        options: &UploadOptions,
    ) -> Result<UploadReport> {
        let config = &self.inner.config.upload;
        let schema_updated = self
            .sync_schema(dataset_id, table, options.warn_schema_change)
            .await?;

        let plan = ChunkPlan::for_table(table, config)?;
        plan.verify()?;

        let streams = self.streams();
        let execution = streams
            .create_execution(stream_id, options.update_method)
            .await?;
        let mut tracker = UploadExecution::new(stream_id, execution.id);

        info!(
            stream = %stream_id,
            execution = %execution.id,
            rows = table.row_count(),
            parts = plan.len(),
            "uploading"
        );

        for range in plan.ranges() {
            let part = tracker.issue_part(range.start)?;
            let csv = table.rows_to_csv(range.clone())?;
            let payload = if config.compress_parts {
                Payload::GzipCsv(gzip(csv.as_bytes())?)
            } else {
                Payload::Csv(Bytes::from(csv))
            };

            debug!(part = %part, rows = range.len(), "uploading part");
            if let Err(e) = streams
                .upload_part(stream_id, execution.id, part, payload)
                .await
            {
                error!(
                    stream = %stream_id,
                    execution = %execution.id,
                    part = %part,
                    error = %e,
                    "part upload failed; execution left open"
                );
                return Err(e);
            }
        }

        streams.commit_execution(stream_id, execution.id).await?;
        info!(stream = %stream_id, execution = %execution.id, "execution committed");

        Ok(UploadReport {
            stream_id,
            execution_id: execution.id,
            parts: tracker.parts().to_vec(),
            rows: table.row_count(),
            schema_updated,
        })
    }

    /// Replace the dataset schema if it differs from the table's.
    async fn sync_schema(&self, dataset_id: &DataSetId, table: &Table, warn_change: bool) -> Result<bool> {
        let datasets = self.datasets();
        let current = datasets.get(dataset_id).await?.schema.unwrap_or_default();
        let inferred = table.schema();
        if current == inferred {
            return Ok(false);
        }

        datasets.update_schema(dataset_id, &inferred).await?;
        if warn_change {
            warn!(dataset = %dataset_id, "dataset schema updated to match uploaded data");
        }
        Ok(true)
    }

    fn datasets(&self) -> DataSetsService {
        DataSetsService::new(self.inner.clone())
    }

    fn streams(&self) -> StreamsService {
        StreamsService::new(self.inner.clone())
    }
}

fn validate_config(config: &UploadConfig) -> Result<()> {
    if config.target_chunk_bytes == 0 {
        return Err(Error::Config("target_chunk_bytes must be positive".to_string()));
    }
    if !config.compression_ratio.is_finite() || config.compression_ratio <= 0.0 {
        return Err(Error::Config(format!(
            "compression_ratio must be a positive number, got {}",
            config.compression_ratio
        )));
    }
    Ok(())
}

fn gzip(data: &[u8]) -> Result<Bytes> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(Bytes::from(encoder.finish()?))
}

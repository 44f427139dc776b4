//! Chunked uploads through stream executions.
//!
//! Large tables are uploaded in parts rather than in one import request.
//! [`ChunkPlan`] splits a table into contiguous row ranges sized to
//! [`UploadConfig`](crate::UploadConfig), and [`StreamUploader`] drives the
//! create-execution, upload-parts, commit sequence. Each part is numbered
//! by its chunk's first row.

mod plan;
mod uploader;

pub use plan::{estimate_chunk_rows, ChunkPlan, UploadExecution};
pub use uploader::{CreateDataSetOptions, StreamUploader, UploadOptions, UploadReport};

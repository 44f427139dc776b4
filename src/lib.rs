//! # domo-rs
//!
//! An async Rust client for the Domo platform REST API.
//!
//! The client authenticates with OAuth2 client credentials, renews its
//! token before it expires and once more whenever a request is answered
//! with `401`, and exposes datasets, streams, users, groups, pages,
//! accounts and roles as typed services.
//!
//! ## Features
//!
//! - **Authentication**: client-credentials tokens with proactive and
//!   reactive renewal
//! - **Transport**: JSON, CSV and gzip-compressed CSV bodies, with file
//!   uploads streamed from disk
//! - **Pagination**: every list operation returns a lazy [`Paginator`]
//! - **Chunked uploads**: large tables are uploaded in parts through a
//!   stream execution and committed at the end
//! - **Type Safety**: strongly-typed ids and records
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domo_rs::{DataSetListFilter, DomoClient, ListOptions};
//!
//! #[tokio::main]
//! async fn main() -> domo_rs::Result<()> {
//!     let client = DomoClient::new("client-id", "client-secret").await?;
//!
//!     let filter = DataSetListFilter {
//!         name_like: Some("Sales".into()),
//!         ..Default::default()
//!     };
//!     let mut datasets = client.datasets().list(filter, ListOptions::default().limit(100))?;
//!     while let Some(dataset) = datasets.next().await {
//!         let dataset = dataset?;
//!         println!("{}: {} rows", dataset.name, dataset.rows);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Uploading a Table
//!
//! ```rust,no_run
//! use domo_rs::{Cell, CreateDataSetOptions, DomoClient, Table};
//!
//! #[tokio::main]
//! async fn main() -> domo_rs::Result<()> {
//!     let client = DomoClient::new("client-id", "client-secret").await?;
//!
//!     let mut table = Table::new(vec!["friend".into(), "attending".into()]);
//!     table.push_row(vec!["Leonhard Euler".into(), Cell::Bool(true)])?;
//!     table.push_row(vec!["Carl Gauss".into(), Cell::Bool(false)])?;
//!
//!     let id = client
//!         .create_dataset_from_table(&table, "Party", "Guest list", CreateDataSetOptions::default())
//!         .await?;
//!
//!     let exported = client.export_table(&id).await?;
//!     assert_eq!(exported.row_count(), 2);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod upload;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use models::*;
pub use client::{
    ApiResponse, ClientConfig, DomoClient, ListOptions, MediaType, Paginator, Payload,
    RequestTemplate, UploadConfig,
};
pub use auth::Credentials;
pub use upload::{ChunkPlan, CreateDataSetOptions, StreamUploader, UploadOptions, UploadReport};

/// Prelude module for convenient imports.
///
/// ```rust
/// use domo_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        DataSetId, StreamId, ExecutionId, UserId, GroupId, PageId, PartNumber,
        // Enums
        ColumnType, UpdateMethod, ExecutionState,
        // Records
        DataSet, DataSetRequest, Schema, Column, Stream, Execution, User, Group, Page,
        // Tables
        Table, Cell,
    };
    pub use crate::client::{DomoClient, ClientConfig, UploadConfig, ListOptions, Paginator};
    pub use crate::upload::{CreateDataSetOptions, StreamUploader, UploadOptions, UploadReport};
}

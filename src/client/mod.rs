//! HTTP client and service layer for the Domo API.
//!
//! This module provides the main entry point [`DomoClient`], the
//! authenticated transport it shares with every service, and the
//! [`Paginator`] returned by list operations.
//!
//! # Example
//!
//! ```no_run
//! use domo_rs::{ClientConfig, DomoClient, ListOptions};
//!
//! # async fn example() -> domo_rs::Result<()> {
//! let config = ClientConfig::default().with_log_name("reporting");
//! let client = DomoClient::with_config("client-id", "client-secret", config).await?;
//!
//! let groups = client.groups().list(ListOptions::default())?.collect_all().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;
pub mod paginated;

pub use config::{ClientConfig, UploadConfig, DEFAULT_API_HOST, DEFAULT_SCOPE};
pub use http::{ApiResponse, DomoClient, MediaType, Payload, RequestTemplate};
pub use paginated::{ListOptions, Paginator, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub(crate) use http::ClientInner;
pub(crate) use paginated::PaginatorBuilder;

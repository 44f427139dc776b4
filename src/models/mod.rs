//! Data models for the Domo API.
//!
//! This module contains the strongly-typed records exchanged with the API.
//! Models are organized by domain:
//!
//! - [`primitives`] - Identifier newtypes like `DataSetId`, `StreamId`, etc.
//! - [`enums`] - Column types, update methods, execution states
//! - [`dataset`] - Datasets, schemas and personalized data policies
//! - [`stream`] - Streams and stream executions
//! - [`user`] - Users and groups
//! - [`page`] - Pages and card collections
//! - [`account`] - Data accounts and roles
//! - [`table`] - In-memory tables, type inference and CSV encoding

pub mod primitives;
pub mod enums;
pub mod dataset;
pub mod stream;
pub mod user;
pub mod page;
pub mod account;
pub mod table;

// Re-export commonly used types
pub use primitives::*;
pub use enums::*;
pub use dataset::*;
pub use stream::*;
pub use user::*;
pub use page::*;
pub use account::*;
pub use table::*;

//! Stream and stream execution models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::dataset::{DataSet, DataSetRequest};
use super::enums::{ExecutionState, UpdateMethod};
use super::primitives::{ExecutionId, StreamId};

/// An upload pipeline bound to one dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    /// Stream id
    pub id: StreamId,
    /// The dataset this stream writes into
    #[serde(default)]
    pub data_set: Option<DataSet>,
    /// Default update method for new executions
    #[serde(default)]
    pub update_method: Option<UpdateMethod>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Request body for creating a stream together with its dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamRequest {
    /// Dataset to create
    pub data_set: DataSetRequest,
    /// Default update method
    pub update_method: UpdateMethod,
    /// Key columns an upsert matches rows on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_column_names: Vec<String>,
}

impl StreamRequest {
    /// Create a stream request.
    pub fn new(data_set: DataSetRequest, update_method: UpdateMethod) -> Self {
        Self {
            data_set,
            update_method,
            key_column_names: Vec::new(),
        }
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

/// Partial update of a stream's metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamUpdate {
    /// New default update method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_method: Option<UpdateMethod>,
}

/// One multi-part upload against a stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    /// Execution id
    pub id: ExecutionId,
    /// Current state
    #[serde(default = "default_state")]
    pub current_state: ExecutionState,
    /// Update method applied on commit
    #[serde(default)]
    pub update_method: Option<UpdateMethod>,
    /// Start time
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// End time, once committed or aborted
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    /// Creation time
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

fn default_state() -> ExecutionState {
    ExecutionState::Unknown
}

/// Request body for opening an execution.
///
/// Without an update method the stream's own setting applies.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRequest {
    /// Override the stream's update method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_method: Option<UpdateMethod>,
}

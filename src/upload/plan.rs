//! Chunk planning and part-number bookkeeping.

use std::ops::Range;

use crate::client::UploadConfig;
use crate::models::{ExecutionId, PartNumber, StreamId, Table};
use crate::{Error, Result};

/// Estimate how many rows fit in one part.
///
/// The table's in-memory size is assumed to shrink by
/// `compression_ratio` once serialized, and the row count is scaled down
/// proportionally until one chunk fits `target_chunk_bytes`. A table that
/// already fits is sent as a single chunk. Never returns less than one.
pub fn estimate_chunk_rows(total_rows: usize, total_bytes: u64, config: &UploadConfig) -> usize {
    let budget = config.in_memory_budget();
    if total_bytes == 0 || total_bytes as f64 <= budget {
        return total_rows.max(1);
    }

    let rows = (total_rows as f64 * budget / total_bytes as f64).floor();
    if rows.is_finite() && rows >= 1.0 {
        (rows as usize).min(total_rows.max(1))
    } else {
        1
    }
}

/// Contiguous row ranges that together cover a table exactly once.
///
/// # Example
///
/// ```
/// use domo_rs::upload::ChunkPlan;
///
/// let plan = ChunkPlan::new(120, 40)?;
/// assert_eq!(plan.ranges(), &[0..40, 40..80, 80..120]);
/// plan.verify()?;
/// # Ok::<(), domo_rs::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    total_rows: usize,
    ranges: Vec<Range<usize>>,
}

impl ChunkPlan {
    /// Split `total_rows` rows into chunks of `rows_per_chunk`; the last
    /// chunk may be shorter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `rows_per_chunk` is zero while
    /// there are rows to split.
    pub fn new(total_rows: usize, rows_per_chunk: usize) -> Result<Self> {
        if rows_per_chunk == 0 && total_rows > 0 {
            return Err(Error::Validation(
                "rows per chunk must be at least 1".to_string(),
            ));
        }

        let ranges = (0..total_rows)
            .step_by(rows_per_chunk.max(1))
            .map(|start| start..(start + rows_per_chunk).min(total_rows))
            .collect();

        Ok(Self { total_rows, ranges })
    }

    /// Plan a table using its estimated size.
    pub fn for_table(table: &Table, config: &UploadConfig) -> Result<Self> {
        let rows = table.row_count();
        let per_chunk = estimate_chunk_rows(rows, table.estimated_size(), config);
        Self::new(rows, per_chunk)
    }

    /// Planned ranges in upload order.
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns `true` when there is nothing to upload.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Rows covered by the plan.
    pub fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Check that the ranges partition `0..total_rows`: each range is
    /// non-empty and starts where the previous one ended, and the last one
    /// ends at `total_rows`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UploadIntegrity`] on any gap, overlap or empty range.
    pub fn verify(&self) -> Result<()> {
        let mut expected_start = 0;
        for (i, range) in self.ranges.iter().enumerate() {
            if range.start != expected_start {
                return Err(Error::UploadIntegrity(format!(
                    "chunk {i} starts at row {} but row {expected_start} was expected",
                    range.start
                )));
            }
            if range.is_empty() {
                return Err(Error::UploadIntegrity(format!("chunk {i} is empty")));
            }
            expected_start = range.end;
        }

        if expected_start != self.total_rows {
            return Err(Error::UploadIntegrity(format!(
                "chunks cover {expected_start} of {} rows",
                self.total_rows
            )));
        }
        Ok(())
    }
}

/// Client-side handle on an open execution.
///
/// Hands out part numbers and refuses to issue one that is not greater
/// than the last, so a part number is never reused within an execution.
#[derive(Debug, Clone)]
pub struct UploadExecution {
    stream_id: StreamId,
    execution_id: ExecutionId,
    last_part: Option<PartNumber>,
    parts: Vec<PartNumber>,
}

impl UploadExecution {
    /// Track a freshly opened execution.
    pub fn new(stream_id: StreamId, execution_id: ExecutionId) -> Self {
        Self {
            stream_id,
            execution_id,
            last_part: None,
            parts: Vec::new(),
        }
    }

    /// Issue the part number for a chunk starting at `start_row`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UploadIntegrity`] if the part number would not be
    /// strictly greater than every part already issued.
    pub fn issue_part(&mut self, start_row: usize) -> Result<PartNumber> {
        let part = PartNumber::new(start_row as u64);
        if let Some(last) = self.last_part {
            if part <= last {
                return Err(Error::UploadIntegrity(format!(
                    "part {part} issued after part {last} on execution {}",
                    self.execution_id
                )));
            }
        }
        self.last_part = Some(part);
        self.parts.push(part);
        Ok(part)
    }

    /// Stream the execution belongs to.
    pub fn stream_id(&self) -> StreamId {
        self.stream_id
    }

    /// Execution id.
    pub fn execution_id(&self) -> ExecutionId {
        self.execution_id
    }

    /// Part numbers issued so far, in order.
    pub fn parts(&self) -> &[PartNumber] {
        &self.parts
    }
}

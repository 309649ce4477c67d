//! Long-running job status.
//!
//! Route optimization runs and CSV import sessions are modeled as pollable
//! resources whose status the query layer re-fetches until terminal.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle status of a long-running backend job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Idle,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal statuses stop polling immediately.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Extracts a status from a JSON payload's `status` field.
    ///
    /// Unknown or missing statuses read as `Processing` so a malformed tick
    /// keeps polling rather than silently abandoning a live job.
    pub fn from_payload(payload: &Value) -> JobStatus {
        payload
            .get("status")
            .and_then(Value::as_str)
            .and_then(|s| serde_json::from_value(Value::String(s.to_string())).ok())
            .unwrap_or(JobStatus::Processing)
    }
}

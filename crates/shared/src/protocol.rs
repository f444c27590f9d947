use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{TaskAction, TaskStatus, TaskSummary};

/// Outbound request body for one chat exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskOperation {
    Add,
    List,
    Complete,
    Update,
    Delete,
    /// Operation names this client does not know yet. Kept so a newer
    /// backend cannot break envelope parsing.
    #[serde(other)]
    Unknown,
}

/// Wire shape of the optional task metadata: a single object with an
/// `operation` discriminant and per-operation optional fields. Collapsed
/// into [`TaskAction`] before anything renders it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<TaskOperation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<TaskSummary>>,
}

impl ResponseMetadata {
    /// Collapses the wire shape into a coherent task action. Returns
    /// `None` when the declared operation is missing a required field,
    /// so partially populated metadata degrades to plain text instead of
    /// fabricating placeholder data.
    pub fn action(&self) -> Option<TaskAction> {
        match self.operation? {
            TaskOperation::Add => Some(TaskAction::Added {
                task_id: self.task_id.clone()?,
                task_name: self.task_name.clone()?,
            }),
            TaskOperation::Complete => Some(TaskAction::Completed {
                task_id: self.task_id.clone()?,
                task_name: self.task_name.clone(),
            }),
            TaskOperation::Update => Some(TaskAction::Updated {
                task_id: self.task_id.clone()?,
                task_name: self.task_name.clone(),
            }),
            TaskOperation::Delete => Some(TaskAction::Deleted {
                task_id: self.task_id.clone()?,
                task_name: self.task_name.clone(),
            }),
            TaskOperation::List => Some(TaskAction::Listed {
                tasks: self.tasks.clone()?,
            }),
            TaskOperation::Unknown => None,
        }
    }
}

/// Response envelope for one chat exchange: free text plus optional task
/// metadata, with the server-assigned timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

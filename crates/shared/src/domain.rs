use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Locally generated message identifier. Random so that two sends within
/// the same clock tick still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    Sending,
    Sent,
    Delivered,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
}

/// Display-only projection of a task embedded in chat response metadata.
/// The authoritative task record lives behind the separate REST surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSummary {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

/// Coherent task operation collapsed from the wire metadata. Only built
/// when every field the operation requires is actually present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    Added {
        task_id: String,
        task_name: String,
    },
    Completed {
        task_id: String,
        task_name: Option<String>,
    },
    Updated {
        task_id: String,
        task_name: Option<String>,
    },
    Deleted {
        task_id: String,
        task_name: Option<String>,
    },
    Listed {
        tasks: Vec<TaskSummary>,
    },
}

/// Rendering-only payload attached to a timeline message. Never drives
/// transport behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageMetadata {
    TaskAction(TaskAction),
    ErrorMessage(String),
}

/// One entry in the session timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub status: MessageStatus,
    pub metadata: Option<MessageMetadata>,
}

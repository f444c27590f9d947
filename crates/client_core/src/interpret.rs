//! Pure mapping from a response envelope to display text. Absence of
//! metadata is the common case and passes the backend text through
//! unchanged; metadata that does not form a coherent task action is
//! discarded the same way rather than rendered half-filled.

use chrono::{DateTime, Datelike, Local, NaiveDate};
use shared::{
    domain::{TaskAction, TaskStatus, TaskSummary},
    protocol::{ChatResponse, ResponseMetadata},
};

/// Interprets one response envelope into the assistant message text.
/// Infallible: every envelope maps to some text.
pub fn interpret(envelope: &ChatResponse) -> String {
    let Some(action) = envelope.metadata.as_ref().and_then(ResponseMetadata::action) else {
        return envelope.response.clone();
    };

    match action {
        TaskAction::Added { task_id, task_name } => format!(
            "{}\n\n✓ Task ID: {task_id}\n✓ Task: {task_name}",
            envelope.response
        ),
        TaskAction::Completed { task_id, task_name } => format!(
            "{}\n\n✓ {} marked as complete",
            envelope.response,
            task_label(&task_id, task_name.as_deref())
        ),
        TaskAction::Updated { task_id, task_name } => format!(
            "{}\n\n✓ {} updated successfully",
            envelope.response,
            task_label(&task_id, task_name.as_deref())
        ),
        TaskAction::Deleted { task_id, task_name } => format!(
            "{}\n\n✓ {} deleted",
            envelope.response,
            task_label(&task_id, task_name.as_deref())
        ),
        TaskAction::Listed { tasks } => {
            format_task_list(&envelope.response, &tasks, Local::now().date_naive())
        }
    }
}

fn task_label(task_id: &str, task_name: Option<&str>) -> String {
    task_name.map_or_else(|| format!("Task {task_id}"), str::to_string)
}

fn format_task_list(intro: &str, tasks: &[TaskSummary], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return format!("{intro}\n\nYou don't have any tasks yet. Would you like to create one?");
    }

    let lines: Vec<String> = tasks
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let glyph = match task.status {
                TaskStatus::Completed => '✓',
                TaskStatus::Active => '○',
            };
            let due = task
                .due_date
                .as_deref()
                .map(|raw| format!(" (Due: {})", due_date_label(raw, today)))
                .unwrap_or_default();
            format!("{}. {glyph} {}{due}", index + 1, task.name)
        })
        .collect();

    format!("{intro}\n\n{}", lines.join("\n"))
}

/// Human label for an absolute due date: `Today`, `Tomorrow`, or a
/// month/day rendering that includes the year only when it differs from
/// the current one. Unparseable input comes back unchanged.
pub fn due_date_label(raw: &str, today: NaiveDate) -> String {
    let Some(date) = parse_due_date(raw) else {
        return raw.to_string();
    };

    if date == today {
        return "Today".to_string();
    }
    if Some(date) == today.succ_opt() {
        return "Tomorrow".to_string();
    }

    if date.year() == today.year() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}

fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
#[path = "tests/interpret_tests.rs"]
mod tests;

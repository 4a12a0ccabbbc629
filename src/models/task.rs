use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::models::status::Status;

/// Store-assigned task identifier. Starts at 1 and is never reused.
pub type TaskId = u64;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Task {
    /// Assigned by the store on creation
    pub id: TaskId,
    /// Title of the task
    pub title: String,
    /// Free-form description
    pub description: String,
    /// Column the task sits in
    pub status: Status,
    /// Tags shown on the card, in insertion order. Duplicates are allowed
    pub labels: Vec<String>,
    /// Attachment names, in insertion order
    pub attachments: Vec<String>,
    /// Append-only discussion thread
    pub comments: Vec<Comment>,
}

impl Task {
    /// Case-insensitive substring match on title, description or any label.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self
                .labels
                .iter()
                .any(|label| label.to_lowercase().contains(needle))
    }
}

/// A task as handed to the store for creation. The id is not part of it.
#[derive(Debug, Default, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub labels: Vec<String>,
    pub attachments: Vec<String>,
    pub comments: Vec<Comment>,
}

impl TaskDraft {
    pub(crate) fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            status: self.status,
            labels: self.labels,
            attachments: self.attachments,
            comments: self.comments,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub content: String,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task_with(title: &str, description: &str, labels: &[&str]) -> Task {
        Task {
            title: title.to_string(),
            description: description.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            ..Task::default()
        }
    }

    #[test]
    fn test_matches_title_description_and_labels() {
        let task = task_with("Fix bug", "Crash on login", &["Backend"]);

        assert!(task.matches("fix"));
        assert!(task.matches("login"));
        assert!(task.matches("backend"));
        assert!(!task.matches("front"));
    }

    #[test]
    fn test_empty_needle_matches_everything() {
        let task = task_with("", "", &[]);
        assert!(task.matches(""));
    }

    #[test]
    fn test_comment_serializes_created_at_in_camel_case() {
        let comment = Comment {
            content: String::from("looks good"),
            created_at: Timestamp::UNIX_EPOCH,
        };
        let json = serde_json::to_value(&comment).unwrap();

        assert_eq!(json["content"], "looks good");
        assert!(json.get("createdAt").is_some());
    }
}

use thiserror::Error;
use tracing::debug;

use crate::models::{
    status::Status,
    store::{StoreError, TaskStore},
    task::{Task, TaskDraft, TaskId},
};

#[derive(Debug, Error)]
pub enum CreateTaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct CreateTaskParameters {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub labels: Vec<String>,
    pub attachments: Vec<String>,
}

pub fn create_task(
    store: &mut TaskStore,
    parameters: CreateTaskParameters,
) -> Result<Task, CreateTaskError> {
    let title = parameters.title.trim().to_string();
    if title.is_empty() {
        return Err(CreateTaskError::EmptyTitle);
    }

    let status = match parameters.status {
        Some(status) => status.parse::<Status>()?,
        None => Status::Pending,
    };

    let task_id = store.create(TaskDraft {
        title,
        description: parameters.description.unwrap_or_default(),
        status,
        labels: parameters.labels,
        attachments: parameters.attachments,
        comments: vec![],
    });

    Ok(store
        .task(task_id)
        .cloned()
        .ok_or(StoreError::NotFound(task_id))?)
}

#[derive(Debug, Error)]
pub enum EditTaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Default)]
pub struct EditTaskParameters {
    pub task_id: TaskId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub add_labels: Vec<String>,
    pub remove_labels: Vec<String>,
    pub attach: Vec<String>,
    pub detach: Vec<String>,
}

/// Applies the requested changes through the store's draft workflow:
/// copy the task, change the copy, then commit it back in one step.
pub fn edit_task(
    store: &mut TaskStore,
    parameters: EditTaskParameters,
) -> Result<Task, EditTaskError> {
    // Validate everything before touching the edit buffer
    let status = parameters
        .status
        .map(|s| s.parse::<Status>())
        .transpose()?;
    let title = match parameters.title {
        Some(title) if title.trim().is_empty() => return Err(EditTaskError::EmptyTitle),
        Some(title) => Some(title.trim().to_string()),
        None => None,
    };

    store.begin_edit(parameters.task_id)?;

    if let Some(draft) = store.edited_task_mut() {
        if let Some(title) = title {
            draft.title = title;
        }
        if let Some(description) = parameters.description {
            draft.description = description;
        }
        if let Some(status) = status {
            draft.status = status;
        }
        draft
            .labels
            .retain(|label| !parameters.remove_labels.contains(label));
        draft.labels.extend(parameters.add_labels);
        draft
            .attachments
            .retain(|attachment| !parameters.detach.contains(attachment));
        draft.attachments.extend(parameters.attach);
    }

    if let Err(e) = store.commit_edit() {
        store.discard_edit();
        return Err(e.into());
    }
    debug!(task_id = parameters.task_id, "edited task");

    Ok(store
        .task(parameters.task_id)
        .cloned()
        .ok_or(StoreError::NotFound(parameters.task_id))?)
}

#[derive(Debug, Error)]
pub enum SelectTaskError {
    #[error("Task {0} not found")]
    TaskNotFound(TaskId),
}

pub fn select_task(store: &mut TaskStore, task_id: TaskId) -> Result<Task, SelectTaskError> {
    store.select(task_id);
    store
        .selected_task()
        .cloned()
        .ok_or(SelectTaskError::TaskNotFound(task_id))
}

/// Deletes whatever task is currently selected
pub fn delete_selected_task(store: &mut TaskStore) -> Result<Task, StoreError> {
    store.delete()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveDirection {
    Forward,
    Backward,
}

#[derive(Debug, Error)]
pub enum MoveTaskError {
    #[error("Task {0} not found")]
    TaskNotFound(TaskId),
}

pub struct MoveTaskResult {
    pub task_id: TaskId,
    pub from: Status,
    pub to: Status,
}

impl MoveTaskResult {
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

pub fn move_task(
    store: &mut TaskStore,
    task_id: TaskId,
    direction: MoveDirection,
) -> Result<MoveTaskResult, MoveTaskError> {
    let from = store
        .task(task_id)
        .map(|t| t.status)
        .ok_or(MoveTaskError::TaskNotFound(task_id))?;

    let to = match direction {
        MoveDirection::Forward => store.advance_status(task_id),
        MoveDirection::Backward => store.regress_status(task_id),
    }
    .ok_or(MoveTaskError::TaskNotFound(task_id))?;

    Ok(MoveTaskResult { task_id, from, to })
}

#[derive(Debug, Error)]
pub enum CommentTaskError {
    #[error("Comment cannot be empty")]
    EmptyComment,

    #[error("Task {0} not found")]
    TaskNotFound(TaskId),
}

pub fn comment_task(
    store: &mut TaskStore,
    task_id: TaskId,
    content: String,
) -> Result<(), CommentTaskError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(CommentTaskError::EmptyComment);
    }

    if !store.add_comment(task_id, content) {
        return Err(CommentTaskError::TaskNotFound(task_id));
    }

    Ok(())
}

#[derive(Debug, Error)]
pub enum DetachAttachmentError {
    #[error("Task {0} not found")]
    TaskNotFound(TaskId),

    #[error("Task {task_id} has no attachment named '{name}'")]
    AttachmentNotFound { task_id: TaskId, name: String },
}

pub fn detach_attachment(
    store: &mut TaskStore,
    task_id: TaskId,
    name: &str,
) -> Result<(), DetachAttachmentError> {
    let had_attachment = store
        .task(task_id)
        .map(|t| t.attachments.iter().any(|a| a == name))
        .ok_or(DetachAttachmentError::TaskNotFound(task_id))?;

    if !had_attachment {
        return Err(DetachAttachmentError::AttachmentNotFound {
            task_id,
            name: name.to_string(),
        });
    }

    store.delete_attachment(task_id, name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_params(title: &str) -> CreateTaskParameters {
        CreateTaskParameters {
            title: title.to_string(),
            description: None,
            status: None,
            labels: vec![],
            attachments: vec![],
        }
    }

    fn store_with_task(title: &str) -> (TaskStore, TaskId) {
        let mut store = TaskStore::new();
        let task = create_task(&mut store, create_params(title)).unwrap();
        (store, task.id)
    }

    #[test]
    fn test_create_task_defaults_to_pending() {
        let mut store = TaskStore::new();

        let task = create_task(&mut store, create_params("  Fix bug ")).unwrap();

        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Fix bug");
        assert_eq!(task.description, "");
        assert_eq!(task.status, Status::Pending);
    }

    #[test]
    fn test_create_task_with_status() {
        let mut store = TaskStore::new();
        let params = CreateTaskParameters {
            status: Some(String::from("Processing")),
            ..create_params("Deploy")
        };

        let task = create_task(&mut store, params).unwrap();

        assert_eq!(task.status, Status::Processing);
    }

    #[test]
    fn test_create_task_rejects_bad_input() {
        let mut store = TaskStore::new();

        assert!(matches!(
            create_task(&mut store, create_params("   ")),
            Err(CreateTaskError::EmptyTitle)
        ));

        let params = CreateTaskParameters {
            status: Some(String::from("blocked")),
            ..create_params("Deploy")
        };
        assert!(matches!(
            create_task(&mut store, params),
            Err(CreateTaskError::Store(StoreError::InvalidStatus(_)))
        ));
        assert_eq!(store.task_count(), 0);
    }

    #[test]
    fn test_edit_task_applies_all_changes() {
        let mut store = TaskStore::new();
        let params = CreateTaskParameters {
            labels: vec![String::from("Backend"), String::from("Server")],
            attachments: vec![String::from("old.log")],
            ..create_params("Fix bug")
        };
        let task = create_task(&mut store, params).unwrap();

        let edited = edit_task(
            &mut store,
            EditTaskParameters {
                task_id: task.id,
                title: Some(String::from("Fix login bug")),
                description: Some(String::from("Happens on Safari")),
                status: Some(String::from("done")),
                add_labels: vec![String::from("Front-end")],
                remove_labels: vec![String::from("Server")],
                attach: vec![String::from("trace.txt")],
                detach: vec![String::from("old.log")],
            },
        )
        .unwrap();

        assert_eq!(edited.title, "Fix login bug");
        assert_eq!(edited.description, "Happens on Safari");
        assert_eq!(edited.status, Status::Done);
        assert_eq!(edited.labels, vec!["Backend", "Front-end"]);
        assert_eq!(edited.attachments, vec!["trace.txt"]);
        assert_eq!(store.task(task.id).unwrap(), &edited);
        assert!(store.edited_task().is_none());
    }

    #[test]
    fn test_edit_task_invalid_status_leaves_task_untouched() {
        let (mut store, task_id) = store_with_task("Fix bug");

        let result = edit_task(
            &mut store,
            EditTaskParameters {
                task_id,
                title: Some(String::from("Changed")),
                status: Some(String::from("archived")),
                ..EditTaskParameters::default()
            },
        );

        assert!(matches!(
            result,
            Err(EditTaskError::Store(StoreError::InvalidStatus(_)))
        ));
        assert_eq!(store.task(task_id).unwrap().title, "Fix bug");
        assert!(store.edited_task().is_none());
    }

    #[test]
    fn test_edit_missing_task() {
        let mut store = TaskStore::new();

        let result = edit_task(
            &mut store,
            EditTaskParameters {
                task_id: 5,
                ..EditTaskParameters::default()
            },
        );

        assert!(matches!(
            result,
            Err(EditTaskError::Store(StoreError::NotFound(5)))
        ));
    }

    #[test]
    fn test_select_and_delete() {
        let (mut store, task_id) = store_with_task("Fix bug");

        assert!(matches!(
            select_task(&mut store, 9),
            Err(SelectTaskError::TaskNotFound(9))
        ));
        assert!(delete_selected_task(&mut store).is_err());

        let selected = select_task(&mut store, task_id).unwrap();
        assert_eq!(selected.title, "Fix bug");

        let deleted = delete_selected_task(&mut store).unwrap();
        assert_eq!(deleted.id, task_id);
        assert_eq!(store.task_count(), 0);
    }

    #[test]
    fn test_move_task_reports_transition() {
        let (mut store, task_id) = store_with_task("Fix bug");

        let result = move_task(&mut store, task_id, MoveDirection::Forward).unwrap();
        assert_eq!(result.from, Status::Pending);
        assert_eq!(result.to, Status::Processing);
        assert!(result.moved());

        move_task(&mut store, task_id, MoveDirection::Backward).unwrap();
        let result = move_task(&mut store, task_id, MoveDirection::Backward).unwrap();
        assert!(!result.moved());
        assert_eq!(result.to, Status::Pending);

        assert!(matches!(
            move_task(&mut store, 42, MoveDirection::Forward),
            Err(MoveTaskError::TaskNotFound(42))
        ));
    }

    #[test]
    fn test_comment_task() {
        let (mut store, task_id) = store_with_task("Fix bug");

        comment_task(&mut store, task_id, String::from(" Reproduced ")).unwrap();

        assert_eq!(store.task(task_id).unwrap().comments[0].content, "Reproduced");
        assert!(matches!(
            comment_task(&mut store, task_id, String::from("  ")),
            Err(CommentTaskError::EmptyComment)
        ));
        assert!(matches!(
            comment_task(&mut store, 3, String::from("hello")),
            Err(CommentTaskError::TaskNotFound(3))
        ));
    }

    #[test]
    fn test_detach_attachment() {
        let mut store = TaskStore::new();
        let params = CreateTaskParameters {
            attachments: vec![String::from("a.png"), String::from("a.png")],
            ..create_params("Design")
        };
        let task = create_task(&mut store, params).unwrap();

        detach_attachment(&mut store, task.id, "a.png").unwrap();
        assert!(store.task(task.id).unwrap().attachments.is_empty());

        assert!(matches!(
            detach_attachment(&mut store, task.id, "a.png"),
            Err(DetachAttachmentError::AttachmentNotFound { .. })
        ));
        assert!(matches!(
            detach_attachment(&mut store, 8, "a.png"),
            Err(DetachAttachmentError::TaskNotFound(8))
        ));
    }
}

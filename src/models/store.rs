use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    status::Status,
    task::{Comment, Task, TaskDraft, TaskId},
};

/// Labels offered to the user when no configuration overrides them
pub const DEFAULT_LABELS: [&str; 3] = ["Backend", "Server", "Front-end"];

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("Task {0} not found")]
    NotFound(TaskId),

    #[error("Precondition violated: {0}")]
    PreconditionViolated(&'static str),

    #[error("Invalid status '{0}'. Expected one of: pending, processing, done")]
    InvalidStatus(String),
}

/// Working copy of a task being edited. The target id is captured when the
/// edit begins so changes to the buffer can never retarget the commit.
#[derive(Debug)]
struct Draft {
    task_id: TaskId,
    task: Task,
}

/// In-memory registry of tasks plus the board's selection state.
///
/// Every mutation goes through a named method. Read accessors hand out shared
/// references only, and the edit buffer is a separate owned copy, so nothing
/// outside the store can change a live task in place.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    selected_task_id: Option<TaskId>,
    draft: Option<Draft>,
    next_task_id: TaskId,
    available_labels: Vec<String>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::with_labels(DEFAULT_LABELS.iter().map(|l| l.to_string()).collect())
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(available_labels: Vec<String>) -> Self {
        Self {
            tasks: vec![],
            selected_task_id: None,
            draft: None,
            next_task_id: 1,
            available_labels,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn available_labels(&self) -> &[String] {
        &self.available_labels
    }

    /// Adds a new task and returns the id assigned to it
    pub fn create(&mut self, draft: TaskDraft) -> TaskId {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        self.tasks.push(draft.into_task(task_id));
        debug!(task_id, "created task");

        task_id
    }

    /// Selects the task with the given id, or clears the selection if there is none
    pub fn select(&mut self, task_id: TaskId) {
        self.selected_task_id = self.task(task_id).map(|t| t.id);
        debug!(task_id, found = self.selected_task_id.is_some(), "selected task");
    }

    /// The currently selected task. Resolves to `None` once that task is deleted.
    pub fn selected_task(&self) -> Option<&Task> {
        self.selected_task_id.and_then(|id| self.task(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected_task_id = None;
    }

    /// Starts editing a task by copying it into the edit buffer
    pub fn begin_edit(&mut self, task_id: TaskId) -> Result<(), StoreError> {
        let task = self.task(task_id).ok_or(StoreError::NotFound(task_id))?.clone();

        self.draft = Some(Draft { task_id, task });
        debug!(task_id, "began editing task");

        Ok(())
    }

    pub fn edited_task(&self) -> Option<&Task> {
        self.draft.as_ref().map(|d| &d.task)
    }

    /// Mutable access to the edit buffer. Changes stay local until `commit_edit`.
    pub fn edited_task_mut(&mut self) -> Option<&mut Task> {
        self.draft.as_mut().map(|d| &mut d.task)
    }

    pub fn discard_edit(&mut self) {
        if let Some(draft) = self.draft.take() {
            debug!(task_id = draft.task_id, "discarded edit");
        }
    }

    /// Writes the edit buffer back over the task it was copied from.
    ///
    /// On failure the buffer is left in place so the caller can retry or discard.
    pub fn commit_edit(&mut self) -> Result<(), StoreError> {
        let task_id = self
            .draft
            .as_ref()
            .map(|d| d.task_id)
            .ok_or(StoreError::PreconditionViolated("no task is being edited"))?;

        let index = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(StoreError::NotFound(task_id))?;

        if let Some(Draft { mut task, .. }) = self.draft.take() {
            task.id = task_id;
            self.tasks[index] = task;
        }
        debug!(task_id, "committed edit");

        Ok(())
    }

    /// Removes the selected task and clears the selection
    pub fn delete(&mut self) -> Result<Task, StoreError> {
        let task_id = self
            .selected_task_id
            .ok_or(StoreError::PreconditionViolated("no task is selected"))?;

        let index = self
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(StoreError::NotFound(task_id))?;

        let removed = self.tasks.remove(index);
        self.tasks.retain(|t| t.id != task_id);
        self.selected_task_id = None;
        debug!(task_id, "deleted task");

        Ok(removed)
    }

    /// Tasks whose title, description or any label contains `term`, ignoring case
    pub fn search(&self, term: &str) -> Vec<&Task> {
        let needle = term.to_lowercase();
        self.tasks.iter().filter(|t| t.matches(&needle)).collect()
    }

    /// Removes every attachment named `attachment_name`.
    /// Returns `false` if the task does not exist.
    pub fn delete_attachment(&mut self, task_id: TaskId, attachment_name: &str) -> bool {
        let Some(task) = self.task_mut(task_id) else {
            warn!(task_id, "cannot delete attachment: task not found");
            return false;
        };

        let before = task.attachments.len();
        task.attachments.retain(|a| a != attachment_name);
        debug!(
            task_id,
            removed = before - task.attachments.len(),
            "deleted attachment"
        );

        true
    }

    /// Moves the task one step along pending → processing → done.
    /// Returns the resulting status, or `None` if the task does not exist.
    pub fn advance_status(&mut self, task_id: TaskId) -> Option<Status> {
        self.step_status(task_id, Status::next)
    }

    /// Moves the task one step back along done → processing → pending.
    /// Returns the resulting status, or `None` if the task does not exist.
    pub fn regress_status(&mut self, task_id: TaskId) -> Option<Status> {
        self.step_status(task_id, Status::previous)
    }

    /// Appends a comment stamped with the current time.
    /// Returns `false` if the task does not exist.
    pub fn add_comment(&mut self, task_id: TaskId, content: impl Into<String>) -> bool {
        let Some(task) = self.task_mut(task_id) else {
            warn!(task_id, "cannot add comment: task not found");
            return false;
        };

        task.comments.push(Comment {
            content: content.into(),
            created_at: jiff::Timestamp::now(),
        });
        debug!(task_id, comments = task.comments.len(), "added comment");

        true
    }

    pub fn count_by_status(&self, status: Status) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }

    fn step_status(
        &mut self,
        task_id: TaskId,
        step: fn(Status) -> Option<Status>,
    ) -> Option<Status> {
        let Some(task) = self.task_mut(task_id) else {
            warn!(task_id, "cannot move task: task not found");
            return None;
        };

        if let Some(status) = step(task.status) {
            debug!(task_id, from = %task.status, to = %status, "moved task");
            task.status = status;
        }

        Some(task.status)
    }

    fn task_mut(&mut self, task_id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }
}

use crate::error::AppError;
use crate::model::{Suggestion, Task};
use crate::storage::TaskStore;
use crate::suggest::generate_suggestions;
use log::debug;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Prefix shared by every persisted task key.
pub const TASK_KEY_PREFIX: &str = "task:";

/// Store key for a task: the prefix plus the creation timestamp, which stays
/// unique per task for its whole lifetime.
pub fn task_key(created_at: &str) -> String {
    format!("{TASK_KEY_PREFIX}{created_at}")
}

/// Edit workflow marker. At most one position is under edit at a time;
/// `begin_edit` while already editing retargets the marker (last write wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Editing(usize),
}

/// Single-owner session state: the in-memory task list mirroring the store,
/// plus the edit marker.
///
/// Mutating operations write to the store first and touch the in-memory list
/// only once the write has succeeded, so visible state never runs ahead of
/// persisted state. A store failure leaves the session unchanged.
#[derive(Debug)]
pub struct TaskSession<S> {
    store: S,
    tasks: Vec<Task>,
    edit: EditState,
}

impl<S: TaskStore> TaskSession<S> {
    /// Loads every `task:`-prefixed entry. List order is store order; the
    /// session does not re-sort.
    pub fn load(store: S) -> Result<Self, AppError> {
        let entries = store.get_with_prefix(TASK_KEY_PREFIX)?;
        let tasks: Vec<Task> = entries.into_iter().map(|entry| entry.value).collect();
        debug!("session loaded with {} tasks", tasks.len());
        Ok(Self {
            store,
            tasks,
            edit: EditState::Idle,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Position currently under edit, if any.
    pub fn editing(&self) -> Option<usize> {
        match self.edit {
            EditState::Editing(position) => Some(position),
            EditState::Idle => None,
        }
    }

    /// Creates a task from `text` and persists it under a fresh key.
    ///
    /// Blank input is rejected before any store traffic. The text is stored
    /// verbatim; only the blank check trims.
    pub fn add(&mut self, text: &str) -> Result<Task, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::invalid_input("task text is required"));
        }

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        let task = Task {
            text: text.to_string(),
            completed: false,
            created_at,
        };

        self.store.set(&task_key(&task.created_at), &task, false)?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Flips `completed` on the task at `position` and persists the update.
    pub fn toggle(&mut self, position: usize) -> Result<Task, AppError> {
        let mut updated = self.task_at(position)?.clone();
        updated.completed = !updated.completed;

        self.store
            .set(&task_key(&updated.created_at), &updated, true)?;
        self.tasks[position] = updated.clone();
        Ok(updated)
    }

    /// Starts editing the task at `position` and returns its current text for
    /// the caller's input buffer. No store traffic until `save_edit`.
    pub fn begin_edit(&mut self, position: usize) -> Result<String, AppError> {
        let text = self.task_at(position)?.text.clone();
        self.edit = EditState::Editing(position);
        Ok(text)
    }

    /// Completes the edit in progress with `text`, persisting the updated
    /// task under its existing key and resetting the marker.
    ///
    /// Add is the only operation with a blank-input guard; any text is
    /// accepted here, including blank.
    pub fn save_edit(&mut self, text: &str) -> Result<Task, AppError> {
        let position = match self.edit {
            EditState::Editing(position) => position,
            EditState::Idle => return Err(AppError::invalid_input("no edit in progress")),
        };

        let mut updated = self.task_at(position)?.clone();
        updated.text = text.to_string();

        self.store
            .set(&task_key(&updated.created_at), &updated, true)?;
        self.tasks[position] = updated.clone();
        self.edit = EditState::Idle;
        Ok(updated)
    }

    /// Abandons an edit in progress without touching the store or the task.
    /// Safe to call when no edit is active.
    pub fn cancel_edit(&mut self) {
        self.edit = EditState::Idle;
    }

    /// Removes the task at `position` from the store, then from the list.
    ///
    /// A live edit marker stays attached to its task: deleting the task under
    /// edit cancels the edit, deleting an earlier task shifts the marker.
    pub fn delete(&mut self, position: usize) -> Result<Task, AppError> {
        let key = task_key(&self.task_at(position)?.created_at);
        self.store.delete(&key)?;
        let removed = self.tasks.remove(position);

        self.edit = match self.edit {
            EditState::Editing(editing) if editing == position => EditState::Idle,
            EditState::Editing(editing) if editing > position => EditState::Editing(editing - 1),
            other => other,
        };

        debug!("deleted entry {key}");
        Ok(removed)
    }

    /// Quick re-entry candidates for the current list.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        generate_suggestions(&self.tasks)
    }

    fn task_at(&self, position: usize) -> Result<&Task, AppError> {
        self.tasks
            .get(position)
            .ok_or_else(|| AppError::invalid_input("task not found"))
    }
}

use crate::clock::Clock;
use crate::error::{Result, ShiftError};
use crate::keys;
use crate::store::{self, Store};
use serde::{Deserialize, Serialize};

/// Task the user planned for the day. MVP default on a fresh install.
const DEFAULT_TASK_TEXT: &str = "Write 500 words";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl Task {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Task list operations (operate on a mutable Vec<Task>)
// ---------------------------------------------------------------------------

pub fn add_task(tasks: &mut Vec<Task>, text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ShiftError::EmptyTaskText);
    }
    let task = Task::new(text);
    let id = task.id.clone();
    tasks.push(task);
    Ok(id)
}

/// Flip a task's completion flag. Returns the new value.
pub fn toggle_task(tasks: &mut [Task], id: &str) -> Result<bool> {
    let task = find_mut(tasks, id)?;
    task.completed = !task.completed;
    Ok(task.completed)
}

pub fn delete_task(tasks: &mut Vec<Task>, id: &str) -> Result<()> {
    if !tasks.iter().any(|t| t.id == id) {
        return Err(ShiftError::TaskNotFound(id.to_string()));
    }
    tasks.retain(|t| t.id != id);
    Ok(())
}

pub fn completed_count(tasks: &[Task]) -> u32 {
    tasks.iter().filter(|t| t.completed).count() as u32
}

fn find_mut<'a>(tasks: &'a mut [Task], id: &str) -> Result<&'a mut Task> {
    tasks
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| ShiftError::TaskNotFound(id.to_string()))
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

/// Load today's task list. A day that has never been opened is seeded with
/// one default task; a day cleared by rollover stays empty (`[]` is stored,
/// so the seed does not reapply).
pub fn load_today(store: &dyn Store, clock: &dyn Clock) -> Result<Vec<Task>> {
    let key = keys::tasks_key(clock.today());
    if let Some(tasks) = store::read_json::<Vec<Task>>(store, &key) {
        return Ok(tasks);
    }
    let tasks = vec![Task::new(DEFAULT_TASK_TEXT)];
    store::write_json(store, &key, &tasks)?;
    Ok(tasks)
}

pub fn save_today(store: &dyn Store, clock: &dyn Clock, tasks: &[Task]) -> Result<()> {
    store::write_json(store, &keys::tasks_key(clock.today()), &tasks)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

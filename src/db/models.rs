use serde::{Deserialize, Serialize};

/// Task status in the kanban board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "todo" => Some(TaskStatus::Todo),
            "in_progress" => Some(TaskStatus::InProgress),
            "done" => Some(TaskStatus::Done),
            _ => None,
        }
    }

    /// Column header shown above the column
    pub fn title(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }

    pub fn columns() -> &'static [TaskStatus] {
        &[TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done]
    }

    /// Position of this status on the board (0..3)
    pub fn index(&self) -> usize {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::columns().get(index).copied()
    }

    /// Following status, wrapping from Done back to Todo
    pub fn next(&self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::InProgress,
            TaskStatus::InProgress => TaskStatus::Done,
            TaskStatus::Done => TaskStatus::Todo,
        }
    }

    /// Preceding status, wrapping from Todo back to Done
    pub fn prev(&self) -> Self {
        match self {
            TaskStatus::Todo => TaskStatus::Done,
            TaskStatus::InProgress => TaskStatus::Todo,
            TaskStatus::Done => TaskStatus::InProgress,
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        Self::Todo
    }
}

/// A task on the kanban board.
///
/// The status always matches the column holding the task. It is only changed
/// by the board, through [`Task::advance`] or while restoring a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    status: TaskStatus,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl Task {
    pub fn new(status: TaskStatus, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Move the task to the next status. Returns the new status.
    pub(crate) fn advance(&mut self) -> TaskStatus {
        self.status = self.status.next();
        self.status
    }

    /// Re-tag a task with the status of the column it was loaded into
    pub(crate) fn place_in(&mut self, status: TaskStatus) {
        self.status = status;
    }
}

/// Full, order-preserving contents of a board, indexed by status.
///
/// Serializes as a JSON array of three task arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardSnapshot {
    pub columns: [Vec<Task>; 3],
}

impl BoardSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        &self.columns[status.index()]
    }

    /// Total number of tasks across all columns
    pub fn len(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Vec::is_empty)
    }
}

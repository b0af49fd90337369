use crate::db::{Task, TaskStatus};

/// One status bucket: an ordered list of tasks plus a selection cursor.
///
/// The cursor is `None` exactly when the column is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    status: TaskStatus,
    tasks: Vec<Task>,
    selected: Option<usize>,
}

impl Column {
    pub fn new(status: TaskStatus) -> Self {
        Self {
            status,
            tasks: vec![],
            selected: None,
        }
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Index of the highlighted task
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|i| self.tasks.get(i))
    }

    /// Insert at `index` (clamped to the end). The first task of an empty
    /// column becomes selected.
    pub fn insert(&mut self, index: usize, task: Task) {
        let index = index.min(self.tasks.len());
        self.tasks.insert(index, task);
        match self.selected {
            None => self.selected = Some(index),
            Some(sel) if index <= sel => self.selected = Some(sel + 1),
            Some(_) => {}
        }
    }

    pub fn push(&mut self, task: Task) {
        self.insert(self.tasks.len(), task);
    }

    pub fn remove(&mut self, index: usize) -> Option<Task> {
        if index >= self.tasks.len() {
            return None;
        }
        let task = self.tasks.remove(index);
        self.selected = match self.selected {
            _ if self.tasks.is_empty() => None,
            Some(sel) if sel > index => Some(sel - 1),
            Some(sel) => Some(sel.min(self.tasks.len() - 1)),
            None => None,
        };
        Some(task)
    }

    pub fn remove_selected(&mut self) -> Option<Task> {
        self.selected.and_then(|i| self.remove(i))
    }

    /// Replace the contents wholesale; selection resets to the top
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        self.selected = if tasks.is_empty() { None } else { Some(0) };
        self.tasks = tasks;
    }

    /// Move selection down
    pub fn select_next(&mut self) {
        if let Some(sel) = self.selected {
            if sel + 1 < self.tasks.len() {
                self.selected = Some(sel + 1);
            }
        }
    }

    /// Move selection up
    pub fn select_prev(&mut self) {
        if let Some(sel) = self.selected {
            self.selected = Some(sel.saturating_sub(1));
        }
    }
}

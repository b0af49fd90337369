use crate::db::{BoardSnapshot, Task, TaskStatus};

use super::column::Column;

/// State for the kanban board view
#[derive(Debug, Clone)]
pub struct Board {
    columns: [Column; 3],
    focused: TaskStatus,
}

impl Board {
    pub fn new() -> Self {
        Self {
            columns: [
                Column::new(TaskStatus::Todo),
                Column::new(TaskStatus::InProgress),
                Column::new(TaskStatus::Done),
            ],
            focused: TaskStatus::Todo,
        }
    }

    pub fn from_snapshot(snapshot: BoardSnapshot) -> Self {
        let mut board = Self::new();
        board.restore(snapshot);
        board
    }

    pub fn focused(&self) -> TaskStatus {
        self.focused
    }

    pub fn column(&self, status: TaskStatus) -> &Column {
        &self.columns[status.index()]
    }

    pub fn columns(&self) -> &[Column; 3] {
        &self.columns
    }

    fn focused_column_mut(&mut self) -> &mut Column {
        &mut self.columns[self.focused.index()]
    }

    /// Get the currently selected task in the focused column
    pub fn selected_task(&self) -> Option<&Task> {
        self.column(self.focused).selected_task()
    }

    /// Total number of tasks on the board
    pub fn len(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Column::is_empty)
    }

    /// Move focus right, wrapping from Done to Todo
    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
    }

    /// Move focus left, wrapping from Todo to Done
    pub fn focus_prev(&mut self) {
        self.focused = self.focused.prev();
    }

    /// Move selection down within the focused column
    pub fn select_next(&mut self) {
        self.focused_column_mut().select_next();
    }

    /// Move selection up within the focused column
    pub fn select_prev(&mut self) {
        self.focused_column_mut().select_prev();
    }

    /// Move the selected task to the end of the next column.
    ///
    /// Returns the task's new status, or `None` when nothing is selected.
    pub fn advance_selected(&mut self) -> Option<TaskStatus> {
        let mut task = self.focused_column_mut().remove_selected()?;
        let status = task.advance();
        self.columns[status.index()].push(task);
        Some(status)
    }

    /// Remove the selected task permanently
    pub fn delete_selected(&mut self) -> Option<Task> {
        self.focused_column_mut().remove_selected()
    }

    /// Append a task to the column matching its status
    pub fn insert_task(&mut self, task: Task) {
        self.columns[task.status().index()].push(task);
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            columns: [
                self.columns[0].tasks().to_vec(),
                self.columns[1].tasks().to_vec(),
                self.columns[2].tasks().to_vec(),
            ],
        }
    }

    /// Replace every column's contents. Tasks take the status of the slot
    /// they were stored in.
    pub fn restore(&mut self, snapshot: BoardSnapshot) {
        for (column, mut tasks) in self.columns.iter_mut().zip(snapshot.columns) {
            for task in &mut tasks {
                if task.status() != column.status() {
                    tracing::warn!(
                        title = %task.title,
                        stored = task.status().as_str(),
                        column = column.status().as_str(),
                        "task status disagrees with its column, using column status"
                    );
                    task.place_in(column.status());
                }
            }
            column.set_tasks(tasks);
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::db::{Task, TaskStatus};

use super::input::TextInput;

/// Which step of task creation the form is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStage {
    EditingTitle,
    EditingDescription,
    Submitted,
}

/// What the controller should do after the form handled a key
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Still editing
    Editing,
    /// Form finished; hand the task to the board
    Submitted(Task),
    /// User backed out; nothing is created
    Cancelled,
    /// Terminate the application
    Interrupted,
}

/// Two-step task creation form: title first, then description
#[derive(Debug, Clone)]
pub struct Form {
    target_status: TaskStatus,
    title: TextInput,
    description: TextInput,
    stage: FormStage,
}

impl Form {
    pub fn new(target_status: TaskStatus) -> Self {
        let mut title = TextInput::single_line();
        title.focus();
        Self {
            target_status,
            title,
            description: TextInput::multi_line(),
            stage: FormStage::EditingTitle,
        }
    }

    pub fn target_status(&self) -> TaskStatus {
        self.target_status
    }

    pub fn stage(&self) -> FormStage {
        self.stage
    }

    pub fn title(&self) -> &TextInput {
        &self.title
    }

    pub fn description(&self) -> &TextInput {
        &self.description
    }

    /// The field currently receiving text
    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.stage {
            FormStage::EditingTitle => Some(&mut self.title),
            FormStage::EditingDescription => Some(&mut self.description),
            FormStage::Submitted => None,
        }
    }

    /// Advance to the next stage. On the description step this builds the task.
    pub fn confirm(&mut self) -> FormOutcome {
        match self.stage {
            FormStage::EditingTitle => {
                self.title.blur();
                self.description.focus();
                self.stage = FormStage::EditingDescription;
                FormOutcome::Editing
            }
            FormStage::EditingDescription => {
                self.description.blur();
                self.stage = FormStage::Submitted;
                FormOutcome::Submitted(Task::new(
                    self.target_status,
                    self.title.value(),
                    self.description.value(),
                ))
            }
            FormStage::Submitted => FormOutcome::Editing,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormOutcome {
        if self.stage == FormStage::Submitted {
            return FormOutcome::Editing;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                FormOutcome::Interrupted
            }
            KeyCode::Esc => FormOutcome::Cancelled,
            KeyCode::Enter
                if self.stage == FormStage::EditingDescription
                    && key.modifiers.intersects(KeyModifiers::ALT | KeyModifiers::SHIFT) =>
            {
                self.description.insert_newline();
                FormOutcome::Editing
            }
            KeyCode::Enter => {
                if self.stage == FormStage::EditingDescription && self.description.continue_line() {
                    return FormOutcome::Editing;
                }
                self.confirm()
            }
            _ => {
                if let Some(input) = self.focused_input() {
                    input.handle_key(key);
                }
                FormOutcome::Editing
            }
        }
    }
}

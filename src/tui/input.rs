use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Logical actions available while the board is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardAction {
    FocusPrev,
    FocusNext,
    SelectUp,
    SelectDown,
    NewTask,
    DeleteTask,
    AdvanceTask,
    /// Save and exit
    Quit,
    /// Exit immediately without saving
    Interrupt,
}

impl BoardAction {
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(BoardAction::Interrupt),
                _ => None,
            };
        }
        let action = match key.code {
            KeyCode::Char('q') | KeyCode::Esc => BoardAction::Quit,
            KeyCode::Char('h') | KeyCode::Left => BoardAction::FocusPrev,
            KeyCode::Char('l') | KeyCode::Right => BoardAction::FocusNext,
            KeyCode::Char('k') | KeyCode::Up => BoardAction::SelectUp,
            KeyCode::Char('j') | KeyCode::Down => BoardAction::SelectDown,
            KeyCode::Char('n') => BoardAction::NewTask,
            KeyCode::Char('d') | KeyCode::Backspace => BoardAction::DeleteTask,
            KeyCode::Enter => BoardAction::AdvanceTask,
            _ => return None,
        };
        Some(action)
    }
}

/// Editable text buffer with a cursor.
///
/// The cursor counts chars, not bytes. Single-line buffers never contain a
/// line break.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    cursor: usize,
    multiline: bool,
    focused: bool,
}

impl TextInput {
    pub fn single_line() -> Self {
        Self::default()
    }

    pub fn multi_line() -> Self {
        Self {
            multiline: true,
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn into_value(self) -> String {
        self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Text before and after the cursor, for rendering
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.value.split_at(self.byte_offset(self.cursor))
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_offset(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' && !self.multiline {
            return;
        }
        let at = self.byte_offset(self.cursor);
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.value.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    pub fn word_left(&mut self) {
        self.cursor = word_boundary_left(&self.value, self.cursor);
    }

    pub fn word_right(&mut self) {
        self.cursor = word_boundary_right(&self.value, self.cursor);
    }

    /// If the text before the cursor ends with a backslash, replace it with
    /// a line break. Returns true when a line break was inserted.
    pub fn continue_line(&mut self) -> bool {
        if !self.multiline || self.cursor == 0 {
            return false;
        }
        let (before, _) = self.split_at_cursor();
        if !before.ends_with('\\') {
            return false;
        }
        self.backspace();
        self.insert_newline();
        true
    }

    /// Apply a plain editing key. Returns true when the key was consumed.
    ///
    /// Enter is never handled here; callers decide what confirm means.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let has_alt = key.modifiers.contains(KeyModifiers::ALT);
        match key.code {
            KeyCode::Left if has_alt => self.word_left(),
            KeyCode::Right if has_alt => self.word_right(),
            // macOS: Option+Left/Right sends Alt+b / Alt+f
            KeyCode::Char('b') if has_alt => self.word_left(),
            KeyCode::Char('f') if has_alt => self.word_right(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => self.insert_char(c),
            _ => return false,
        }
        true
    }
}

/// Find the previous word boundary, as a char index (for Option+Left)
fn word_boundary_left(s: &str, pos: usize) -> usize {
    let chars: Vec<char> = s.chars().collect();
    let pos = pos.min(chars.len());
    if pos == 0 {
        return 0;
    }
    let mut i = pos - 1;
    // Skip whitespace/punctuation
    while i > 0 && !chars[i].is_alphanumeric() {
        i -= 1;
    }
    // Skip word characters
    while i > 0 && chars[i - 1].is_alphanumeric() {
        i -= 1;
    }
    i
}

/// Find the next word boundary, as a char index (for Option+Right)
fn word_boundary_right(s: &str, pos: usize) -> usize {
    let chars: Vec<char> = s.chars().collect();
    let len = chars.len();
    if pos >= len {
        return len;
    }
    let mut i = pos;
    // Skip current word characters
    while i < len && chars[i].is_alphanumeric() {
        i += 1;
    }
    // Skip whitespace/punctuation
    while i < len && !chars[i].is_alphanumeric() {
        i += 1;
    }
    i
}

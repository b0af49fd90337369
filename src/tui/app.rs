use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;

use crate::config::{GlobalConfig, ThemeConfig};
use crate::db::{BoardStore, Database, LoadOutcome, Task};

use super::board::Board;
use super::column::Column;
use super::form::{Form, FormOutcome, FormStage};
use super::input::{BoardAction, TextInput};

/// Helper to convert hex color string to ratatui Color
fn hex_to_color(hex: &str) -> Color {
    ThemeConfig::parse_hex(hex)
        .map(|(r, g, b)| Color::Rgb(r, g, b))
        .unwrap_or(Color::White)
}

/// Build footer help text based on which surface is active
pub fn build_footer_text(form_stage: Option<FormStage>) -> String {
    match form_stage {
        None => " [←/h] [→/l] column  [↑/k] [↓/j] select  [n] new  [Enter] advance  [d] delete  [q/Esc] quit ".to_string(),
        Some(FormStage::EditingTitle) => " Enter task title... [Enter] next  [Esc] cancel  [Ctrl+C] exit ".to_string(),
        Some(FormStage::EditingDescription) | Some(FormStage::Submitted) => {
            " Enter description... [\\+Enter / Alt+Enter] newline  [Enter] save  [Esc] cancel ".to_string()
        }
    }
}

type Terminal = ratatui::Terminal<CrosstermBackend<Stdout>>;

/// Poll interval of the event loop
const TICK: Duration = Duration::from_millis(100);

/// The surface receiving input. The board itself always lives in
/// [`AppState`]; while the form is active the board is dormant.
#[derive(Debug)]
pub enum Surface {
    Board,
    Form(Form),
}

/// Application state (separate from terminal for borrow checker)
pub struct AppState {
    board: Board,
    active: Surface,
    store: BoardStore,
    config: GlobalConfig,
    should_quit: bool,
    // One-line diagnostic shown in the footer
    notice: Option<String>,
}

impl AppState {
    /// Load the board from `store`, initializing it on first run
    pub fn new(store: BoardStore, config: GlobalConfig) -> Result<Self> {
        let outcome = store.open_board().context("Failed to load board")?;

        let notice = match &outcome {
            LoadOutcome::Recovered { reason, .. } => Some(format!(
                "Saved board could not be read ({}); starting empty",
                reason
            )),
            _ => None,
        };

        Ok(Self {
            board: Board::from_snapshot(outcome.into_snapshot()),
            active: Surface::Board,
            store,
            config,
            should_quit: false,
            notice,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &Surface {
        &self.active
    }

    pub fn form(&self) -> Option<&Form> {
        match &self.active {
            Surface::Form(form) => Some(form),
            Surface::Board => None,
        }
    }

    pub fn is_form_active(&self) -> bool {
        matches!(self.active, Surface::Form(_))
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Write the current board to storage
    pub fn flush(&self) -> Result<()> {
        self.store
            .save(&self.board.snapshot())
            .context("Failed to save board")
    }

    /// Route a key press to the active surface
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.active {
            Surface::Board => match BoardAction::from_key(key) {
                Some(action) => self.handle_board_action(action),
                None => Ok(()),
            },
            Surface::Form(_) => self.handle_form_key(key),
        }
    }

    pub fn handle_board_action(&mut self, action: BoardAction) -> Result<()> {
        match action {
            BoardAction::FocusPrev => self.board.focus_prev(),
            BoardAction::FocusNext => self.board.focus_next(),
            BoardAction::SelectUp => self.board.select_prev(),
            BoardAction::SelectDown => self.board.select_next(),
            BoardAction::NewTask => self.open_form()?,
            BoardAction::DeleteTask => {
                if let Some(task) = self.board.delete_selected() {
                    tracing::info!(title = %task.title, status = task.status().as_str(), "deleted task");
                }
            }
            BoardAction::AdvanceTask => {
                if let Some(status) = self.board.advance_selected() {
                    tracing::info!(to = status.as_str(), "advanced task");
                }
            }
            BoardAction::Quit => self.quit()?,
            BoardAction::Interrupt => self.interrupt(),
        }
        Ok(())
    }

    /// Flush the board, then hand input over to a fresh form
    fn open_form(&mut self) -> Result<()> {
        self.flush()?;
        let status = self.board.focused();
        tracing::debug!(status = status.as_str(), "opening new task form");
        self.active = Surface::Form(Form::new(status));
        Ok(())
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<()> {
        let Surface::Form(form) = &mut self.active else {
            return Ok(());
        };

        match form.handle_key(key) {
            FormOutcome::Editing => {}
            FormOutcome::Submitted(task) => self.submit_task(task),
            FormOutcome::Cancelled => {
                tracing::debug!("new task form cancelled");
                self.active = Surface::Board;
            }
            FormOutcome::Interrupted => self.interrupt(),
        }
        Ok(())
    }

    /// Reactivate the board and give it the task the form produced
    fn submit_task(&mut self, task: Task) {
        let form = std::mem::replace(&mut self.active, Surface::Board);
        drop(form);
        tracing::info!(title = %task.title, status = task.status().as_str(), "created task");
        self.board.insert_task(task);
    }

    /// Save and close storage, then stop the loop
    fn quit(&mut self) -> Result<()> {
        self.flush()?;
        self.store.close().context("Failed to close board database")?;
        tracing::info!(tasks = self.board.len(), "board saved, quitting");
        self.should_quit = true;
        Ok(())
    }

    /// Stop the loop without saving
    fn interrupt(&mut self) {
        tracing::warn!("interrupted, changes since the last save are discarded");
        self.should_quit = true;
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Main layout: board, footer
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),    // Board
                Constraint::Length(3), // Footer
            ])
            .split(area);

        self.draw_board(frame, chunks[0]);
        self.draw_footer(frame, chunks[1]);

        if let Surface::Form(form) = &self.active {
            Self::draw_form(form, frame, area, &self.config.theme);
        }
    }

    fn draw_board(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

        let board_has_input = !self.is_form_active();
        for (column, column_area) in self.board.columns().iter().zip(columns.iter()) {
            let is_focused = board_has_input && self.board.focused() == column.status();
            Self::draw_column(frame, column, *column_area, is_focused, &self.config.theme);
        }
    }

    fn draw_column(frame: &mut Frame, column: &Column, area: Rect, is_focused: bool, theme: &ThemeConfig) {
        let title = format!(" {} ({}) ", column.status().title(), column.len());
        let (border_style, border_type) = if is_focused {
            (Style::default().fg(hex_to_color(&theme.color_focused)), BorderType::Rounded)
        } else {
            (Style::default().fg(hex_to_color(&theme.color_normal)), BorderType::Plain)
        };

        let block = Block::default()
            .title(title)
            .title_style(border_style.bold())
            .borders(Borders::ALL)
            .border_type(border_type)
            .border_style(border_style)
            .padding(Padding::horizontal(1));

        let width = block.inner(area).width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = column
            .tasks()
            .iter()
            .map(|task| Self::task_item(task, width, theme))
            .collect();

        let highlight = if is_focused {
            Style::default().fg(hex_to_color(&theme.color_selected)).bold()
        } else {
            Style::default().fg(hex_to_color(&theme.color_help))
        };

        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("│ ");

        let mut list_state = ListState::default().with_selected(column.selected_index());
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn task_item(task: &Task, width: usize, theme: &ThemeConfig) -> ListItem<'static> {
        let description = task.description.lines().next().unwrap_or("");
        ListItem::new(vec![
            Line::styled(truncate(&task.title, width), Style::default().fg(hex_to_color(&theme.color_text))),
            Line::styled(
                truncate(description, width),
                Style::default().fg(hex_to_color(&theme.color_description)),
            ),
            Line::raw(""),
        ])
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let footer_text = build_footer_text(self.form().map(Form::stage));
        let help_style = Style::default().fg(hex_to_color(&self.config.theme.color_help));

        let mut block = Block::default().borders(Borders::ALL).border_style(help_style);
        if let Some(notice) = &self.notice {
            block = block
                .title(format!(" {} ", notice))
                .title_style(Style::default().fg(Color::Yellow));
        }

        let footer = Paragraph::new(footer_text).style(help_style).block(block);
        frame.render_widget(footer, area);
    }

    fn draw_form(form: &Form, frame: &mut Frame, area: Rect, theme: &ThemeConfig) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let popup = Block::default()
            .title(format!(" New Task · {} ", form.target_status().title()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(hex_to_color(&theme.color_popup_border)));
        let inner = popup.inner(popup_area);
        frame.render_widget(popup, popup_area);

        let fields = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(3),    // Description
            ])
            .split(inner);

        Self::draw_field(frame, " Title ", form.title(), fields[0], theme);
        Self::draw_field(frame, " Description ", form.description(), fields[1], theme);
    }

    fn draw_field(frame: &mut Frame, label: &str, input: &TextInput, area: Rect, theme: &ThemeConfig) {
        let border_color = if input.is_focused() {
            hex_to_color(&theme.color_focused)
        } else {
            hex_to_color(&theme.color_normal)
        };

        // Insert cursor (█) at the correct position
        let text = if input.is_focused() {
            let (before_cursor, after_cursor) = input.split_at_cursor();
            format!("{}█{}", before_cursor, after_cursor)
        } else {
            input.value().to_string()
        };

        let mut paragraph = Paragraph::new(Text::raw(text))
            .style(Style::default().fg(hex_to_color(&theme.color_text)))
            .block(
                Block::default()
                    .title(label.to_string())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color)),
            );
        if input.is_multiline() {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }
        frame.render_widget(paragraph, area);
    }
}

pub struct App {
    terminal: Terminal,
    state: AppState,
}

impl App {
    /// Open the board database at `db_path` and take over the terminal
    pub fn new(config: GlobalConfig, db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)
            .with_context(|| format!("Failed to open board database at {:?}", db_path))?;
        let state = AppState::new(BoardStore::new(Box::new(db)), config)?;

        let terminal = setup_terminal()?;
        Ok(Self { terminal, state })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub async fn run(&mut self) -> Result<()> {
        while !self.state.should_quit() {
            self.draw()?;

            // Resize and other events only need the redraw above
            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.state.handle_key(key)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let state = &self.state;
        self.terminal.draw(|frame| state.render(frame))?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Enter raw mode and the alternate screen. Undone again if either step fails.
fn setup_terminal() -> Result<Terminal> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let terminal = execute!(stdout, EnterAlternateScreen)
        .map_err(anyhow::Error::from)
        .and_then(|_| Terminal::new(CrosstermBackend::new(stdout)).map_err(anyhow::Error::from));

    if terminal.is_err() {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
    terminal.context("Failed to set up terminal")
}

/// Shorten to `width` chars, marking the cut with an ellipsis (char-safe for UTF-8)
fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let kept: String = s.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

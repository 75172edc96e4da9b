//! The editor state machine: one decoded key per cycle drives a buffer
//! mutation, a cursor move, or the save/find workflows, and every cycle
//! ends in a full-frame redraw.
//!
//! The controller is generic over the [`Console`] seam so tests can drive
//! it with a scripted key stream and capture the frames it writes. It is
//! the sole mutator of session state: cursor and scroll offsets, dirty
//! flag, status message, and the quit-confirmation countdown.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use core_buffer::TextBuffer;
use core_render::{Direction, StatusContext, Viewport, compose_frame};
use core_terminal::{Console, KeyEvent, TerminalError, escape};
use tracing::{debug, error, warn};

mod find;

use find::FindState;

/// Session-level knobs, typically sourced from `core-config`.
#[derive(Debug, Clone, Copy)]
pub struct EditorOptions {
    pub quit_confirm_presses: u8,
    pub message_timeout: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            quit_confirm_presses: 3,
            message_timeout: Duration::from_secs(5),
        }
    }
}

/// A message-bar entry. It is only hidden once stale, never erased from
/// memory.
struct StatusMessage {
    text: String,
    at: Instant,
}

pub struct Editor<C: Console> {
    console: C,
    buffer: TextBuffer,
    view: Viewport,
    options: EditorOptions,
    message: Option<StatusMessage>,
    quit_remaining: u8,
    should_close: bool,
    finding: FindState,
}

impl<C: Console> Editor<C> {
    /// Build an editor for `console`, querying it once for the initial
    /// geometry. Two rows are reserved for the status and message bars.
    pub fn new(
        mut console: C,
        buffer: TextBuffer,
        options: EditorOptions,
    ) -> Result<Self, TerminalError> {
        let (rows, cols) = console.window_size()?;
        let view = Viewport::new((rows as usize).saturating_sub(2), cols as usize);
        Ok(Self {
            console,
            buffer,
            view,
            options,
            message: None,
            quit_remaining: options.quit_confirm_presses,
            should_close: false,
            finding: FindState::default(),
        })
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn view(&self) -> &Viewport {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut Viewport {
        &mut self.view
    }

    pub fn is_closing(&self) -> bool {
        self.should_close
    }

    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            at: Instant::now(),
        });
    }

    /// The message to display, or `None` once it has outlived the display
    /// duration.
    pub fn message_text(&self) -> Option<&str> {
        self.message
            .as_ref()
            .filter(|m| m.at.elapsed() < self.options.message_timeout)
            .map(|m| m.text.as_str())
    }

    /// Load `path` into the buffer. Open failures are not fatal: they are
    /// reported on the message bar and editing continues on an empty
    /// buffer (saving will create the file).
    pub fn open(&mut self, path: &Path) {
        self.buffer.set_filename(path.to_path_buf());
        self.buffer.select_profile();
        match fs::read_to_string(path) {
            Ok(content) => {
                self.buffer.load_lines(content.lines());
                debug!(target: "io", file = %path.display(), rows = self.buffer.row_count(), "file_opened");
            }
            Err(e) => {
                warn!(target: "io", file = %path.display(), %e, "file_open_failed");
                self.set_status_message(format!("Can't open {}: {}", path.display(), e));
            }
        }
    }

    /// One render-then-read cycle at a time until the quit combination
    /// lands.
    pub fn run(&mut self) -> Result<(), TerminalError> {
        while !self.should_close {
            self.refresh_screen()?;
            self.process_keypress()?;
        }
        Ok(())
    }

    /// Compose and write one frame. The terminal is re-queried for its
    /// dimensions each cycle; if that fails mid-session the previous
    /// geometry is kept.
    pub fn refresh_screen(&mut self) -> Result<(), TerminalError> {
        if let Ok((rows, cols)) = self.console.window_size() {
            self.view
                .set_screen_size((rows as usize).saturating_sub(2), cols as usize);
        }
        self.view.recompute_scroll(&self.buffer);

        let filename = self
            .buffer
            .filename()
            .map(|p| p.to_string_lossy().into_owned());
        let status = StatusContext {
            filename: filename.as_deref(),
            file_type: self.buffer.profile().map(|p| p.file_type),
            dirty: self.buffer.is_dirty(),
            row_count: self.buffer.row_count(),
            cursor_row: self.view.cursor_row,
        };
        let frame = compose_frame(&self.buffer, &self.view, &status, self.message_text());
        self.console.write(frame.as_bytes())
    }

    /// Decode one key and dispatch it. Any key other than the quit
    /// combination re-arms the quit-confirmation countdown.
    pub fn process_keypress(&mut self) -> Result<(), TerminalError> {
        let key = self.console.read_key()?;

        if key == KeyEvent::Ctrl('q') {
            return self.handle_quit();
        }

        match key {
            KeyEvent::Enter => self.insert_newline(),
            KeyEvent::Ctrl('s') => self.save()?,
            KeyEvent::Ctrl('f') => self.find()?,
            KeyEvent::Backspace | KeyEvent::Ctrl('h') => self.delete_char(),
            KeyEvent::Delete => {
                self.view.move_cursor(&self.buffer, Direction::Right);
                self.delete_char();
            }
            KeyEvent::Home => self.view.cursor_col = 0,
            KeyEvent::End => {
                if let Some(row) = self.buffer.row(self.view.cursor_row) {
                    self.view.cursor_col = row.len();
                }
            }
            KeyEvent::ArrowUp => self.view.move_cursor(&self.buffer, Direction::Up),
            KeyEvent::ArrowDown => self.view.move_cursor(&self.buffer, Direction::Down),
            KeyEvent::ArrowLeft => self.view.move_cursor(&self.buffer, Direction::Left),
            KeyEvent::ArrowRight => self.view.move_cursor(&self.buffer, Direction::Right),
            KeyEvent::PageUp => self.view.page_move(&self.buffer, Direction::Up),
            KeyEvent::PageDown => self.view.page_move(&self.buffer, Direction::Down),
            // The screen repaints every cycle anyway.
            KeyEvent::Ctrl('l') | KeyEvent::Escape => {}
            KeyEvent::Char(c) => self.insert_char(c),
            KeyEvent::Ctrl(_) => {}
        }

        self.quit_remaining = self.options.quit_confirm_presses;
        Ok(())
    }

    /// The one deliberate soft block: a dirty buffer requires repeated
    /// intent before unsaved edits are discarded.
    fn handle_quit(&mut self) -> Result<(), TerminalError> {
        if self.buffer.is_dirty() {
            self.quit_remaining = self.quit_remaining.saturating_sub(1);
            if self.quit_remaining > 0 {
                self.set_status_message(format!(
                    "WARNING!!! File has unsaved changes. \
                     Press Ctrl-Q {} more times to quit.",
                    self.quit_remaining
                ));
                return Ok(());
            }
        }
        self.console.write(escape::CLEAR_SCREEN.as_bytes())?;
        self.console.write(escape::CURSOR_HOME.as_bytes())?;
        self.should_close = true;
        debug!(target: "runtime", "editor_closing");
        Ok(())
    }

    fn insert_char(&mut self, c: char) {
        if self.view.cursor_row == self.buffer.row_count() {
            self.buffer.insert_row(self.view.cursor_row, "");
        }
        self.buffer
            .insert_char(self.view.cursor_row, self.view.cursor_col, c);
        self.view.cursor_col += 1;
    }

    fn insert_newline(&mut self) {
        if self.view.cursor_col == 0 {
            self.buffer.insert_row(self.view.cursor_row, "");
        } else {
            self.buffer
                .split_line(self.view.cursor_row, self.view.cursor_col);
        }
        self.view.cursor_row += 1;
        self.view.cursor_col = 0;
    }

    fn delete_char(&mut self) {
        if self.view.cursor_row == self.buffer.row_count() {
            return;
        }
        if self.view.cursor_col == 0 && self.view.cursor_row == 0 {
            return;
        }
        if self.view.cursor_col > 0 {
            self.buffer
                .delete_char(self.view.cursor_row, self.view.cursor_col - 1);
            self.view.cursor_col -= 1;
        } else if let Some(join_col) = self.buffer.join_with_previous(self.view.cursor_row) {
            self.view.cursor_row -= 1;
            self.view.cursor_col = join_col;
        }
    }

    /// Serialize the buffer and hand it to the filesystem. Prompts for a
    /// name first when none is known; a failed write keeps the dirty
    /// counter so unsaved state stays visible.
    fn save(&mut self) -> Result<(), TerminalError> {
        if self.buffer.filename().is_none() {
            match self.prompt("Save as: {} (ESC to cancel)", |_, _, _| {})? {
                Some(name) => {
                    self.buffer.set_filename(PathBuf::from(name));
                    self.buffer.select_profile();
                }
                None => {
                    self.set_status_message("Save aborted");
                    return Ok(());
                }
            }
        }
        let Some(path) = self.buffer.filename().map(Path::to_path_buf) else {
            return Ok(());
        };

        let text = self.buffer.to_document_text();
        match fs::write(&path, &text) {
            Ok(()) => {
                self.buffer.mark_clean();
                debug!(target: "io", file = %path.display(), bytes = text.len(), "file_saved");
                self.set_status_message(format!("{} bytes written to disk", text.len()));
            }
            Err(e) => {
                error!(target: "io", file = %path.display(), %e, "file_save_failed");
                self.set_status_message(format!("Can't save! I/O error: {}", e));
            }
        }
        Ok(())
    }

    /// Modal input line on the message bar. `{}` in the template shows the
    /// pending input; `on_keystroke` runs after every key so callers can
    /// react incrementally (the find workflow). Escape cancels, Enter with
    /// non-empty input confirms.
    fn prompt<F>(&mut self, template: &str, mut on_keystroke: F) -> Result<Option<String>, TerminalError>
    where
        F: FnMut(&mut Self, &str, KeyEvent),
    {
        let mut input = String::new();
        loop {
            self.set_status_message(template.replacen("{}", &input, 1));
            self.refresh_screen()?;

            let key = self.console.read_key()?;
            match key {
                KeyEvent::Backspace | KeyEvent::Ctrl('h') | KeyEvent::Delete => {
                    input.pop();
                }
                KeyEvent::Escape => {
                    self.set_status_message("");
                    on_keystroke(self, &input, key);
                    return Ok(None);
                }
                KeyEvent::Enter if !input.is_empty() => {
                    self.set_status_message("");
                    on_keystroke(self, &input, key);
                    return Ok(Some(input));
                }
                KeyEvent::Char(c) if c.is_ascii() && !c.is_control() => input.push(c),
                _ => {}
            }
            on_keystroke(self, &input, key);
        }
    }
}

//! Incremental search over the buffer's render text.
//!
//! Search state is explicit and owned by the operation: the last matched
//! row, the travel direction, and the saved highlight classes of the
//! currently painted match. Every prompt keystroke re-runs the search in
//! circular row order; arrows flip the direction, any edit restarts from
//! the cursor row.

use core_syntax::Highlight;
use core_terminal::{Console, KeyEvent, TerminalError};
use tracing::trace;

use crate::Editor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum FindDirection {
    #[default]
    Forward,
    Backward,
}

#[derive(Default)]
pub(crate) struct FindState {
    pub(crate) last_match: Option<usize>,
    pub(crate) direction: FindDirection,
    /// Highlight classes replaced by the Match paint, restored on the next
    /// keystroke.
    pub(crate) saved_hl: Option<(usize, Vec<Highlight>)>,
}

impl FindState {
    fn reset(&mut self) {
        self.last_match = None;
        self.direction = FindDirection::Forward;
    }
}

impl<C: Console> Editor<C> {
    /// Prompt for a search term, relocating the cursor to matches as the
    /// term is typed. Cancelling restores the cursor and scroll position;
    /// confirming leaves the cursor on the last match.
    pub fn find(&mut self) -> Result<(), TerminalError> {
        let saved_cursor = (self.view.cursor_row, self.view.cursor_col);
        let saved_offsets = (self.view.row_offset, self.view.col_offset);

        let query = self.prompt(
            "Search: {} (Use Arrows/Enter; ESC to cancel)",
            Self::find_keystroke,
        )?;

        if query.is_none() {
            (self.view.cursor_row, self.view.cursor_col) = saved_cursor;
            (self.view.row_offset, self.view.col_offset) = saved_offsets;
        }
        self.finding = FindState::default();
        Ok(())
    }

    fn find_keystroke(&mut self, query: &str, key: KeyEvent) {
        if let Some((row, saved)) = self.finding.saved_hl.take() {
            self.buffer.restore_highlight(row, saved);
        }

        match key {
            KeyEvent::Enter | KeyEvent::Escape => {
                self.finding.reset();
                return;
            }
            KeyEvent::ArrowRight | KeyEvent::ArrowDown => {
                self.finding.direction = FindDirection::Forward;
            }
            KeyEvent::ArrowLeft | KeyEvent::ArrowUp => {
                self.finding.direction = FindDirection::Backward;
            }
            _ => self.finding.reset(),
        }

        let row_count = self.buffer.row_count();
        if query.is_empty() || row_count == 0 {
            return;
        }

        let direction = self.finding.direction;
        let step = |y: usize| match direction {
            FindDirection::Forward => {
                if y + 1 == row_count {
                    0
                } else {
                    y + 1
                }
            }
            FindDirection::Backward => {
                if y == 0 {
                    row_count - 1
                } else {
                    y - 1
                }
            }
        };

        let needle: Vec<char> = query.chars().collect();
        // Continue just past the previous match, or start the scan at the
        // cursor row for a fresh term.
        let mut y = match self.finding.last_match {
            Some(m) => step(m),
            None => self.view.cursor_row.min(row_count - 1),
        };

        for _ in 0..row_count {
            if let Some(row) = self.buffer.row(y)
                && let Some(rx) = row.find(&needle)
            {
                let cx = row.rx_to_cx(rx, self.buffer.tab_stop());
                self.finding.last_match = Some(y);
                self.view.cursor_row = y;
                self.view.cursor_col = cx;
                // Force the next scroll recomputation to bring the matched
                // row to the top of the viewport.
                self.view.row_offset = row_count;
                if let Some(saved) = self.buffer.highlight_match(y, rx, needle.len()) {
                    self.finding.saved_hl = Some((y, saved));
                }
                trace!(target: "find", row = y, render_col = rx, "match");
                return;
            }
            y = step(y);
        }
    }
}

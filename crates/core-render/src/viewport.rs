//! Cursor and scroll state: which rectangle of the buffer is visible.
//!
//! `cursor_col` indexes the row's content characters and may equal the
//! row's length ("after last character"); `render_col` is the same column
//! in tab-expanded render coordinates. `cursor_row` may equal the row count
//! to represent the append position past the last line. After every
//! [`recompute_scroll`](Viewport::recompute_scroll) the offsets satisfy
//! `row_offset <= cursor_row < row_offset + screen_rows` and
//! `col_offset <= render_col < col_offset + screen_cols`.

use core_buffer::{Row, TextBuffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub render_col: usize,
    pub row_offset: usize,
    pub col_offset: usize,
    pub screen_rows: usize,
    pub screen_cols: usize,
}

impl Viewport {
    pub fn new(screen_rows: usize, screen_cols: usize) -> Self {
        Self {
            cursor_row: 0,
            cursor_col: 0,
            render_col: 0,
            row_offset: 0,
            col_offset: 0,
            screen_rows: screen_rows.max(1),
            screen_cols: screen_cols.max(1),
        }
    }

    pub fn set_screen_size(&mut self, rows: usize, cols: usize) {
        self.screen_rows = rows.max(1);
        self.screen_cols = cols.max(1);
    }

    /// Derive `render_col` from `cursor_col` with the same tab rule the
    /// buffer uses for render regeneration.
    pub fn recompute_render_column(&mut self, buffer: &TextBuffer) {
        self.render_col = match buffer.row(self.cursor_row) {
            Some(row) => row.cx_to_rx(self.cursor_col, buffer.tab_stop()),
            None => 0,
        };
    }

    /// Minimally adjust the offsets so the cursor stays inside the
    /// viewport.
    pub fn recompute_scroll(&mut self, buffer: &TextBuffer) {
        self.recompute_render_column(buffer);

        if self.cursor_row < self.row_offset {
            self.row_offset = self.cursor_row;
        }
        if self.cursor_row >= self.row_offset + self.screen_rows {
            self.row_offset = self.cursor_row + 1 - self.screen_rows;
        }
        if self.render_col < self.col_offset {
            self.col_offset = self.render_col;
        }
        if self.render_col >= self.col_offset + self.screen_cols {
            self.col_offset = self.render_col + 1 - self.screen_cols;
        }
    }

    /// One cursor step. Left at column zero moves to the end of the
    /// previous row; Right at the end of a row moves to the start of the
    /// next (possibly one past the last row). The column snaps to the
    /// target row's length afterwards.
    pub fn move_cursor(&mut self, buffer: &TextBuffer, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.cursor_col > 0 {
                    self.cursor_col -= 1;
                } else if self.cursor_row > 0 {
                    self.cursor_row -= 1;
                    self.cursor_col = buffer.row(self.cursor_row).map_or(0, Row::len);
                }
            }
            Direction::Right => {
                if let Some(row) = buffer.row(self.cursor_row) {
                    if self.cursor_col < row.len() {
                        self.cursor_col += 1;
                    } else {
                        self.cursor_row += 1;
                        self.cursor_col = 0;
                    }
                }
            }
            Direction::Up => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
            }
            Direction::Down => {
                if self.cursor_row + 1 < buffer.row_count() {
                    self.cursor_row += 1;
                }
            }
        }

        let len = buffer.row(self.cursor_row).map_or(0, Row::len);
        if self.cursor_col > len {
            self.cursor_col = len;
        }
    }

    /// Page motion: relocate to the top/bottom of the current viewport,
    /// then repeat a single vertical step `screen_rows` times so the page
    /// scrolls line by line instead of jumping.
    pub fn page_move(&mut self, buffer: &TextBuffer, direction: Direction) {
        match direction {
            Direction::Up => {
                self.cursor_row = self.row_offset;
            }
            Direction::Down => {
                self.cursor_row = (self.row_offset + self.screen_rows - 1).min(buffer.row_count());
            }
            Direction::Left | Direction::Right => return,
        }
        for _ in 0..self.screen_rows {
            self.move_cursor(buffer, direction);
        }
    }
}

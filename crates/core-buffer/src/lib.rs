//! The in-memory document: an ordered sequence of rows plus an edit
//! counter.
//!
//! All structural edits live here and every mutation funnels through a
//! single commit step that regenerates the affected row's render text and
//! highlight classes before returning, so no caller can observe a row with
//! stale derived fields. Indices are 0-based and clamped; out-of-range
//! operations degrade to no-ops instead of panicking.

use std::path::{Path, PathBuf};

use core_syntax::{Highlight, SyntaxProfile, detect};
use tracing::debug;

mod row;

pub use row::Row;

pub struct TextBuffer {
    rows: Vec<Row>,
    /// Count of unsaved mutations since the last successful save; zero
    /// means clean.
    dirty: u64,
    tab_stop: usize,
    profile: Option<&'static SyntaxProfile>,
    filename: Option<PathBuf>,
}

impl TextBuffer {
    pub fn new(tab_stop: usize) -> Self {
        Self {
            rows: Vec::new(),
            dirty: 0,
            tab_stop: tab_stop.max(1),
            profile: None,
            filename: None,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn tab_stop(&self) -> usize {
        self.tab_stop
    }

    pub fn dirty(&self) -> u64 {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty > 0
    }

    /// Reset the edit counter after a successful save or a fresh load.
    pub fn mark_clean(&mut self) {
        self.dirty = 0;
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn set_filename(&mut self, filename: PathBuf) {
        self.filename = Some(filename);
    }

    pub fn profile(&self) -> Option<&'static SyntaxProfile> {
        self.profile
    }

    /// Re-select the syntax profile from the current filename and
    /// re-highlight every row under it.
    pub fn select_profile(&mut self) {
        self.profile = self
            .filename
            .as_ref()
            .and_then(|path| detect(&path.to_string_lossy()));
        debug!(
            target: "buffer",
            file_type = self.profile.map(|p| p.file_type),
            "profile_selected"
        );
        for at in 0..self.rows.len() {
            self.commit(at);
        }
    }

    /// Populate from an external line source (one row per line), then mark
    /// the buffer clean.
    pub fn load_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.insert_row(self.rows.len(), line.as_ref());
        }
        self.dirty = 0;
    }

    /// Insert a new row at `at` (clamped; `at == row_count` appends).
    pub fn insert_row(&mut self, at: usize, text: &str) {
        let at = at.min(self.rows.len());
        self.rows.insert(at, Row::new(text));
        self.commit(at);
        self.dirty += 1;
    }

    /// Remove the row at `at`; no-op when out of range.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty += 1;
    }

    /// Insert one character at `(row, col)`, `col` clamped to the row's
    /// length. No-op when `row` does not exist.
    pub fn insert_char(&mut self, row: usize, col: usize, c: char) {
        if row >= self.rows.len() {
            return;
        }
        self.rows[row].insert_char(col, c);
        self.commit(row);
        self.dirty += 1;
    }

    /// Delete the character at `(row, at)`; the controller passes
    /// `col - 1` for a backspace. No-op when the position is invalid.
    pub fn delete_char(&mut self, row: usize, at: usize) {
        if row >= self.rows.len() {
            return;
        }
        if self.rows[row].delete_char(at) {
            self.commit(row);
            self.dirty += 1;
        }
    }

    /// Truncate `row` at `col` and insert the remainder as a new row
    /// directly below.
    pub fn split_line(&mut self, row: usize, col: usize) {
        if row >= self.rows.len() {
            return;
        }
        let tail = self.rows[row].split_off(col);
        self.commit(row);
        self.insert_row(row + 1, &tail);
    }

    /// Append `row`'s content onto the previous row and delete `row`
    /// (backspace at column zero). Returns the join column on the previous
    /// row, `None` when there is no previous row.
    pub fn join_with_previous(&mut self, row: usize) -> Option<usize> {
        if row == 0 || row >= self.rows.len() {
            return None;
        }
        let join_col = self.rows[row - 1].len();
        let text = self.rows[row].text();
        self.rows[row - 1].append_text(&text);
        self.commit(row - 1);
        self.dirty += 1;
        self.delete_row(row);
        Some(join_col)
    }

    /// The canonical persisted form: every row's content followed by a
    /// newline, in row order.
    pub fn to_document_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&row.text());
            out.push('\n');
        }
        out
    }

    /// Paint the Match class over `[start, start + len)` of a row's render
    /// span and return the previous classes for later restoration.
    pub fn highlight_match(&mut self, row: usize, start: usize, len: usize) -> Option<Vec<Highlight>> {
        let target = self.rows.get_mut(row)?;
        let saved = target.highlight().to_vec();
        target.paint(start, len, Highlight::Match);
        Some(saved)
    }

    /// Restore highlight classes saved by
    /// [`highlight_match`](Self::highlight_match). Ignored when the row has
    /// since changed shape.
    pub fn restore_highlight(&mut self, row: usize, saved: Vec<Highlight>) {
        if let Some(target) = self.rows.get_mut(row) {
            target.set_highlight(saved);
        }
    }

    /// Regenerate the derived fields of one row. Every mutation above calls
    /// this before returning control.
    fn commit(&mut self, at: usize) {
        let profile = self.profile;
        self.rows[at].update(self.tab_stop, profile);
    }
}

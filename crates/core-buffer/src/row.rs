//! A single document line and its derived representations.

use core_syntax::{Highlight, SyntaxProfile, highlight};

/// One line of the document. `chars` is the authoritative content; `render`
/// is the tab-expanded display text and `hl` holds one highlight class per
/// render character. The derived fields are regenerated by the buffer's
/// commit step after every mutation, never patched incrementally.
#[derive(Debug, Clone, Default)]
pub struct Row {
    chars: Vec<char>,
    render: Vec<char>,
    hl: Vec<Highlight>,
}

impl Row {
    pub(crate) fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            render: Vec::new(),
            hl: Vec::new(),
        }
    }

    /// Regenerate `render` from `chars`, then `hl` from `render`. A tab
    /// expands to 1..=tab_stop spaces so the next render index lands on a
    /// multiple of `tab_stop`; everything else maps 1:1.
    pub(crate) fn update(&mut self, tab_stop: usize, profile: Option<&SyntaxProfile>) {
        self.render.clear();
        for &c in &self.chars {
            if c == '\t' {
                self.render.push(' ');
                while self.render.len() % tab_stop != 0 {
                    self.render.push(' ');
                }
            } else {
                self.render.push(c);
            }
        }
        self.hl = highlight(&self.render, profile);
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn render(&self) -> &[char] {
        &self.render
    }

    pub fn highlight(&self) -> &[Highlight] {
        &self.hl
    }

    /// Content length in characters.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn render_len(&self) -> usize {
        self.render.len()
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    /// Map a content column to its render column.
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize {
        let mut rx = 0;
        for &c in self.chars.iter().take(cx) {
            if c == '\t' {
                rx += (tab_stop - 1) - (rx % tab_stop);
            }
            rx += 1;
        }
        rx
    }

    /// Inverse of [`cx_to_rx`](Self::cx_to_rx): the content column whose
    /// render position covers `rx`.
    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize {
        let mut cur_rx = 0;
        for (cx, &c) in self.chars.iter().enumerate() {
            if c == '\t' {
                cur_rx += (tab_stop - 1) - (cur_rx % tab_stop);
            }
            cur_rx += 1;
            if cur_rx > rx {
                return cx;
            }
        }
        self.chars.len()
    }

    /// First occurrence of `needle` in the render text, as a render column.
    pub fn find(&self, needle: &[char]) -> Option<usize> {
        if needle.is_empty() || needle.len() > self.render.len() {
            return None;
        }
        self.render.windows(needle.len()).position(|w| w == needle)
    }

    pub(crate) fn insert_char(&mut self, at: usize, c: char) {
        let at = at.min(self.chars.len());
        self.chars.insert(at, c);
    }

    pub(crate) fn delete_char(&mut self, at: usize) -> bool {
        if at >= self.chars.len() {
            return false;
        }
        self.chars.remove(at);
        true
    }

    pub(crate) fn split_off(&mut self, at: usize) -> String {
        let at = at.min(self.chars.len());
        let tail: String = self.chars[at..].iter().collect();
        self.chars.truncate(at);
        tail
    }

    pub(crate) fn append_text(&mut self, text: &str) {
        self.chars.extend(text.chars());
    }

    pub(crate) fn paint(&mut self, start: usize, len: usize, class: Highlight) {
        let start = start.min(self.hl.len());
        let end = (start + len).min(self.hl.len());
        for slot in &mut self.hl[start..end] {
            *slot = class;
        }
    }

    pub(crate) fn set_highlight(&mut self, hl: Vec<Highlight>) {
        if hl.len() == self.render.len() {
            self.hl = hl;
        }
    }
}

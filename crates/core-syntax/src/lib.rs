//! Per-character syntax classification of a row's render text.
//!
//! [`highlight`] is a pure function: one left-to-right scan over the
//! tab-expanded render characters, O(n) in render length. It is re-run by
//! the buffer after every row content change. The Match class is never
//! produced here; incremental search paints it over a row's classes and
//! restores them from a saved copy.

use bitflags::bitflags;

pub mod profile;

pub use profile::{PROFILES, SyntaxProfile, detect};

bitflags! {
    /// Per-profile toggles for the optional scan passes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct HighlightFlags: u8 {
        const NUMBERS = 1 << 0;
        const STRINGS = 1 << 1;
    }
}

/// Highlight class of a single render character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Normal,
    Comment,
    Keyword1,
    Keyword2,
    String,
    Number,
    Match,
}

impl Highlight {
    /// ANSI SGR color code for this class. Normal text is drawn with the
    /// terminal's default foreground; 37 is the table's fallback.
    pub fn color(self) -> u8 {
        match self {
            Highlight::Comment => 36,
            Highlight::Keyword1 => 33,
            Highlight::Keyword2 => 32,
            Highlight::String => 35,
            Highlight::Number => 31,
            Highlight::Match => 34,
            Highlight::Normal => 37,
        }
    }
}

/// Token boundary characters: whitespace, NUL, and a fixed punctuation set.
pub fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\0' || ",.()+-/*=~%<>[];".contains(c)
}

/// Classify every character of `render` under `profile`. With no profile
/// everything is Normal.
pub fn highlight(render: &[char], profile: Option<&SyntaxProfile>) -> Vec<Highlight> {
    let mut hl = vec![Highlight::Normal; render.len()];
    let Some(profile) = profile else {
        return hl;
    };

    let comment_start = profile.singleline_comment_start.unwrap_or("");
    let mut prev_sep = true;
    let mut in_string: Option<char> = None;

    let mut i = 0;
    while i < render.len() {
        let c = render[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { Highlight::Normal };

        if !comment_start.is_empty()
            && in_string.is_none()
            && starts_with_at(render, i, comment_start)
        {
            for slot in &mut hl[i..] {
                *slot = Highlight::Comment;
            }
            break;
        }

        if profile.flags.contains(HighlightFlags::STRINGS) {
            if let Some(quote) = in_string {
                hl[i] = Highlight::String;
                if c == '\\' && i + 1 < render.len() {
                    hl[i + 1] = Highlight::String;
                    i += 2;
                    continue;
                }
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            } else if c == '"' || c == '\'' {
                in_string = Some(c);
                hl[i] = Highlight::String;
                i += 1;
                continue;
            }
        }

        // Heuristic digit scan, not a numeric-literal grammar: a digit
        // continues a run started after any separator, and '.' extends one.
        if profile.flags.contains(HighlightFlags::NUMBERS)
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == Highlight::Number))
                || (c == '.' && prev_hl == Highlight::Number))
        {
            hl[i] = Highlight::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        if prev_sep && let Some((klen, class)) = longest_keyword_at(render, i, profile) {
            for slot in &mut hl[i..i + klen] {
                *slot = class;
            }
            i += klen;
            prev_sep = false;
            continue;
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    hl
}

/// Longest configured keyword matching as a whole token at `at` (next
/// character must be a separator or end of line). Trailing `|` in the table
/// marks the secondary class.
fn longest_keyword_at(
    render: &[char],
    at: usize,
    profile: &SyntaxProfile,
) -> Option<(usize, Highlight)> {
    let mut best: Option<(usize, Highlight)> = None;
    for entry in profile.keywords {
        let (word, class) = match entry.strip_suffix('|') {
            Some(word) => (word, Highlight::Keyword2),
            None => (*entry, Highlight::Keyword1),
        };
        let klen = word.chars().count();
        if starts_with_at(render, at, word)
            && render.get(at + klen).is_none_or(|&next| is_separator(next))
            && best.is_none_or(|(blen, _)| klen > blen)
        {
            best = Some((klen, class));
        }
    }
    best
}

fn starts_with_at(render: &[char], at: usize, word: &str) -> bool {
    let mut idx = at;
    for wc in word.chars() {
        match render.get(idx) {
            Some(&c) if c == wc => idx += 1,
            _ => return false,
        }
    }
    true
}

//! Status bar composition.
//!
//! The bar is exactly `width` characters: a left segment (file name
//! truncated to 20 chars, line count, modified marker), space padding, and
//! a right segment (file-type label and cursor position) emitted only when
//! it lands flush against the right edge.

/// What the status bar needs to know about the session.
pub struct StatusContext<'a> {
    pub filename: Option<&'a str>,
    pub file_type: Option<&'a str>,
    pub dirty: bool,
    pub row_count: usize,
    /// 0-based; displayed 1-based.
    pub cursor_row: usize,
}

pub fn build_status_bar(ctx: &StatusContext<'_>, width: usize) -> String {
    let name: String = ctx
        .filename
        .unwrap_or("[No Name]")
        .chars()
        .take(20)
        .collect();
    let left = format!(
        "{} - {} lines {}",
        name,
        ctx.row_count,
        if ctx.dirty { "(modified)" } else { "" }
    );
    let right = format!(
        "{} | {}/{}",
        ctx.file_type.unwrap_or("no ft"),
        ctx.cursor_row + 1,
        ctx.row_count
    );
    let right_len = right.chars().count();

    let mut bar: String = left.chars().take(width).collect();
    let mut used = bar.chars().count();
    while used < width {
        if width - used == right_len {
            bar.push_str(&right);
            break;
        }
        bar.push(' ');
        used += 1;
    }
    bar
}

//! Frame composition: one refresh cycle's terminal output as a single
//! contiguous string.
//!
//! Building the whole frame before writing keeps redraw flicker-free: hide
//! cursor, home, visible content rows (colors emitted only at class
//! boundaries), status bar, message bar, absolute cursor placement, show
//! cursor. Every line ends with erase-in-line before the newline so a
//! shorter frame never leaves stale characters from a longer one.

use core_buffer::TextBuffer;
use core_syntax::Highlight;
use core_terminal::escape;

use crate::status::{StatusContext, build_status_bar};
use crate::viewport::Viewport;

const WELCOME: &str = concat!("Joule editor -- version ", env!("CARGO_PKG_VERSION"));

/// Compose a full frame. The caller has already run
/// [`Viewport::recompute_scroll`].
pub fn compose_frame(
    buffer: &TextBuffer,
    view: &Viewport,
    status: &StatusContext<'_>,
    message: Option<&str>,
) -> String {
    let mut frame = String::with_capacity(view.screen_rows * (view.screen_cols + 8));

    frame.push_str(escape::HIDE_CURSOR);
    frame.push_str(escape::CURSOR_HOME);

    draw_rows(buffer, view, &mut frame);
    draw_status_bar(status, view.screen_cols, &mut frame);
    draw_message_bar(message, view.screen_cols, &mut frame);

    let cursor_row = (view.cursor_row.saturating_sub(view.row_offset) + 1) as u16;
    let cursor_col = (view.render_col.saturating_sub(view.col_offset) + 1) as u16;
    frame.push_str(&escape::cursor_goto(cursor_row, cursor_col));
    frame.push_str(escape::SHOW_CURSOR);

    tracing::trace!(
        target: "render",
        bytes = frame.len(),
        rows = view.screen_rows,
        "frame_composed"
    );
    frame
}

fn draw_rows(buffer: &TextBuffer, view: &Viewport, frame: &mut String) {
    for y in 0..view.screen_rows {
        let file_row = y + view.row_offset;
        match buffer.row(file_row) {
            None => {
                if buffer.row_count() == 0 && y == view.screen_rows / 3 {
                    draw_welcome_banner(view.screen_cols, frame);
                } else {
                    frame.push('~');
                }
            }
            Some(row) => {
                let render = row.render();
                let hl = row.highlight();
                let start = view.col_offset.min(render.len());
                let end = (view.col_offset + view.screen_cols).min(render.len());

                let mut current_color: Option<u8> = None;
                for at in start..end {
                    if hl[at] == Highlight::Normal {
                        if current_color.is_some() {
                            frame.push_str(escape::SGR_DEFAULT_FG);
                            current_color = None;
                        }
                    } else {
                        let color = hl[at].color();
                        if current_color != Some(color) {
                            frame.push_str(&escape::sgr_color(color));
                            current_color = Some(color);
                        }
                    }
                    frame.push(render[at]);
                }
                frame.push_str(escape::SGR_DEFAULT_FG);
            }
        }
        frame.push_str(escape::ERASE_IN_LINE);
        frame.push_str("\r\n");
    }
}

fn draw_welcome_banner(width: usize, frame: &mut String) {
    let banner: String = WELCOME.chars().take(width).collect();
    let mut padding = (width - banner.chars().count()) / 2;
    if padding > 0 {
        frame.push('~');
        padding -= 1;
    }
    for _ in 0..padding {
        frame.push(' ');
    }
    frame.push_str(&banner);
}

fn draw_status_bar(status: &StatusContext<'_>, width: usize, frame: &mut String) {
    frame.push_str(escape::SGR_REVERSE);
    frame.push_str(&build_status_bar(status, width));
    frame.push_str(escape::SGR_RESET);
    frame.push_str(escape::ERASE_IN_LINE);
    frame.push_str("\r\n");
}

fn draw_message_bar(message: Option<&str>, width: usize, frame: &mut String) {
    frame.push_str(escape::ERASE_IN_LINE);
    if let Some(message) = message {
        frame.extend(message.chars().take(width));
    }
}

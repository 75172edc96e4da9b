//! The exact escape vocabulary spoken to the terminal emulator.
//!
//! Frame composition concatenates these verbatim; keep them byte-for-byte
//! stable, terminal emulators are matched against this exact dialect.

pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";
pub const CURSOR_HOME: &str = "\x1b[H";
pub const CLEAR_SCREEN: &str = "\x1b[2J";
pub const ERASE_IN_LINE: &str = "\x1b[K";
pub const SGR_RESET: &str = "\x1b[m";
pub const SGR_REVERSE: &str = "\x1b[7m";
pub const SGR_DEFAULT_FG: &str = "\x1b[39m";

/// Request a cursor position report; the terminal answers `ESC[{row};{col}R`.
pub const CURSOR_POSITION_REPORT: &str = "\x1b[6n";

/// Move the cursor as far right and down as the terminal allows; used with
/// [`CURSOR_POSITION_REPORT`] as the geometry fallback.
pub const CURSOR_MAX_FORWARD_DOWN: &str = "\x1b[999C\x1b[999B";

/// Absolute cursor placement, 1-based.
pub fn cursor_goto(row: u16, col: u16) -> String {
    format!("\x1b[{row};{col}H")
}

/// Select graphic rendition with a numbered color code.
pub fn sgr_color(code: u8) -> String {
    format!("\x1b[{code}m")
}

//! Terminal control layer: raw/cooked mode transitions, geometry queries,
//! and raw keystroke decoding.
//!
//! The driver owns the controlling terminal's termios state. Raw mode is
//! entered through an idempotent transition guarded by an RAII handle, and a
//! process-wide snapshot of the cooked attributes backs a last-resort
//! restore (`force_cooked_mode`) that the binary wires into its panic hook:
//! the terminal must never be left in raw mode after the process ends.
//!
//! Input is read byte-wise with `VMIN = 0` / `VTIME = 1`, so a read returns
//! immediately when input is pending and within ~100ms otherwise. The key
//! decoder in [`keys`] sits on top of that bounded read.

use std::io::Write as _;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use rustix::termios::{
    ControlModes, InputModes, LocalModes, OptionalActions, OutputModes, SpecialCodeIndex, Termios,
    tcgetattr, tcgetwinsize, tcsetattr,
};
use thiserror::Error;
use tracing::{debug, trace, warn};

pub mod escape;
pub mod keys;

pub use keys::{ByteSource, KeyEvent, decode_key};

#[derive(Debug, Error)]
pub enum TerminalError {
    /// Terminal dimensions could not be determined by any method. Fatal at
    /// startup; rendering requires known bounds.
    #[error("terminal geometry unavailable")]
    GeometryUnavailable,
    /// A raw/cooked mode transition failed.
    #[error("failed to change terminal mode: {0}")]
    Mode(#[source] std::io::Error),
    /// A cursor position report came back malformed.
    #[error("malformed cursor position report")]
    Protocol,
    #[error("terminal i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Cooked-mode attributes captured at first raw entry, shared with the
/// last-resort restore path. The original attributes survive a panic because
/// the snapshot lives for the whole process.
static COOKED_SNAPSHOT: Mutex<Option<Termios>> = Mutex::new(None);

/// True while the terminal is (or may be) in raw mode.
static RESTORE_NEEDED: AtomicBool = AtomicBool::new(false);

/// Force cooked-mode attributes back onto the terminal regardless of driver
/// state. Safe to call from a panic hook; idempotent.
pub fn force_cooked_mode() {
    if !RESTORE_NEEDED.swap(false, Ordering::SeqCst) {
        return;
    }
    if let Ok(snapshot) = COOKED_SNAPSHOT.lock()
        && let Some(cooked) = snapshot.as_ref()
    {
        let _ = tcsetattr(rustix::stdio::stdin(), OptionalActions::Flush, cooked);
    }
}

/// Abstraction over the interactive console, implemented by
/// [`TerminalDriver`] for a real tty and by scripted doubles in tests.
pub trait Console {
    /// Block (bounded by the raw-mode read timeout, retried internally)
    /// until one logical key is available.
    fn read_key(&mut self) -> Result<KeyEvent, TerminalError>;
    /// Current terminal dimensions as `(rows, columns)`.
    fn window_size(&mut self) -> Result<(u16, u16), TerminalError>;
    /// Write a composed frame (or any byte sequence) verbatim.
    fn write(&mut self, bytes: &[u8]) -> Result<(), TerminalError>;
}

impl<C: Console + ?Sized> Console for &mut C {
    fn read_key(&mut self) -> Result<KeyEvent, TerminalError> {
        (**self).read_key()
    }

    fn window_size(&mut self) -> Result<(u16, u16), TerminalError> {
        (**self).window_size()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TerminalError> {
        (**self).write(bytes)
    }
}

pub struct TerminalDriver {
    cooked: Termios,
    raw: bool,
}

/// RAII guard ensuring cooked mode is restored even if the caller
/// early-returns or panics.
pub struct RawModeGuard<'a> {
    driver: &'a mut TerminalDriver,
    active: bool,
}

impl TerminalDriver {
    /// Capture the current (cooked) attributes of stdin. Fails when stdin is
    /// not a terminal.
    pub fn new() -> Result<Self, TerminalError> {
        let cooked = tcgetattr(rustix::stdio::stdin())
            .map_err(|e| TerminalError::Mode(std::io::Error::from(e)))?;
        Ok(Self { cooked, raw: false })
    }

    /// Switch the terminal into raw mode. Calling this twice without an
    /// intervening [`leave_raw_mode`](Self::leave_raw_mode) is a no-op.
    pub fn enter_raw_mode(&mut self) -> Result<(), TerminalError> {
        if self.raw {
            return Ok(());
        }

        let mut raw = self.cooked.clone();
        raw.input_modes &= !(InputModes::BRKINT
            | InputModes::ICRNL
            | InputModes::INPCK
            | InputModes::ISTRIP
            | InputModes::IXON);
        raw.output_modes &= !OutputModes::OPOST;
        raw.control_modes |= ControlModes::CS8;
        raw.local_modes &=
            !(LocalModes::ECHO | LocalModes::ICANON | LocalModes::IEXTEN | LocalModes::ISIG);
        // read() returns as soon as any input is available, or after 100ms.
        raw.special_codes[SpecialCodeIndex::VMIN] = 0;
        raw.special_codes[SpecialCodeIndex::VTIME] = 1;

        tcsetattr(rustix::stdio::stdin(), OptionalActions::Flush, &raw)
            .map_err(|e| TerminalError::Mode(std::io::Error::from(e)))?;

        if let Ok(mut snapshot) = COOKED_SNAPSHOT.lock()
            && snapshot.is_none()
        {
            *snapshot = Some(self.cooked.clone());
        }
        RESTORE_NEEDED.store(true, Ordering::SeqCst);
        self.raw = true;
        debug!(target: "terminal", "raw_mode_entered");
        Ok(())
    }

    /// Restore the original cooked attributes. Idempotent.
    pub fn leave_raw_mode(&mut self) -> Result<(), TerminalError> {
        if !self.raw {
            return Ok(());
        }
        tcsetattr(rustix::stdio::stdin(), OptionalActions::Flush, &self.cooked)
            .map_err(|e| TerminalError::Mode(std::io::Error::from(e)))?;
        RESTORE_NEEDED.store(false, Ordering::SeqCst);
        self.raw = false;
        debug!(target: "terminal", "raw_mode_left");
        Ok(())
    }

    /// Enter raw mode and return a guard that leaves it on drop.
    pub fn raw_guard(&mut self) -> Result<RawModeGuard<'_>, TerminalError> {
        self.enter_raw_mode()?;
        Ok(RawModeGuard {
            driver: self,
            active: true,
        })
    }

    /// One bounded read of a single byte. `None` means the VTIME window
    /// expired with no input.
    fn read_byte(&mut self) -> Result<Option<u8>, TerminalError> {
        let mut buf = [0u8; 1];
        match rustix::io::read(rustix::stdio::stdin(), &mut buf[..]) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            // Some platforms report a timed-out raw read as EAGAIN instead
            // of a zero-byte read.
            Err(e) if e == rustix::io::Errno::AGAIN || e == rustix::io::Errno::INTR => Ok(None),
            Err(e) => Err(TerminalError::Io(std::io::Error::from(e))),
        }
    }

    /// Report the cursor position as `(row, column)` using the device
    /// status report escape exchange.
    pub fn cursor_position(&mut self) -> Result<(u16, u16), TerminalError> {
        Console::write(self, escape::CURSOR_POSITION_REPORT.as_bytes())?;

        let mut response = Vec::with_capacity(16);
        loop {
            match self.read_byte()? {
                Some(b'R') => break,
                Some(b) => {
                    response.push(b);
                    if response.len() > 32 {
                        return Err(TerminalError::Protocol);
                    }
                }
                None => return Err(TerminalError::Protocol),
            }
        }

        parse_position_report(&response).ok_or(TerminalError::Protocol)
    }
}

/// Parse the body of `ESC [ row ; col` (the terminating `R` already
/// consumed).
fn parse_position_report(bytes: &[u8]) -> Option<(u16, u16)> {
    let body = bytes.strip_prefix(b"\x1b[")?;
    let body = std::str::from_utf8(body).ok()?;
    let (rows, cols) = body.split_once(';')?;
    Some((rows.parse().ok()?, cols.parse().ok()?))
}

impl Console for TerminalDriver {
    fn read_key(&mut self) -> Result<KeyEvent, TerminalError> {
        decode_key(self)
    }

    fn window_size(&mut self) -> Result<(u16, u16), TerminalError> {
        match tcgetwinsize(rustix::stdio::stdout()) {
            Ok(ws) if ws.ws_col != 0 => Ok((ws.ws_row, ws.ws_col)),
            _ => {
                // Fallback: park the cursor at the extreme bottom-right and
                // ask the terminal where it ended up.
                warn!(target: "terminal", "winsize_ioctl_failed_using_fallback");
                Console::write(self, escape::CURSOR_MAX_FORWARD_DOWN.as_bytes())?;
                self.cursor_position()
                    .map_err(|_| TerminalError::GeometryUnavailable)
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TerminalError> {
        let mut out = std::io::stdout().lock();
        out.write_all(bytes)?;
        out.flush()?;
        Ok(())
    }
}

impl ByteSource for TerminalDriver {
    fn next_byte(&mut self) -> Result<Option<u8>, TerminalError> {
        self.read_byte()
    }
}

impl Drop for TerminalDriver {
    fn drop(&mut self) {
        let _ = self.leave_raw_mode();
    }
}

impl<'a> RawModeGuard<'a> {
    /// Leave raw mode now instead of at drop.
    pub fn release(mut self) -> Result<(), TerminalError> {
        self.active = false;
        self.driver.leave_raw_mode()
    }

    pub fn driver(&mut self) -> &mut TerminalDriver {
        self.driver
    }
}

impl<'a> Drop for RawModeGuard<'a> {
    fn drop(&mut self) {
        if self.active {
            trace!(target: "terminal", "raw_guard_drop");
            let _ = self.driver.leave_raw_mode();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::parse_position_report;

    #[test]
    fn parses_position_report() {
        assert_eq!(parse_position_report(b"\x1b[24;80"), Some((24, 80)));
        assert_eq!(parse_position_report(b"\x1b[1;1"), Some((1, 1)));
    }

    #[test]
    fn rejects_malformed_reports() {
        assert_eq!(parse_position_report(b"24;80"), None);
        assert_eq!(parse_position_report(b"\x1b[24:80"), None);
        assert_eq!(parse_position_report(b"\x1b[;"), None);
        assert_eq!(parse_position_report(b"\x1b[a;b"), None);
    }
}

//! Raw-mode terminal access: attribute save/restore, unbuffered stdin reads
//! with a read timeout, and the screen size query.

use crate::key::ByteSource;
use anyhow::{Context, Result};
use crossterm::{cursor, queue, terminal};
use rustix::io::Errno;
use rustix::termios::{
    self, ControlModes, InputModes, LocalModes, OptionalActions, OutputModes, SpecialCodeIndex,
    Termios,
};
use std::io::{self, Write};

/// Longest cursor position report accepted from the terminal.
const CURSOR_REPORT_MAX: usize = 31;

/// Keeps the terminal in raw mode; the saved attributes are restored on drop.
pub struct RawMode {
    original: Termios,
}

impl RawMode {
    /// Switches stdin to raw mode. Reads return after at most
    /// `read_timeout_ds` tenths of a second, with or without data.
    pub fn enable(read_timeout_ds: u8) -> Result<Self> {
        let stdin = io::stdin();
        let original = termios::tcgetattr(&stdin).context("tcgetattr")?;

        let mut raw = original.clone();
        raw.input_modes.remove(
            InputModes::BRKINT
                | InputModes::ICRNL
                | InputModes::INPCK
                | InputModes::ISTRIP
                | InputModes::IXON,
        );
        raw.output_modes.remove(OutputModes::OPOST);
        raw.control_modes.insert(ControlModes::CS8);
        raw.local_modes.remove(
            LocalModes::ECHO | LocalModes::ICANON | LocalModes::IEXTEN | LocalModes::ISIG,
        );
        raw.special_codes[SpecialCodeIndex::VMIN] = 0;
        raw.special_codes[SpecialCodeIndex::VTIME] = read_timeout_ds.max(1);

        termios::tcsetattr(&stdin, OptionalActions::Flush, &raw).context("tcsetattr")?;
        tracing::debug!(read_timeout_ds, "raw mode enabled");
        Ok(Self { original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let stdin = io::stdin();
        if let Err(err) = termios::tcsetattr(&stdin, OptionalActions::Flush, &self.original) {
            tracing::error!("failed to restore terminal attributes: {err}");
        }
    }
}

/// Unbuffered one-byte reads from stdin.
pub struct StdinBytes {
    stdin: io::Stdin,
}

impl StdinBytes {
    pub fn new() -> Self {
        Self { stdin: io::stdin() }
    }
}

impl Default for StdinBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSource for StdinBytes {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match rustix::io::read(&self.stdin, &mut buf[..]) {
            Ok(1) => Ok(Some(buf[0])),
            Ok(_) => Ok(None),
            Err(err) if err == Errno::AGAIN || err == Errno::INTR => Ok(None),
            Err(err) => Err(io::Error::from(err)).context("read"),
        }
    }
}

/// Returns `(rows, cols)` of the terminal. Falls back to pushing the cursor
/// to the bottom-right corner and asking where it ended up.
pub fn window_size(input: &mut impl ByteSource) -> Result<(u16, u16)> {
    match terminal::size() {
        Ok((cols, rows)) if cols != 0 => return Ok((rows, cols)),
        Ok(_) => tracing::warn!("terminal reported zero columns"),
        Err(err) => tracing::warn!("window size query failed: {err}"),
    }
    query_cursor_position(input).context("getWindowSize")
}

fn query_cursor_position(input: &mut impl ByteSource) -> Result<(u16, u16)> {
    let mut stdout = io::stdout();
    queue!(stdout, cursor::MoveRight(999), cursor::MoveDown(999))?;
    stdout.write_all(b"\x1b[6n")?;
    stdout.flush()?;

    read_cursor_report(input)?.context("unexpected cursor position report")
}

/// Reads a cursor position reply up to the terminating `R`, a timed-out
/// read or `CURSOR_REPORT_MAX` bytes, whichever comes first.
fn read_cursor_report(input: &mut impl ByteSource) -> Result<Option<(u16, u16)>> {
    let mut reply = Vec::with_capacity(CURSOR_REPORT_MAX);
    while reply.len() < CURSOR_REPORT_MAX {
        match input.read_byte()? {
            Some(b'R') | None => break,
            Some(byte) => reply.push(byte),
        }
    }
    Ok(parse_cursor_report(&reply))
}

/// Parses `ESC [ rows ; cols` (the terminating `R` already stripped).
pub fn parse_cursor_report(reply: &[u8]) -> Option<(u16, u16)> {
    let body = reply.strip_prefix(b"\x1b[")?;
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    Some((rows.parse().ok()?, cols.parse().ok()?))
}

/// Writes a finished frame in one call.
pub fn write_frame(frame: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(frame)?;
    stdout.flush()
}

/// Clears the screen and homes the cursor, ignoring write errors.
pub fn clear_screen() {
    let mut stdout = io::stdout();
    let _ = queue!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    );
    let _ = stdout.flush();
}

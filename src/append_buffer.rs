use crossterm::Command;
use std::fmt;

/// Growable byte accumulator used to assemble a whole frame before it is
/// written to the terminal in one go.
#[derive(Debug, Default, Clone)]
pub struct AppendBuffer {
    bytes: Vec<u8>,
}

impl AppendBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Appends `bytes`. If the buffer cannot grow the append is dropped.
    pub fn append(&mut self, bytes: &[u8]) {
        if self.bytes.try_reserve(bytes.len()).is_err() {
            return;
        }
        self.bytes.extend_from_slice(bytes);
    }

    pub fn push(&mut self, byte: u8) {
        self.append(&[byte]);
    }

    pub fn push_repeated(&mut self, byte: u8, count: usize) {
        if self.bytes.try_reserve(count).is_err() {
            return;
        }
        self.bytes.resize(self.bytes.len() + count, byte);
    }

    /// Appends the ANSI form of a crossterm command.
    pub fn command(&mut self, command: impl Command) {
        // Writing into the buffer itself cannot fail.
        let _ = command.write_ansi(self);
    }

    /// Removes the last `n` bytes, or everything if fewer are held.
    pub fn truncate_end(&mut self, n: usize) {
        let len = self.bytes.len().saturating_sub(n);
        self.bytes.truncate(len);
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Write for AppendBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::cursor;
    use crossterm::style::{Attribute, SetAttribute};
    use crossterm::terminal::{Clear, ClearType};

    #[test]
    fn append_and_truncate() {
        let mut buf = AppendBuffer::new();
        buf.append(b"abc");
        buf.push(b'd');
        buf.push_repeated(b' ', 2);
        assert_eq!(buf.as_bytes(), b"abcd  ");
        buf.truncate_end(3);
        assert_eq!(buf.as_bytes(), b"abc");
        buf.truncate_end(10);
        assert!(buf.is_empty());
    }

    #[test]
    fn commands_are_written_as_ansi() {
        let mut buf = AppendBuffer::with_capacity(32);
        buf.command(cursor::Hide);
        buf.command(cursor::MoveTo(0, 0));
        buf.command(Clear(ClearType::UntilNewLine));
        buf.command(SetAttribute(Attribute::Reverse));
        assert_eq!(buf.as_bytes(), b"\x1b[?25l\x1b[1;1H\x1b[K\x1b[7m");
        buf.clear();
        assert_eq!(buf.len(), 0);
    }
}

use anyhow::Result;

pub const ESC: u8 = 0x1b;
pub const ENTER: u8 = b'\r';
pub const BACKSPACE: u8 = 0x7f;

/// Byte produced by holding Ctrl with `key`.
pub const fn ctrl(key: u8) -> u8 {
    key & 0x1f
}

/// Logical key produced by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Any byte that is not the start of a recognised escape sequence.
    Byte(u8),
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Delete,
    PageUp,
    PageDown,
}

/// Source of input bytes with a bounded wait.
pub trait ByteSource {
    /// Returns `Ok(None)` when the wait elapsed without input. Any error is
    /// fatal to the editor.
    fn read_byte(&mut self) -> Result<Option<u8>>;
}

/// Blocks until one logical key is available. Each underlying read is
/// bounded; only the first byte is waited for repeatedly.
pub fn read_key<S: ByteSource + ?Sized>(source: &mut S) -> Result<Key> {
    let byte = loop {
        if let Some(byte) = source.read_byte()? {
            break byte;
        }
    };
    if byte != ESC {
        return Ok(Key::Byte(byte));
    }
    decode_escape(source)
}

fn decode_escape<S: ByteSource + ?Sized>(source: &mut S) -> Result<Key> {
    let Some(first) = source.read_byte()? else {
        return Ok(Key::Escape);
    };
    let Some(second) = source.read_byte()? else {
        return Ok(Key::Escape);
    };
    if first != b'[' {
        return Ok(Key::Escape);
    }

    if second.is_ascii_digit() {
        let Some(third) = source.read_byte()? else {
            return Ok(Key::Escape);
        };
        if third != b'~' {
            return Ok(Key::Escape);
        }
        let key = match second {
            b'1' | b'7' => Key::Home,
            b'3' => Key::Delete,
            b'4' | b'8' => Key::End,
            b'5' => Key::PageUp,
            b'6' => Key::PageDown,
            _ => Key::Escape,
        };
        return Ok(key);
    }

    let key = match second {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        _ => Key::Escape,
    };
    Ok(key)
}

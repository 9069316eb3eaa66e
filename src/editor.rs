use crate::append_buffer::AppendBuffer;
use crate::file_io::{FileWriter, Persist};
use crate::key::{BACKSPACE, ENTER, Key, ctrl};
use crate::row::Document;
use crate::viewport::Viewport;
use std::mem;
use std::path::Path;
use std::time::{Duration, Instant};

const CTRL_D: u8 = ctrl(b'd');
const CTRL_H: u8 = ctrl(b'h');
const CTRL_Q: u8 = ctrl(b'q');
const CTRL_U: u8 = ctrl(b'u');

/// Longest status message kept, in bytes.
pub const STATUS_MSG_MAX: usize = 79;

/// What the run loop should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub enum Mode {
    /// `count` is the pending repeat count typed before a command.
    Normal { count: usize },
    Insert,
    /// Holds the command line typed after `:`.
    Command(AppendBuffer),
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal { count: 0 }
    }
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Normal { .. } => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command(_) => "COMMAND",
        }
    }

    pub fn repeat_count(&self) -> usize {
        match self {
            Mode::Normal { count } => *count,
            Mode::Insert | Mode::Command(_) => 0,
        }
    }

    pub fn command_line(&self) -> Option<&[u8]> {
        match self {
            Mode::Command(buffer) => Some(buffer.as_bytes()),
            Mode::Normal { .. } | Mode::Insert => None,
        }
    }
}

/// Elementary cursor motions shared by the modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Up,
    Down,
    Left,
    Right,
    /// `w`: stop at punctuation, then skip blanks.
    Word,
    /// `W`: whitespace delimited, then skip blanks.
    BigWord,
    /// `e`
    WordEnd,
    /// `E`
    BigWordEnd,
}

impl Motion {
    fn from_key(key: Key) -> Option<Self> {
        let motion = match key {
            Key::Byte(b'k') | Key::Up => Motion::Up,
            Key::Byte(b'j') | Key::Down => Motion::Down,
            Key::Byte(b'h') | Key::Left => Motion::Left,
            Key::Byte(b'l') | Key::Right => Motion::Right,
            Key::Byte(b'w') => Motion::Word,
            Key::Byte(b'W') => Motion::BigWord,
            Key::Byte(b'e') => Motion::WordEnd,
            Key::Byte(b'E') => Motion::BigWordEnd,
            _ => return None,
        };
        Some(motion)
    }

    fn from_arrow(key: Key) -> Option<Self> {
        match key {
            Key::Up => Some(Motion::Up),
            Key::Down => Some(Motion::Down),
            Key::Left => Some(Motion::Left),
            Key::Right => Some(Motion::Right),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    set_at: Instant,
}

/// All state of one editing session.
#[derive(Debug)]
pub struct Editor<P = FileWriter> {
    pub(crate) doc: Document,
    pub(crate) cx: usize,
    pub(crate) cy: usize,
    pub(crate) rx: usize,
    pub(crate) viewport: Viewport,
    pub(crate) mode: Mode,
    status: StatusMessage,
    message_timeout: Option<Duration>,
    persist: P,
}

impl Editor<FileWriter> {
    pub fn new(doc: Document, viewport: Viewport) -> Self {
        Self::with_persist(doc, viewport, FileWriter)
    }
}

impl<P> Editor<P> {
    pub fn with_persist(doc: Document, viewport: Viewport, persist: P) -> Self {
        Self {
            doc,
            cx: 0,
            cy: 0,
            rx: 0,
            viewport,
            mode: Mode::default(),
            status: StatusMessage {
                text: String::new(),
                set_at: Instant::now(),
            },
            message_timeout: None,
            persist,
        }
    }

    /// Messages older than `timeout` stop being shown. `None` keeps them
    /// until overwritten.
    pub fn with_message_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.message_timeout = timeout;
        self
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Raw column and row of the cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cx, self.cy)
    }

    pub fn render_x(&self) -> usize {
        self.rx
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn persist(&self) -> &P {
        &self.persist
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        let mut text = msg.into();
        if text.len() > STATUS_MSG_MAX {
            let mut end = STATUS_MSG_MAX;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            text.truncate(end);
        }
        self.status = StatusMessage {
            text,
            set_at: Instant::now(),
        };
    }

    /// The status message if it has not expired.
    pub fn status_text(&self) -> &str {
        match self.message_timeout {
            Some(timeout) if self.status.set_at.elapsed() >= timeout => "",
            _ => &self.status.text,
        }
    }

    /// Recomputes `rx` and snaps the viewport around the cursor.
    pub fn scroll(&mut self) {
        self.rx = self.doc.render_col(self.cy, self.cx);
        self.viewport.scroll_to(self.cy, self.rx);
    }

    pub fn move_cursor(&mut self, motion: Motion) {
        match motion {
            Motion::Up => {
                if self.cy != 0 {
                    self.cy -= 1;
                }
            }
            Motion::Down => {
                if self.cy < self.doc.num_rows() {
                    self.cy += 1;
                }
            }
            Motion::Left => {
                if self.cx != 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = self.doc.row_len(self.cy);
                }
            }
            Motion::Right => {
                if let Some(row) = self.doc.row(self.cy) {
                    if self.cx < row.len() {
                        self.cx += 1;
                    } else if self.cx == row.len() {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
            Motion::Word => self.move_word(true, true),
            Motion::BigWord => self.move_word(false, true),
            Motion::WordEnd => self.move_word(true, false),
            Motion::BigWordEnd => self.move_word(false, false),
        }

        let len = self.doc.row_len(self.cy);
        if self.cx > len {
            self.cx = len;
        }
    }

    // Known limitation: with `stop_at_punct` the scan stops *before* a
    // punctuation byte only when it follows a word byte, so runs of
    // punctuation are crossed one byte per motion.
    fn move_word(&mut self, stop_at_punct: bool, skip_blanks: bool) {
        let Some(row) = self.doc.row(self.cy) else {
            return;
        };
        let bytes = row.raw();
        let size = bytes.len();
        let mut cx = self.cx;
        while cx < size {
            let byte = bytes[cx];
            cx += 1;
            if is_space(byte) {
                break;
            }
            if stop_at_punct && bytes.get(cx).is_some_and(u8::is_ascii_punctuation) {
                break;
            }
        }
        if skip_blanks {
            while cx < size && bytes[cx] == b' ' {
                cx += 1;
            }
        }

        if cx >= size {
            self.cy += 1;
            self.cx = 0;
        } else {
            self.cx = cx;
        }
    }

    /// Jumps to the top or bottom line of the viewport, then moves a whole
    /// screen further one line at a time.
    fn move_page(&mut self, down: bool) {
        let rows = self.viewport.rows;
        let motion = if down {
            self.cy = (self.viewport.row_offset + rows)
                .saturating_sub(1)
                .min(self.doc.num_rows());
            Motion::Down
        } else {
            self.cy = self.viewport.row_offset;
            Motion::Up
        };
        for _ in 0..rows {
            self.move_cursor(motion);
        }
    }

    fn show_command_prompt(&mut self, buffer: &AppendBuffer) {
        let prompt = format!(":{}", String::from_utf8_lossy(buffer.as_bytes()));
        self.set_status(prompt);
    }
}

impl<P: Persist> Editor<P> {
    /// Interprets `key` in the current mode.
    pub fn process_key(&mut self, key: Key) -> Flow {
        let mode = mem::take(&mut self.mode);
        let before = mode.label();
        let (mode, flow) = match mode {
            Mode::Normal { count } => self.normal_key(count, key),
            Mode::Insert => (self.insert_key(key), Flow::Continue),
            Mode::Command(buffer) => self.command_key(buffer, key),
        };
        if mode.label() != before {
            tracing::debug!(from = before, to = mode.label(), "mode change");
        }
        self.mode = mode;
        flow
    }

    fn normal_key(&mut self, count: usize, key: Key) -> (Mode, Flow) {
        if let Key::Byte(byte @ b'0'..=b'9') = key {
            let digit = usize::from(byte - b'0');
            if digit != 0 || count != 0 {
                let count = count.saturating_mul(10).saturating_add(digit);
                return (Mode::Normal { count }, Flow::Continue);
            }
        }

        // The repeat count is only displayed; motions run once.
        let mut next = Mode::Normal { count: 0 };
        match key {
            Key::Byte(b'i') => next = Mode::Insert,
            Key::Byte(b':') => {
                self.set_status(":");
                next = Mode::Command(AppendBuffer::new());
            }
            Key::Byte(CTRL_Q) => return (next, Flow::Quit),
            Key::Byte(b'0') | Key::Home => self.cx = 0,
            Key::Byte(b'$') | Key::End => {
                if self.cy < self.doc.num_rows() {
                    self.cx = self.doc.row_len(self.cy);
                }
            }
            Key::PageUp | Key::Byte(CTRL_U) => self.move_page(false),
            Key::PageDown | Key::Byte(CTRL_D) => self.move_page(true),
            _ => {
                if let Some(motion) = Motion::from_key(key) {
                    self.move_cursor(motion);
                }
            }
        }
        (next, Flow::Continue)
    }

    fn insert_key(&mut self, key: Key) -> Mode {
        if key == Key::Escape {
            return Mode::default();
        }
        if let Some(motion) = Motion::from_arrow(key) {
            self.move_cursor(motion);
        }
        Mode::Insert
    }

    fn command_key(&mut self, mut buffer: AppendBuffer, key: Key) -> (Mode, Flow) {
        match key {
            Key::Byte(ENTER) => {
                self.set_status("");
                let flow = self.run_command(buffer.as_bytes());
                (Mode::default(), flow)
            }
            Key::Escape => {
                self.set_status("");
                (Mode::default(), Flow::Continue)
            }
            Key::Byte(BACKSPACE | CTRL_H) | Key::Delete => {
                buffer.truncate_end(1);
                self.show_command_prompt(&buffer);
                (Mode::Command(buffer), Flow::Continue)
            }
            Key::Byte(byte) if is_print(byte) => {
                buffer.push(byte);
                self.show_command_prompt(&buffer);
                (Mode::Command(buffer), Flow::Continue)
            }
            _ => (Mode::Command(buffer), Flow::Continue),
        }
    }

    /// Runs a `:` command line. A `w` anywhere saves, a `q` anywhere quits;
    /// anything else is ignored.
    pub fn run_command(&mut self, command: &[u8]) -> Flow {
        tracing::debug!(command = %String::from_utf8_lossy(command), "run command");
        if command.contains(&b'w') {
            self.save();
        }
        if command.contains(&b'q') {
            return Flow::Quit;
        }
        Flow::Continue
    }

    fn save(&mut self) {
        let Some(name) = self.doc.name().map(Path::to_path_buf) else {
            self.set_status("No file name");
            return;
        };
        match self.persist.persist(self.doc.rows(), &name) {
            Ok(bytes) => self.set_status(format!("{bytes} bytes written to disk")),
            Err(err) => {
                tracing::warn!(path = %name.display(), "save failed: {err:#}");
                self.set_status(format!("Can't save! {err:#}"));
            }
        }
    }
}

/// C `isspace`: ASCII whitespace plus vertical tab.
fn is_space(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == 0x0b
}

fn is_print(byte: u8) -> bool {
    (0x20..0x7f).contains(&byte)
}

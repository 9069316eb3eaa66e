//! Core of `ni`, a small modal text editor that draws straight to a raw-mode
//! terminal.
//!
//! Each loop iteration renders one frame, decodes one key and dispatches it
//! through the normal/insert/command state machine.

pub mod app;
pub mod append_buffer;
pub mod config;
pub mod editor;
pub mod file_io;
pub mod key;
pub mod logging;
pub mod render;
pub mod row;
pub mod terminal;
pub mod viewport;

pub use append_buffer::AppendBuffer;
pub use editor::{Editor, Flow, Mode, Motion};
pub use file_io::{FileWriter, Persist};
pub use key::{ByteSource, Key};
pub use row::{Document, Row};
pub use viewport::Viewport;

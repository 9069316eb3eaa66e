use crate::append_buffer::AppendBuffer;
use crate::config::Config;
use crate::editor::{Editor, Flow};
use crate::file_io;
use crate::key::{self, ByteSource};
use crate::row::Document;
use crate::terminal::{self, RawMode, StdinBytes};
use crate::viewport::Viewport;
use anyhow::Result;
use std::path::PathBuf;

/// Runs the editor until the user quits. On error the terminal is restored
/// and the screen cleared before the error is returned.
pub fn run_app(path: Option<PathBuf>, config: Config) -> Result<()> {
    let result = run_session(path, &config);
    if let Err(err) = &result {
        tracing::error!("fatal: {err:#}");
    }
    terminal::clear_screen();
    result
}

fn run_session(path: Option<PathBuf>, config: &Config) -> Result<()> {
    let _raw = RawMode::enable(config.read_timeout_ds)?;
    let mut input = StdinBytes::new();

    let (rows, cols) = terminal::window_size(&mut input)?;
    let doc = match &path {
        Some(path) => file_io::open_document(path, config.tab_width)?,
        None => Document::new(config.tab_width),
    };
    let mut editor = Editor::new(doc, Viewport::for_screen(rows, cols))
        .with_message_timeout(config.message_timeout());
    editor.set_status("Welcome");

    event_loop(&mut editor, &mut input)
}

fn event_loop(editor: &mut Editor, input: &mut impl ByteSource) -> Result<()> {
    let mut frame = AppendBuffer::with_capacity(4096);
    loop {
        frame.clear();
        editor.refresh_screen(&mut frame);
        if let Err(err) = terminal::write_frame(frame.as_bytes()) {
            tracing::warn!("frame write failed: {err}");
        }

        let key = key::read_key(input)?;
        if editor.process_key(key) == Flow::Quit {
            tracing::info!("quit");
            return Ok(());
        }
    }
}

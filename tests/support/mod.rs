#![allow(dead_code)]

use anyhow::Result;
use ni::key::read_key;
use ni::{ByteSource, Document, Editor, Flow, Persist, Row, Viewport};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Plays back raw terminal bytes; reports "no data" once drained.
pub struct Script {
    bytes: VecDeque<u8>,
}

impl Script {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.iter().copied().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl ByteSource for Script {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.bytes.pop_front())
    }
}

/// Records every save request instead of touching the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub saves: Vec<(PathBuf, Vec<Vec<u8>>)>,
}

impl Persist for MemoryStore {
    fn persist(&mut self, rows: &[Row], name: &Path) -> Result<usize> {
        let lines: Vec<Vec<u8>> = rows.iter().map(|row| row.raw().to_vec()).collect();
        let written = lines.iter().map(|line| line.len() + 1).sum();
        self.saves.push((name.to_path_buf(), lines));
        Ok(written)
    }
}

pub fn editor(lines: &[&str], rows: usize, cols: usize) -> Editor<MemoryStore> {
    let doc = Document::from_lines(lines.iter().copied(), 4);
    Editor::with_persist(doc, Viewport::new(rows, cols), MemoryStore::default())
}

/// Decodes and dispatches every scripted key, redrawing between keys like
/// the real loop does. Stops early on quit.
pub fn type_bytes(editor: &mut Editor<MemoryStore>, bytes: &[u8]) -> Flow {
    let mut script = Script::new(bytes);
    let mut frame = ni::AppendBuffer::new();
    while !script.is_empty() {
        frame.clear();
        editor.refresh_screen(&mut frame);
        let key = read_key(&mut script).unwrap();
        if editor.process_key(key) == Flow::Quit {
            return Flow::Quit;
        }
    }
    editor.scroll();
    Flow::Continue
}

use crate::row::{Document, Row};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Splits `bytes` into lines, dropping each line's trailing `\n`/`\r` run.
pub fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    bytes
        .split_inclusive(|&b| b == b'\n')
        .map(|line| {
            let mut end = line.len();
            while end > 0 && matches!(line[end - 1], b'\n' | b'\r') {
                end -= 1;
            }
            &line[..end]
        })
        .collect()
}

/// Loads `path` into a fresh document named after it.
pub fn open_document(path: &Path, tab_width: usize) -> Result<Document> {
    let bytes = fs::read(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut doc = Document::from_lines(split_lines(&bytes), tab_width);
    doc.set_name(path);
    tracing::info!(path = %path.display(), rows = doc.num_rows(), "opened file");
    Ok(doc)
}

/// Destination for the `w` command.
pub trait Persist {
    /// Stores `rows` under `name` and returns the number of bytes written.
    fn persist(&mut self, rows: &[Row], name: &Path) -> Result<usize>;
}

/// Writes rows back to disk, one `\n`-terminated line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileWriter;

impl Persist for FileWriter {
    fn persist(&mut self, rows: &[Row], name: &Path) -> Result<usize> {
        let mut text = Vec::with_capacity(rows.iter().map(|r| r.len() + 1).sum());
        for row in rows {
            text.extend_from_slice(row.raw());
            text.push(b'\n');
        }
        fs::write(name, &text).with_context(|| format!("Failed to write {}", name.display()))?;
        tracing::info!(path = %name.display(), bytes = text.len(), "saved file");
        Ok(text.len())
    }
}

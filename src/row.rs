use std::path::{Path, PathBuf};

pub const DEFAULT_TAB_WIDTH: usize = 4;

/// One line of the document: the raw bytes and their tab-expanded projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    raw: Vec<u8>,
    rendered: Vec<u8>,
}

impl Row {
    pub fn new(line: &[u8], tab_width: usize) -> Self {
        let mut row = Self {
            raw: line.to_vec(),
            rendered: Vec::new(),
        };
        row.update_render(tab_width);
        row
    }

    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn rendered(&self) -> &[u8] {
        &self.rendered
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Rebuilds `rendered` from `raw`. Each tab becomes at least one space and
    /// pads up to the next multiple of `tab_width`.
    pub fn update_render(&mut self, tab_width: usize) {
        let tab_width = tab_width.max(1);
        let tabs = self.raw.iter().filter(|&&b| b == b'\t').count();
        self.rendered.clear();
        self.rendered.reserve(self.raw.len() + tabs * (tab_width - 1));
        for &byte in &self.raw {
            if byte == b'\t' {
                self.rendered.push(b' ');
                while self.rendered.len() % tab_width != 0 {
                    self.rendered.push(b' ');
                }
            } else {
                self.rendered.push(byte);
            }
        }
    }

    /// Rendered column of raw column `cx`. Columns past the end of the row
    /// are treated as ordinary one-byte cells.
    pub fn raw_to_render_col(&self, cx: usize, tab_width: usize) -> usize {
        let tab_width = tab_width.max(1);
        let mut rx = 0;
        for j in 0..cx {
            if self.raw.get(j) == Some(&b'\t') {
                rx += (tab_width - 1) - (rx % tab_width);
            }
            rx += 1;
        }
        rx
    }
}

/// Ordered rows plus the name of the file they came from, if any.
#[derive(Debug, Clone)]
pub struct Document {
    rows: Vec<Row>,
    name: Option<PathBuf>,
    tab_width: usize,
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_TAB_WIDTH)
    }
}

impl Document {
    pub fn new(tab_width: usize) -> Self {
        Self {
            rows: Vec::new(),
            name: None,
            tab_width: tab_width.max(1),
        }
    }

    pub fn from_lines<I, L>(lines: I, tab_width: usize) -> Self
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut doc = Self::new(tab_width);
        for line in lines {
            doc.append_row(line.as_ref());
        }
        doc
    }

    pub fn append_row(&mut self, line: &[u8]) {
        self.rows.push(Row::new(line, self.tab_width));
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Raw length of row `at`, or 0 for the virtual row past the end.
    pub fn row_len(&self, at: usize) -> usize {
        self.rows.get(at).map_or(0, Row::len)
    }

    pub fn name(&self) -> Option<&Path> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<PathBuf>) {
        self.name = Some(name.into());
    }

    /// Rendered column of `cx` in row `cy`; 0 past the last row.
    pub fn render_col(&self, cy: usize, cx: usize) -> usize {
        self.rows
            .get(cy)
            .map_or(0, |row| row.raw_to_render_col(cx, self.tab_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tab_expands_to_next_stop() {
        let doc = Document::from_lines(["abc", "de\tf", "ghi"], 4);
        assert_eq!(doc.num_rows(), 3);
        assert_eq!(doc.rows()[1].rendered(), b"de  f");
        assert_eq!(doc.rows()[1].raw(), b"de\tf");
    }

    #[test]
    fn tab_on_stop_emits_full_width() {
        let row = Row::new(b"abcd\tx", 4);
        assert_eq!(row.rendered(), b"abcd    x");
        let row = Row::new(b"\t\t", 4);
        assert_eq!(row.rendered(), b"        ");
    }

    #[test]
    fn update_render_is_idempotent() {
        let mut row = Row::new(b"\ta\tbc\t", 8);
        let first = row.rendered().to_vec();
        row.update_render(8);
        assert_eq!(row.rendered(), first.as_slice());
    }

    #[test]
    fn render_col_accounts_for_tabs() {
        let row = Row::new(b"de\tf", 4);
        assert_eq!(row.raw_to_render_col(0, 4), 0);
        assert_eq!(row.raw_to_render_col(2, 4), 2);
        assert_eq!(row.raw_to_render_col(3, 4), 4);
        assert_eq!(row.raw_to_render_col(4, 4), 5);
    }

    #[test]
    fn render_col_past_last_row_is_zero() {
        let doc = Document::from_lines(["\tx"], 4);
        assert_eq!(doc.render_col(0, 1), 4);
        assert_eq!(doc.render_col(1, 5), 0);
        assert_eq!(doc.row_len(1), 0);
    }
}

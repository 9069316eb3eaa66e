/// Number of terminal lines reserved below the text area (status bar and
/// message bar).
pub const RESERVED_ROWS: usize = 2;

/// Scroll offsets plus the size of the text area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub row_offset: usize,
    pub col_offset: usize,
    pub rows: usize,
    pub cols: usize,
}

impl Viewport {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            row_offset: 0,
            col_offset: 0,
            rows,
            cols,
        }
    }

    /// Builds the viewport for a terminal of `screen_rows` x `screen_cols`.
    pub fn for_screen(screen_rows: u16, screen_cols: u16) -> Self {
        Self::new(
            (screen_rows as usize).saturating_sub(RESERVED_ROWS),
            screen_cols as usize,
        )
    }

    /// Snaps the offsets so that (`cy`, `rx`) is visible. Each clamp is
    /// evaluated once.
    pub fn scroll_to(&mut self, cy: usize, rx: usize) {
        if cy < self.row_offset {
            self.row_offset = cy;
        }
        if cy >= self.row_offset + self.rows {
            self.row_offset = (cy + 1).saturating_sub(self.rows);
        }
        if rx < self.col_offset {
            self.col_offset = rx;
        }
        if rx >= self.col_offset + self.cols {
            self.col_offset = (rx + 1).saturating_sub(self.cols);
        }
    }

    pub fn contains(&self, cy: usize, rx: usize) -> bool {
        (self.row_offset..self.row_offset + self.rows).contains(&cy)
            && (self.col_offset..self.col_offset + self.cols).contains(&rx)
    }
}

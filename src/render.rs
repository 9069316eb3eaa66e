use crate::append_buffer::AppendBuffer;
use crate::editor::Editor;
use crossterm::cursor;
use crossterm::style::{Attribute, SetAttribute};
use crossterm::terminal::{Clear, ClearType};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const FIELD_MAX: usize = 20;
const COUNT_TEXT_MAX: usize = 9;

impl<P> Editor<P> {
    /// Scrolls, then composes the whole frame into `ab`.
    pub fn refresh_screen(&mut self, ab: &mut AppendBuffer) {
        self.scroll();
        self.compose_frame(ab);
    }

    pub fn compose_frame(&self, ab: &mut AppendBuffer) {
        ab.command(cursor::Hide);
        ab.command(cursor::MoveTo(0, 0));

        self.draw_rows(ab);
        self.draw_status_bar(ab);
        self.draw_message_bar(ab);

        let row = self.cy.saturating_sub(self.viewport.row_offset);
        let col = self.rx.saturating_sub(self.viewport.col_offset);
        ab.command(cursor::MoveTo(col as u16, row as u16));
        ab.command(cursor::Show);
    }

    fn draw_rows(&self, ab: &mut AppendBuffer) {
        let vp = self.viewport;
        for y in 0..vp.rows {
            match self.doc.row(y + vp.row_offset) {
                Some(row) => {
                    let rendered = row.rendered();
                    let start = vp.col_offset.min(rendered.len());
                    let end = (start + vp.cols).min(rendered.len());
                    ab.append(&rendered[start..end]);
                }
                None if self.doc.is_empty() && y == vp.rows / 3 => self.draw_welcome(ab),
                None => ab.push(b'~'),
            }
            ab.command(Clear(ClearType::UntilNewLine));
            ab.append(b"\r\n");
        }
    }

    fn draw_welcome(&self, ab: &mut AppendBuffer) {
        let welcome = format!("Ni editor -- version {VERSION}");
        let cols = self.viewport.cols;
        let len = welcome.len().min(cols);
        let mut padding = (cols - len) / 2;
        if padding > 0 {
            ab.push(b'~');
            padding -= 1;
        }
        ab.push_repeated(b' ', padding);
        ab.append(&welcome.as_bytes()[..len]);
    }

    fn draw_status_bar(&self, ab: &mut AppendBuffer) {
        ab.command(SetAttribute(Attribute::Reverse));

        let name = self
            .doc
            .name()
            .map_or_else(|| "[No name]".to_string(), |p| p.display().to_string());
        let status = format!(
            " {} | {} | {} lines",
            truncate_chars(self.mode.label(), FIELD_MAX),
            truncate_chars(&name, FIELD_MAX),
            self.doc.num_rows()
        );
        let position = format!("{}:{} ", self.cy + 1, self.cx + 1);

        let cols = self.viewport.cols;
        let len = status.len().min(cols);
        ab.append(&status.as_bytes()[..len]);
        right_align(ab, len, cols, position.as_bytes());

        ab.command(SetAttribute(Attribute::Reset));
        ab.append(b"\r\n");
    }

    fn draw_message_bar(&self, ab: &mut AppendBuffer) {
        ab.command(Clear(ClearType::UntilNewLine));

        let cols = self.viewport.cols;
        let msg = self.status_text().as_bytes();
        let len = msg.len().min(cols);
        ab.append(&msg[..len]);

        let count = self.mode.repeat_count();
        if count != 0 {
            let text = format!("{count} ");
            let text = &text.as_bytes()[..text.len().min(COUNT_TEXT_MAX)];
            right_align(ab, len, cols, text);
        }
    }
}

/// Pads with spaces from column `used` so that `text` ends exactly at
/// `width`. If `text` does not fit only the padding is written.
fn right_align(ab: &mut AppendBuffer, mut used: usize, width: usize, text: &[u8]) {
    while used < width {
        if width - used == text.len() {
            ab.append(text);
            break;
        }
        ab.push(b' ');
        used += 1;
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;
    use crate::row::Document;
    use crate::viewport::Viewport;
    use pretty_assertions::assert_eq;

    fn frame<P>(ed: &mut Editor<P>) -> String {
        let mut ab = AppendBuffer::new();
        ed.refresh_screen(&mut ab);
        String::from_utf8(ab.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn frame_layout_for_small_document() {
        let doc = Document::from_lines(["abc", "de\tf"], 4);
        let mut ed = Editor::new(doc, Viewport::new(3, 40));
        let expected = concat!(
            "\x1b[?25l\x1b[1;1H",
            "abc\x1b[K\r\n",
            "de  f\x1b[K\r\n",
            "~\x1b[K\r\n",
            "\x1b[7m NORMAL | [No name] | 2 lines       1:1 \x1b[0m\r\n",
            "\x1b[K",
            "\x1b[1;1H\x1b[?25h",
        );
        assert_eq!(frame(&mut ed), expected);
    }

    #[test]
    fn empty_document_shows_centered_banner() {
        let mut ed = Editor::new(Document::default(), Viewport::new(6, 40));
        let out = frame(&mut ed);
        let lines: Vec<&str> = out.split("\r\n").collect();
        let banner = format!("~      Ni editor -- version {VERSION}\x1b[K");
        assert_eq!(lines[2], banner);
        assert!(lines[1].starts_with('~'));
    }

    #[test]
    fn banner_is_truncated_to_width() {
        let mut ed = Editor::new(Document::default(), Viewport::new(3, 10));
        let out = frame(&mut ed);
        assert!(out.contains("\r\nNi editor \x1b[K"));
    }

    #[test]
    fn rows_are_sliced_by_column_offset() {
        let doc = Document::from_lines(["0123456789abcdef"], 4);
        let mut ed = Editor::new(doc, Viewport::new(2, 8));
        ed.process_key(Key::End);
        let out = frame(&mut ed);
        assert_eq!(ed.viewport().col_offset, 9);
        assert!(out.starts_with("\x1b[?25l\x1b[1;1H9abcdef\x1b[K\r\n"));
        assert!(out.ends_with("\x1b[1;8H\x1b[?25h"));
    }

    #[test]
    fn message_bar_shows_status_and_count() {
        let doc = Document::from_lines(["abc"], 4);
        let mut ed = Editor::new(doc, Viewport::new(1, 20));
        ed.set_status("Welcome");
        ed.process_key(Key::Byte(b'4'));
        ed.process_key(Key::Byte(b'2'));
        let out = frame(&mut ed);
        let bar = format!("\x1b[KWelcome{}42 \x1b[1;1H", " ".repeat(10));
        assert!(out.contains(&bar));
    }

    #[test]
    fn status_bar_truncates_long_names() {
        let mut doc = Document::from_lines(["x"], 4);
        doc.set_name("a-very-long-file-name-indeed.txt");
        let mut ed = Editor::new(doc, Viewport::new(1, 60));
        let out = frame(&mut ed);
        assert!(out.contains(" NORMAL | a-very-long-file-nam | 1 lines"));
    }

    #[test]
    fn right_align_skips_text_that_does_not_fit() {
        let mut ab = AppendBuffer::new();
        right_align(&mut ab, 3, 5, b"long");
        assert_eq!(ab.as_bytes(), b"  ");
    }
}

//! Terminal progress output
//!
//! A status line is drawn with a carriage return and no newline so the next
//! status can overwrite it. The writer remembers how wide the last status was
//! so a shorter one, or a full line, fully erases it.

use std::io::{self, Write};

use console::measure_text_width;

/// Writes full lines and overwritable single-line status updates
#[derive(Debug)]
pub struct ProgressWriter<W: Write> {
    out: W,
    last_width: usize,
}

impl ProgressWriter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ProgressWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, last_width: 0 }
    }

    /// Replace the current status line with `text`
    pub fn status(&mut self, text: &str) -> io::Result<()> {
        let width = measure_text_width(text);
        let padding = self.last_width.saturating_sub(width);
        write!(self.out, "\r{}{}", text, " ".repeat(padding))?;
        self.out.flush()?;
        self.last_width = width;
        Ok(())
    }

    /// Print a full line, erasing any status line first
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        self.erase()?;
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    /// Erase the status line, if one is showing
    pub fn clear_status(&mut self) -> io::Result<()> {
        self.erase()?;
        self.out.flush()
    }

    fn erase(&mut self) -> io::Result<()> {
        if self.last_width > 0 {
            write!(self.out, "\r{}\r", " ".repeat(self.last_width))?;
            self.last_width = 0;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(writer: ProgressWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn test_plain_lines() {
        let mut w = ProgressWriter::new(Vec::new());
        w.line("one").unwrap();
        w.line("two").unwrap();
        assert_eq!(output(w), "one\ntwo\n");
    }

    #[test]
    fn test_shorter_status_pads_over_longer() {
        let mut w = ProgressWriter::new(Vec::new());
        w.status("downloading").unwrap();
        w.status("done").unwrap();
        assert_eq!(output(w), "\rdownloading\rdone       ");
    }

    #[test]
    fn test_line_erases_status() {
        let mut w = ProgressWriter::new(Vec::new());
        w.status("abc").unwrap();
        w.line("x").unwrap();
        assert_eq!(output(w), "\rabc\r   \rx\n");
    }

    #[test]
    fn test_clear_status_only_erases_after_status() {
        let mut w = ProgressWriter::new(Vec::new());
        w.clear_status().unwrap();
        w.status("ok").unwrap();
        w.clear_status().unwrap();
        w.clear_status().unwrap();
        assert_eq!(output(w), "\rok\r  \r");
    }
}

//! Indent-aware string builder for pipeline source rendering.
//!
//! Rendered pipeline source uses 2-space indentation.

pub struct SourceWriter {
    buf: String,
    indent_level: usize,
}

impl SourceWriter {
    pub fn new() -> Self {
        Self {
            buf: String::with_capacity(4096),
            indent_level: 0,
        }
    }

    /// Write a complete line at the current indent.
    pub fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level {
            self.buf.push_str("  ");
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    /// Write a line verbatim with no indentation applied. Used for opaque
    /// custom-code payloads, which must be embedded byte-for-byte.
    pub fn raw_line(&mut self, text: &str) {
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Write `text {` and indent.
    pub fn block_open(&mut self, text: &str) {
        self.line(&format!("{} {{", text));
        self.indent();
    }

    /// Dedent and write a closing line (`}`, `});`, ...).
    pub fn block_close(&mut self, closer: &str) {
        self.dedent();
        self.line(closer);
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new()
    }
}

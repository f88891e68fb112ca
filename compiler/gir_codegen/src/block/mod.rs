//! Source Blocks
//!
//! A [`SourceBlock`] collects the lines generated for one wrapper. Lines are
//! stored already indented; the block tracks the current indentation level the
//! way the formatter context does, so nested constructs are written with
//! [`SourceBlock::with_indent`] instead of hand-counted tabs.

/// Marker carried by every placeholder the mapping engine produces.
pub const PLACEHOLDER_MARKER: &str = "TODO";

/// One generated text block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    lines: Vec<String>,
    indent: usize,
}

impl SourceBlock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit one line at the current indentation. Empty text stays empty.
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
            return;
        }
        let mut line = "\t".repeat(self.indent);
        line.push_str(text);
        self.lines.push(line);
    }

    /// Emit each line of `lines` at the current indentation.
    pub fn lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
    }

    /// Emit a `//` comment line; empty text yields a bare `//`.
    pub fn comment(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.line("//");
        } else {
            self.line(format!("// {text}"));
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Run `f` one indentation level deeper.
    pub fn with_indent<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.indent();
        f(self);
        self.dedent();
    }

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    pub fn as_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether any line still carries a placeholder marker.
    pub fn contains_placeholder(&self) -> bool {
        self.lines.iter().any(|l| l.contains(PLACEHOLDER_MARKER))
    }

    /// The block as text, one trailing newline per line.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

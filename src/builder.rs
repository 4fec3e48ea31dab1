//! Indentation-aware text accumulator for DBML output

/// Two spaces per nesting level
const INDENT: &str = "  ";

/// Line-oriented DBML text builder
///
/// ```
/// use drizzle_dbml::DbmlBuilder;
///
/// let mut b = DbmlBuilder::new();
/// b.line("Table \"users\" {");
/// b.indent();
/// b.line("\"id\" integer");
/// b.dedent();
/// b.line("}");
/// assert_eq!(b.build(), "Table \"users\" {\n  \"id\" integer\n}");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbmlBuilder {
    lines: Vec<String>,
    level: usize,
}

impl DbmlBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line at the current indentation
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if text.is_empty() {
            self.lines.push(String::new());
        } else {
            self.lines.push(format!("{}{text}", INDENT.repeat(self.level)));
        }
        self
    }

    /// Append an empty line (never indented)
    pub fn blank_line(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    /// Decrease the nesting level; stays at zero when already there
    pub fn dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    /// Current nesting level
    #[must_use]
    pub fn level(&self) -> usize {
        self.level
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Accumulated text, lines joined by `\n`, no trailing newline
    #[must_use]
    pub fn build(&self) -> String {
        self.lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        let mut b = DbmlBuilder::new();
        b.line("a").indent().line("b").indent().line("c").dedent().dedent().line("d");
        assert_eq!(b.build(), "a\n  b\n    c\nd");
    }

    #[test]
    fn test_dedent_never_negative() {
        let mut b = DbmlBuilder::new();
        b.dedent().dedent();
        assert_eq!(b.level(), 0);
        b.line("x");
        assert_eq!(b.build(), "x");
    }

    #[test]
    fn test_blank_lines_are_not_indented() {
        let mut b = DbmlBuilder::new();
        b.indent().line("a").blank_line().line("").line("b");
        assert_eq!(b.build(), "  a\n\n\n  b");
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut b = DbmlBuilder::new();
        b.line("x").line("y");
        assert_eq!(b.build(), b.build());
    }

    #[test]
    fn test_empty() {
        let b = DbmlBuilder::new();
        assert!(b.is_empty());
        assert_eq!(b.build(), "");
    }
}

use std::fmt::{self, Write};

use c6_ir::{FileIndex, Span};

use crate::{ErrorCode, LineIndex};

/// A compiler error pinned to a byte range of one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub file: FileIndex,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    #[cold]
    pub fn error(code: ErrorCode, file: FileIndex, span: Span, message: impl Into<String>) -> Self {
        Diagnostic {
            code,
            file,
            span,
            message: message.into(),
        }
    }

    /// Render with a caret excerpt:
    ///
    /// ```text
    /// error[E1001]: expected `;`, found `}`
    ///  --> main.c6:2:10
    ///   |
    /// 2 |     x := 1
    ///   |           ^
    /// ```
    pub fn render(&self, path: &str, source: &str) -> String {
        let index = LineIndex::build(source);
        let (line, col) = index.line_col(source, self.span.start);
        let text = index.line_text(source, line);
        let gutter = line.to_string().len();
        let carets = self.caret_width(source, text, col);

        let mut out = String::new();
        let _ = writeln!(out, "error[{}]: {}", self.code, self.message);
        let _ = writeln!(out, "{:gutter$}--> {path}:{line}:{col}", "");
        let _ = writeln!(out, "{:gutter$} |", "");
        let _ = writeln!(out, "{line} | {text}");
        let _ = writeln!(
            out,
            "{:gutter$} | {}{}",
            "",
            caret_padding(text, col),
            "^".repeat(carets)
        );
        out
    }

    /// Number of carets: the span's width clipped to the line, at least one.
    fn caret_width(&self, source: &str, line_text: &str, col: u32) -> usize {
        let remaining = line_text.chars().count().saturating_sub(col as usize - 1);
        let span_chars = source
            .get(self.span.to_range())
            .map_or(0, |s| s.chars().take_while(|&c| c != '\n').count());
        span_chars.min(remaining).max(1)
    }
}

/// Whitespace that lines a caret up under column `col`, keeping tabs so the
/// excerpt renders aligned in a terminal.
fn caret_padding(line_text: &str, col: u32) -> String {
    line_text
        .chars()
        .take(col as usize - 1)
        .map(|c| if c == '\t' { '\t' } else { ' ' })
        .collect()
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error[{}] at {}: {}",
            self.code, self.span.start, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_caret() {
        let src = "main :: func() {\n    x := 1\n}\n";
        let diag = Diagnostic::error(
            ErrorCode::E1001,
            FileIndex::new(0),
            Span::new(28, 29),
            "expected `;`, found `}`",
        );
        assert_eq!(
            diag.render("main.c6", src),
            "error[E1001]: expected `;`, found `}`\n \
             --> main.c6:3:1\n  \
             |\n\
             3 | }\n  \
             | ^\n"
        );
    }

    #[test]
    fn test_render_wide_span_and_tabs() {
        let src = "\tx := \"abc\n";
        let diag = Diagnostic::error(
            ErrorCode::E0004,
            FileIndex::new(0),
            Span::new(6, 10),
            "newline in string literal",
        );
        let rendered = diag.render("a.c6", src);
        assert!(rendered.contains("--> a.c6:1:7"), "{rendered}");
        assert!(rendered.ends_with("  | \t     ^^^^\n"), "{rendered}");
    }

    #[test]
    fn test_display() {
        let diag = Diagnostic::error(ErrorCode::E1002, FileIndex::new(0), Span::point(4), "oops");
        assert_eq!(diag.to_string(), "error[E1002] at 4: oops");
    }
}

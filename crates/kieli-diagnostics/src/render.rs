//! Ariadne-based rendering of a [`Diagnostic`] into a terminal-friendly
//! string, used by the CLI driver (external to this crate) and by snapshot
//! tests that want to pin the exact rendered output of a fixture.
//!
//! Ariadne labels source by byte offset, while `Diagnostic::range` is
//! already converted to line/UTF-16-column for LSP consumers, so callers
//! pass the diagnostic's originating byte [`Span`] alongside it rather than
//! have this module invert the line index.

use std::ops::Range as StdRange;

use ariadne::{Color, Config, Label, Report, ReportKind};
use kieli_common::diagnostic::{Diagnostic, Severity};
use kieli_common::span::Span;

pub fn render(diagnostic: &Diagnostic, primary_span: Span, source: &str) -> String {
    let config = Config::default().with_color(false);
    let kind = match diagnostic.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
        Severity::Information | Severity::Hint => ReportKind::Advice,
    };

    let primary = clamp(primary_span.start as usize..primary_span.end as usize, source.len());

    let mut builder = Report::build(kind, primary.clone())
        .with_code(diagnostic.code)
        .with_message(&diagnostic.message)
        .with_config(config)
        .with_label(
            Label::new(primary)
                .with_message(&diagnostic.message)
                .with_color(Color::Red),
        );

    // `RelatedInfo` carries a line/column `Range`, not a byte `Span`, so it
    // cannot be placed as its own ariadne label without re-deriving a byte
    // offset; fold it into the help text instead.
    if let Some(first) = diagnostic.related.first() {
        builder.set_help(&first.message);
    }

    let mut buf = Vec::new();
    builder
        .finish()
        .write(ariadne::Source::from(source), &mut buf)
        .expect("diagnostic rendering should not fail");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}

fn clamp(range: StdRange<usize>, len: usize) -> StdRange<usize> {
    let start = range.start.min(len);
    let end = range.end.min(len).max(start);
    if start == end {
        start..end.saturating_add(1).min(len.max(1))
    } else {
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kieli_common::diagnostic::Diagnostic;
    use kieli_common::span::{Position, Range};

    #[test]
    fn renders_an_error_with_its_code() {
        let source = "fn f() = x";
        let range = Range::new(Position { line: 0, column: 9 }, Position { line: 0, column: 10 });
        let diag = Diagnostic::error(range, "E0300", "no definition for 'x' in scope");
        let rendered = render(&diag, Span::new(9, 10), source);
        assert!(rendered.contains("E0300"));
        assert!(rendered.contains("no definition for 'x' in scope"));
    }
}

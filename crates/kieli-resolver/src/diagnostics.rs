//! Small helpers for turning a byte [`Span`] plus a stable code into the
//! shared [`kieli_common::diagnostic::Diagnostic`] shape. Every other
//! resolver module goes through these rather than constructing a
//! `Diagnostic` by hand, so the span-to-range conversion happens in one
//! place.

use kieli_common::diagnostic::{Diagnostic, DiagnosticTag};
use kieli_common::span::{LineIndex, Span};

pub struct DiagnosticBuilder<'a> {
    line_index: &'a LineIndex,
    source: &'a str,
}

impl<'a> DiagnosticBuilder<'a> {
    pub fn new(line_index: &'a LineIndex, source: &'a str) -> Self {
        Self { line_index, source }
    }

    pub fn error(&self, span: Span, code: &'static str, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(self.line_index.range(self.source, span), code, message)
    }

    pub fn warning(&self, span: Span, code: &'static str, message: impl Into<String>) -> Diagnostic {
        Diagnostic::warning(self.line_index.range(self.source, span), code, message)
    }

    pub fn with_related(&self, diagnostic: Diagnostic, span: Span, message: impl Into<String>) -> Diagnostic {
        diagnostic.with_related(self.line_index.range(self.source, span), message)
    }

    pub fn with_tag(&self, diagnostic: Diagnostic, tag: DiagnosticTag) -> Diagnostic {
        diagnostic.with_tag(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kieli_diagnostics::codes::name::UNDEFINED_NAME;

    #[test]
    fn error_converts_span_to_line_column_range() {
        let source = "fn f() = x";
        let line_index = LineIndex::new(source);
        let builder = DiagnosticBuilder::new(&line_index, source);
        let diag = builder.error(Span::new(9, 10), UNDEFINED_NAME, "no definition for 'x' in scope");
        assert_eq!(diag.range.start.column, 9);
        assert_eq!(diag.range.stop.column, 10);
    }
}

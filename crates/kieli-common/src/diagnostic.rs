//! The diagnostic shape shared by every pipeline stage.
//!
//! Lexer, parser, desugarer, and resolver all emit [`Diagnostic`] values
//! through a [`DiagnosticSink`] instead of throwing; this keeps compilation
//! single-pass and lets callers collect every diagnostic in pipeline order.

use serde::Serialize;

use crate::span::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticTag {
    Unnecessary,
    Deprecated,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedInfo {
    pub range: Range,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub range: Range,
    pub severity: Severity,
    pub message: String,
    pub code: &'static str,
    pub related: Vec<RelatedInfo>,
    pub tag: Option<DiagnosticTag>,
}

impl Diagnostic {
    pub fn error(range: Range, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: Severity::Error,
            message: message.into(),
            code,
            related: Vec::new(),
            tag: None,
        }
    }

    pub fn warning(range: Range, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            range,
            severity: Severity::Warning,
            message: message.into(),
            code,
            related: Vec::new(),
            tag: None,
        }
    }

    pub fn with_related(mut self, range: Range, message: impl Into<String>) -> Self {
        self.related.push(RelatedInfo {
            range,
            message: message.into(),
        });
        self
    }

    pub fn with_tag(mut self, tag: DiagnosticTag) -> Self {
        self.tag = Some(tag);
        self
    }
}

/// Receives diagnostics as they are produced by a pipeline stage.
///
/// A `Vec<Diagnostic>` implements this trait directly so tests and simple
/// callers can pass `&mut Vec::new()`.
pub trait DiagnosticSink {
    fn push(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn push(&mut self, diagnostic: Diagnostic) {
        Vec::push(self, diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    fn range() -> Range {
        Range::new(Position { line: 0, column: 0 }, Position { line: 0, column: 1 })
    }

    #[test]
    fn error_constructor_sets_severity() {
        let diag = Diagnostic::error(range(), "E0001", "boom");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code, "E0001");
        assert_eq!(diag.message, "boom");
    }

    #[test]
    fn with_related_appends_entries() {
        let diag = Diagnostic::error(range(), "E0001", "boom").with_related(range(), "see here");
        assert_eq!(diag.related.len(), 1);
        assert_eq!(diag.related[0].message, "see here");
    }

    #[test]
    fn vec_sink_collects_in_order() {
        let mut sink: Vec<Diagnostic> = Vec::new();
        sink.push(Diagnostic::error(range(), "E0001", "first"));
        sink.push(Diagnostic::warning(range(), "W0001", "second"));
        assert_eq!(sink.len(), 2);
        assert_eq!(sink[0].message, "first");
        assert_eq!(sink[1].severity, Severity::Warning);
    }
}

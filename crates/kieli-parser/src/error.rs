//! Parse error type.

use kieli_common::span::Span;

/// A single parse error: a message pinned to a span, with an optional
/// related span for additional context (e.g. "`{` opened here").
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    pub related: Option<RelatedSpan>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelatedSpan {
    pub message: String,
    pub span: Span,
}

impl ParseError {
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            related: None,
        }
    }

    pub fn with_related(
        message: impl Into<String>,
        span: Span,
        related_message: impl Into<String>,
        related_span: Span,
    ) -> Self {
        Self {
            message: message.into(),
            span,
            related: Some(RelatedSpan {
                message: related_message.into(),
                span: related_span,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_error_has_no_related_span() {
        let err = ParseError::new("expected `}`", Span::new(3, 4));
        assert!(err.related.is_none());
    }

    #[test]
    fn with_related_attaches_context() {
        let err = ParseError::with_related(
            "expected `}`",
            Span::new(10, 11),
            "`{` opened here",
            Span::new(0, 1),
        );
        assert_eq!(err.related.unwrap().span, Span::new(0, 1));
    }
}

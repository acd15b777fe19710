//! Conversion from the internal [`Diagnostic`] shape to `lsp_types::Diagnostic`,
//! per the 1:1 mapping described in the query layer's external interface.

use kieli_common::diagnostic::{Diagnostic, DiagnosticTag, Severity};
use kieli_common::span::{Position, Range};
use lsp_types::NumberOrString;

pub fn to_lsp_position(position: Position) -> lsp_types::Position {
    lsp_types::Position { line: position.line, character: position.column }
}

pub fn to_lsp_range(range: Range) -> lsp_types::Range {
    lsp_types::Range { start: to_lsp_position(range.start), end: to_lsp_position(range.stop) }
}

fn to_lsp_severity(severity: Severity) -> lsp_types::DiagnosticSeverity {
    match severity {
        Severity::Error => lsp_types::DiagnosticSeverity::ERROR,
        Severity::Warning => lsp_types::DiagnosticSeverity::WARNING,
        Severity::Information => lsp_types::DiagnosticSeverity::INFORMATION,
        Severity::Hint => lsp_types::DiagnosticSeverity::HINT,
    }
}

fn to_lsp_tag(tag: DiagnosticTag) -> lsp_types::DiagnosticTag {
    match tag {
        DiagnosticTag::Unnecessary => lsp_types::DiagnosticTag::UNNECESSARY,
        DiagnosticTag::Deprecated => lsp_types::DiagnosticTag::DEPRECATED,
    }
}

/// Convert one internal [`Diagnostic`] into its LSP wire shape. `uri` is the
/// document's own URI, reused for every `related_information` entry since
/// the resolver currently only points back into the same document.
pub fn to_lsp_diagnostic(diagnostic: &Diagnostic, uri: &lsp_types::Url) -> lsp_types::Diagnostic {
    let related_information = if diagnostic.related.is_empty() {
        None
    } else {
        Some(
            diagnostic
                .related
                .iter()
                .map(|related| lsp_types::DiagnosticRelatedInformation {
                    location: lsp_types::Location { uri: uri.clone(), range: to_lsp_range(related.range) },
                    message: related.message.clone(),
                })
                .collect(),
        )
    };

    lsp_types::Diagnostic {
        range: to_lsp_range(diagnostic.range),
        severity: Some(to_lsp_severity(diagnostic.severity)),
        code: Some(NumberOrString::String(diagnostic.code.to_owned())),
        code_description: None,
        source: Some("kieli".to_owned()),
        message: diagnostic.message.clone(),
        related_information,
        tags: diagnostic.tag.map(|tag| vec![to_lsp_tag(tag)]),
        data: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kieli_common::diagnostic::Diagnostic;

    fn range() -> Range {
        Range::new(Position { line: 1, column: 0 }, Position { line: 1, column: 3 })
    }

    #[test]
    fn maps_severity_and_code() {
        let diag = Diagnostic::error(range(), "E0300", "no definition for 'x' in scope");
        let uri = lsp_types::Url::parse("file:///a.ki").unwrap();
        let lsp_diag = to_lsp_diagnostic(&diag, &uri);
        assert_eq!(lsp_diag.severity, Some(lsp_types::DiagnosticSeverity::ERROR));
        assert_eq!(lsp_diag.code, Some(NumberOrString::String("E0300".to_owned())));
        assert_eq!(lsp_diag.range.start.line, 1);
    }

    #[test]
    fn related_info_resolves_to_same_document() {
        let diag = Diagnostic::error(range(), "E0300", "shadowed").with_related(range(), "previously declared here");
        let uri = lsp_types::Url::parse("file:///a.ki").unwrap();
        let lsp_diag = to_lsp_diagnostic(&diag, &uri);
        let related = lsp_diag.related_information.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].message, "previously declared here");
    }
}

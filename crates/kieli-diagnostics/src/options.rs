//! Compiler-behavior configuration, threaded into `compile()` alongside the
//! diagnostic sink. Distinct from a project manifest: this is the knobs a
//! single compilation run is invoked with, not where a project's source
//! roots or dependencies live.

use kieli_common::diagnostic::{Diagnostic, Severity};

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub warnings_as_errors: bool,
    pub max_diagnostics: Option<usize>,
    pub color: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self { warnings_as_errors: false, max_diagnostics: None, color: true }
    }
}

/// Apply `options` to a finished diagnostic list: promote warnings to
/// errors if requested, then truncate to `max_diagnostics` with a final
/// synthetic note. Compilation itself always runs to completion; only the
/// reported list is shaped here.
pub fn apply(options: &CompileOptions, diagnostics: &mut Vec<Diagnostic>) {
    if options.warnings_as_errors {
        for diagnostic in diagnostics.iter_mut() {
            if diagnostic.severity == Severity::Warning {
                diagnostic.severity = Severity::Error;
            }
        }
    }

    if let Some(max) = options.max_diagnostics {
        if diagnostics.len() > max {
            let suppressed = diagnostics.len() - max;
            diagnostics.truncate(max);
            if let Some(last) = diagnostics.last() {
                let note = Diagnostic::error(
                    last.range,
                    crate::codes::internal::DIAGNOSTIC_LIMIT_EXCEEDED,
                    format!("{suppressed} further diagnostics suppressed"),
                );
                diagnostics.push(note);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kieli_common::span::{Position, Range};

    fn dummy_range() -> Range {
        Range::new(Position { line: 0, column: 0 }, Position { line: 0, column: 1 })
    }

    #[test]
    fn warnings_as_errors_promotes_severity() {
        let mut diagnostics =
            vec![Diagnostic::warning(dummy_range(), crate::codes::style::UNUSED_VARIABLE, "unused".to_owned())];
        apply(&CompileOptions { warnings_as_errors: true, ..Default::default() }, &mut diagnostics);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn max_diagnostics_truncates_with_a_note() {
        let mut diagnostics = vec![
            Diagnostic::error(dummy_range(), crate::codes::name::UNDEFINED_NAME, "a".to_owned()),
            Diagnostic::error(dummy_range(), crate::codes::name::UNDEFINED_NAME, "b".to_owned()),
            Diagnostic::error(dummy_range(), crate::codes::name::UNDEFINED_NAME, "c".to_owned()),
        ];
        apply(&CompileOptions { max_diagnostics: Some(1), ..Default::default() }, &mut diagnostics);
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[1].message.contains("2 further diagnostics suppressed"));
    }
}

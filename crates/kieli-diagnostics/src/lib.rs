//! Error taxonomy, message rendering, and LSP conversion shared by every
//! compilation stage. A single [`kieli_common::diagnostic::Diagnostic`]
//! shape flows uniformly from lexer through resolver; this crate only adds
//! the stable codes that shape is tagged with and the two render targets
//! (terminal text via ariadne, LSP wire types via `lsp_types`).

pub mod codes;
pub mod lsp;
pub mod options;
pub mod render;
pub mod semantic_tokens;

pub use kieli_common::diagnostic::{Diagnostic, DiagnosticTag, RelatedInfo, Severity};
pub use lsp::{to_lsp_diagnostic, to_lsp_position, to_lsp_range};
pub use options::CompileOptions;
pub use render::render;
pub use semantic_tokens::{encode_delta, ClassifiedToken, SemanticTokenClass, SEMANTIC_TOKEN_CLASSES};

//! Rowan-based concrete syntax tree types for Kieli.
//!
//! Defines the `KieliLanguage` marker type that connects [`SyntaxKind`] to
//! rowan's generic tree infrastructure, plus type aliases for convenience.

use crate::syntax_kind::SyntaxKind;

/// Marker type for Kieli's language in rowan's generic tree system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KieliLanguage {}

impl rowan::Language for KieliLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        // Safety: SyntaxKind is #[repr(u16)] and rowan only ever stores
        // kinds that we previously produced via kind_to_raw.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

/// A CST node (interior node with children).
pub type SyntaxNode = rowan::SyntaxNode<KieliLanguage>;

/// A CST token (leaf node with text).
pub type SyntaxToken = rowan::SyntaxToken<KieliLanguage>;

/// Either a node or a token in the CST.
pub type SyntaxElement = rowan::SyntaxElement<KieliLanguage>;

/// Render a syntax tree as an indented debug dump, one node/token per line
/// with its kind and text range. Used by snapshot tests to pin tree shape.
pub fn debug_tree(node: &SyntaxNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node.clone().into(), 0);
    out
}

fn write_node(out: &mut String, element: SyntaxElement, depth: usize) {
    let indent = "  ".repeat(depth);
    match element {
        rowan::NodeOrToken::Node(node) => {
            out.push_str(&format!("{indent}{:?}@{:?}\n", node.kind(), node.text_range()));
            for child in node.children_with_tokens() {
                write_node(out, child, depth + 1);
            }
        }
        rowan::NodeOrToken::Token(token) => {
            if token.kind().is_trivia() {
                return;
            }
            out.push_str(&format!(
                "{indent}{:?}@{:?} {:?}\n",
                token.kind(),
                token.text_range(),
                token.text()
            ));
        }
    }
}

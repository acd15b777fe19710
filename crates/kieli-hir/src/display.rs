//! Rendering a resolved [`Type`] back into source-like text, for hover
//! output and diagnostic messages. Never round-trips through the parser;
//! this is a one-way, best-effort rendering of whatever the arena holds,
//! including unsolved unification variables and template placeholders a
//! parsed annotation could never spell.

use kieli_common::arena::Arena;
use kieli_common::interner::StringInterner;

use crate::symbol::Symbol;
use crate::ty::{Mutability, Primitive, Type, TypeArena, TypeVariant};

fn primitive_name(primitive: Primitive) -> &'static str {
    match primitive {
        Primitive::I8 => "I8",
        Primitive::I16 => "I16",
        Primitive::I32 => "I32",
        Primitive::I64 => "I64",
        Primitive::U8 => "U8",
        Primitive::U16 => "U16",
        Primitive::U32 => "U32",
        Primitive::U64 => "U64",
        Primitive::Float => "Float",
        Primitive::Char => "Char",
        Primitive::Bool => "Bool",
        Primitive::String => "String",
    }
}

fn render_mutability(mutability: Mutability, strings: &StringInterner) -> String {
    match mutability {
        Mutability::Concrete(true) => "mut ".to_owned(),
        Mutability::Concrete(false) => String::new(),
        Mutability::Parameterized(name) => format!("{} ", strings.resolve(name)),
        Mutability::Variable(_) => String::new(),
    }
}

/// Render `ty` as Kieli surface syntax, resolving structure/enumeration
/// names through `symbols` and every interned name through `strings`.
pub fn render_type(types: &TypeArena, symbols: &Arena<Symbol>, strings: &StringInterner, ty: Type) -> String {
    match types.get(ty) {
        TypeVariant::Primitive(primitive) => primitive_name(*primitive).to_owned(),
        TypeVariant::IntegralUnificationVariable(_) => "{integer}".to_owned(),
        TypeVariant::UnificationVariable(_) => "_".to_owned(),
        TypeVariant::Tuple(elements) => {
            let rendered: Vec<String> = elements.iter().map(|&e| render_type(types, symbols, strings, e)).collect();
            format!("({})", rendered.join(", "))
        }
        TypeVariant::Array { element, length } => {
            format!("[{}; {length}]", render_type(types, symbols, strings, *element))
        }
        TypeVariant::Slice(element) => format!("[{}]", render_type(types, symbols, strings, *element)),
        TypeVariant::Function { params, ret } => {
            let rendered: Vec<String> = params.iter().map(|&p| render_type(types, symbols, strings, p)).collect();
            format!("fn({}) -> {}", rendered.join(", "), render_type(types, symbols, strings, *ret))
        }
        TypeVariant::Reference { mutability, referent } => {
            format!("&{}{}", render_mutability(*mutability, strings), render_type(types, symbols, strings, *referent))
        }
        TypeVariant::Pointer { mutability, pointee } => {
            format!("*{}{}", render_mutability(*mutability, strings), render_type(types, symbols, strings, *pointee))
        }
        TypeVariant::Structure { id, arguments, .. } | TypeVariant::Enumeration { id, arguments, .. } => {
            let name = strings.resolve(symbols.get(*id).name);
            if arguments.is_empty() {
                name.to_owned()
            } else {
                let rendered: Vec<String> =
                    arguments.iter().map(|&a| render_type(types, symbols, strings, a)).collect();
                format!("{name}::<{}>", rendered.join(", "))
            }
        }
        TypeVariant::TemplateParameterReference(name) => strings.resolve(*name).to_owned(),
        TypeVariant::SelfPlaceholder => "Self".to_owned(),
        TypeVariant::Error => "{error}".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolVariant;
    use kieli_common::span::{Position, Range};

    fn dummy_range() -> Range {
        Range::new(Position { line: 0, column: 0 }, Position { line: 0, column: 1 })
    }

    #[test]
    fn renders_primitive() {
        let mut types = TypeArena::new();
        let symbols: Arena<Symbol> = Arena::new();
        let strings = StringInterner::new();
        let ty = types.alloc(TypeVariant::Primitive(Primitive::I32));
        assert_eq!(render_type(&types, &symbols, &strings, ty), "I32");
    }

    #[test]
    fn renders_reference_and_tuple() {
        let mut types = TypeArena::new();
        let symbols: Arena<Symbol> = Arena::new();
        let strings = StringInterner::new();
        let i32_ty = types.alloc(TypeVariant::Primitive(Primitive::I32));
        let bool_ty = types.alloc(TypeVariant::Primitive(Primitive::Bool));
        let tuple = types.alloc(TypeVariant::Tuple(vec![i32_ty, bool_ty]));
        let reference = types.alloc(TypeVariant::Reference { mutability: Mutability::Concrete(true), referent: tuple });
        assert_eq!(render_type(&types, &symbols, &strings, reference), "&mut (I32, Bool)");
    }

    #[test]
    fn renders_structure_by_name() {
        let mut types = TypeArena::new();
        let mut symbols: Arena<Symbol> = Arena::new();
        let mut strings = StringInterner::new();
        let name = strings.intern("Point");
        let dummy_ty = types.alloc(TypeVariant::Error);
        let id = symbols.alloc(Symbol::new(name, dummy_range(), SymbolVariant::Structure { ty: dummy_ty }));
        let structure = types.alloc(TypeVariant::Structure { id, arguments: Vec::new(), is_template_application: false });
        assert_eq!(render_type(&types, &symbols, &strings, structure), "Point");
    }
}

//! The stable `code` strings every diagnostic is tagged with, grouped by the
//! taxonomy kinds they belong to. Editor tooling and tests match on these
//! instead of a message substring, so changing wording never breaks a test
//! that pins a code.

/// Lexical errors: tokenizing the source text.
pub mod lexical {
    pub const UNTERMINATED_STRING: &str = "E0100";
    pub const UNTERMINATED_COMMENT: &str = "E0101";
    pub const BAD_ESCAPE: &str = "E0102";
    pub const BAD_NUMBER: &str = "E0103";
    pub const SUFFIX_AFTER_NUMBER: &str = "E0104";
    pub const SEPARATOR_MISUSE: &str = "E0105";
    pub const NEGATIVE_INTEGER_EXPONENT: &str = "E0106";
    pub const BASE_ON_FLOAT: &str = "E0107";
}

/// Syntactic errors: parsing the token stream into a CST.
pub mod syntactic {
    pub const EXPECTED_X: &str = "E0200";
    pub const UNEXPECTED_TOKEN: &str = "E0201";
    pub const UNTERMINATED_DELIMITER: &str = "E0202";
    pub const UNKNOWN_TOP_LEVEL: &str = "E0203";
}

/// Name-resolution errors: path and identifier lookup.
pub mod name {
    pub const UNDEFINED_NAME: &str = "E0300";
    pub const NAMESPACE_MISSING_MEMBER: &str = "E0301";
    pub const GLOBAL_MISSING_MEMBER: &str = "E0302";
    pub const ABBREVIATED_CTOR_WITHOUT_ENUM: &str = "E0303";
}

/// Type and mutability errors: unification, coercion, struct/template checks.
pub mod ty {
    pub const UNIFICATION_FAILURE: &str = "E0400";
    pub const RECURSIVE_SOLUTION: &str = "E0401";
    pub const COERCION_FAILURE: &str = "E0402";
    pub const MUTABILITY_VIOLATION: &str = "E0403";
    pub const UNSAFE_VIOLATION: &str = "E0404";
    pub const STRUCT_FIELD_UNINIT: &str = "E0405";
    pub const STRUCT_FIELD_UNKNOWN: &str = "E0406";
    pub const ARITY_MISMATCH: &str = "E0407";
    pub const TEMPLATE_ARGUMENT_COUNT: &str = "E0408";
    pub const TEMPLATE_DEFAULT_AFTER_EXPLICIT_OVERFLOW: &str = "E0409";
}

/// Semantic errors: control flow and generalization.
pub mod semantic {
    pub const INEXHAUSTIVE_PATTERN: &str = "E0500";
    pub const BREAK_OUTSIDE_LOOP: &str = "E0501";
    pub const CONTINUE_OUTSIDE_LOOP: &str = "E0502";
    pub const WHILE_VALUE_BREAK: &str = "E0503";
    pub const UNSOLVED_VARIABLE_IN_TOP_LEVEL_DEFINITION: &str = "E0504";
    pub const CIRCULAR_DEPENDENCY: &str = "E0505";
}

/// Style warnings: never block compilation on their own.
pub mod style {
    pub const UNUSED_VARIABLE: &str = "W0600";
    pub const SHADOWING_UNUSED_VARIABLE: &str = "W0601";
    pub const WHILE_TRUE_SUGGEST_LOOP: &str = "W0602";
    pub const WHILE_FALSE_UNREACHABLE: &str = "W0603";
}

/// A programmer bug surfacing as a single fatal diagnostic rather than a
/// user error; these abort compilation instead of substituting an `Error`
/// placeholder and continuing.
pub mod internal {
    pub const INVARIANT_VIOLATION: &str = "E0900";
    pub const DIAGNOSTIC_LIMIT_EXCEEDED: &str = "E0901";
}

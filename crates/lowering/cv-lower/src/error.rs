//! Lowering errors
//!
//! Every variant carries the location of the offending node. All of them
//! describe an invalid input program; none is worth retrying.

use cv_ir::IrType;
use cv_span::FileSpan;
use miette::Diagnostic;
use thiserror::Error;

/// Result type for lowering operations
pub type LowerResult<T> = Result<T, LowerError>;

/// Errors that abort the lowering of a program
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum LowerError {
    /// Type name with no registered mapping
    #[error("unknown type `{name}`")]
    #[diagnostic(code(lower::unknown_type), help("the available types are `int` and `void`"))]
    UnknownType {
        /// Type name as written
        name: String,
        /// Source location
        #[label("not a known type")]
        span: FileSpan,
    },

    /// Parameter or variable declared `void`
    #[error("`{name}` cannot have type `void`")]
    #[diagnostic(code(lower::void_binding), help("only function return types may be `void`"))]
    VoidBinding {
        /// Binding name
        name: String,
        /// Source location
        #[label("declared `void` here")]
        span: FileSpan,
    },

    /// Name declared twice in the same scope
    #[error("`{name}` is already declared in this scope")]
    #[diagnostic(code(lower::redeclaration), help("shadowing is only allowed in a nested block"))]
    Redeclaration {
        /// The redeclared name
        name: String,
        /// First declaration
        #[label("first declared here")]
        first: FileSpan,
        /// Offending declaration
        #[label("declared again here")]
        second: FileSpan,
    },

    /// Name not bound in any enclosing scope
    #[error("use of undeclared identifier `{name}`")]
    #[diagnostic(code(lower::undeclared_identifier))]
    UndeclaredIdentifier {
        /// The unknown name
        name: String,
        /// Visible names that are spelled similarly
        suggestions: Vec<String>,
        /// Rendered suggestion
        #[help]
        help: Option<String>,
        /// Source location
        #[label("not found in this scope")]
        span: FileSpan,
    },

    /// Node the IR cannot express
    #[error("unsupported construct: {construct}")]
    #[diagnostic(code(lower::unsupported_construct))]
    UnsupportedConstruct {
        /// Description of the construct
        construct: String,
        /// Source location
        #[label("not supported here")]
        span: FileSpan,
    },

    /// Control can fall off the end of a function that must return
    #[error("function `{function}` can reach its end without returning")]
    #[diagnostic(code(lower::missing_return), help("add a `return` on every path"))]
    MissingReturn {
        /// Function name
        function: String,
        /// Location of the function body
        #[label("control reaches the end of this body")]
        span: FileSpan,
    },

    /// Two functions with the same name
    #[error("function `{name}` is defined more than once")]
    #[diagnostic(code(lower::duplicate_function))]
    DuplicateFunction {
        /// Function name
        name: String,
        /// First definition
        #[label("first defined here")]
        first: FileSpan,
        /// Offending definition
        #[label("defined again here")]
        second: FileSpan,
    },

    /// Statement after a `return`, `break` or `continue`
    #[error("unreachable statement")]
    #[diagnostic(code(lower::unreachable_code), help("remove the statement or the jump before it"))]
    UnreachableCode {
        /// The unreachable statement
        #[label("this statement can never run")]
        span: FileSpan,
    },

    /// Value of the wrong type
    #[error("type mismatch in {context}: expected `{expected}`, found `{found}`")]
    #[diagnostic(code(lower::type_mismatch))]
    TypeMismatch {
        /// Where the value was used
        context: String,
        /// Required type
        expected: IrType,
        /// Actual type
        found: IrType,
        /// Source location
        #[label("this has type `{found}`")]
        span: FileSpan,
    },

    /// Integer literal outside the `i32` range
    #[error("integer literal `{value}` does not fit in `i32`")]
    #[diagnostic(code(lower::literal_out_of_range))]
    LiteralOutOfRange {
        /// Literal value
        value: i64,
        /// Source location
        #[label("out of range")]
        span: FileSpan,
    },

    /// `break` or `continue` with no enclosing loop
    #[error("`{keyword}` outside of a loop")]
    #[diagnostic(code(lower::jump_outside_loop))]
    JumpOutsideLoop {
        /// `break` or `continue`
        keyword: String,
        /// Source location
        #[label("no enclosing loop")]
        span: FileSpan,
    },
}

impl LowerError {
    /// Stable name of the error kind, used at the request boundary
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownType { .. } => "UnknownTypeError",
            Self::VoidBinding { .. } => "VoidBindingError",
            Self::Redeclaration { .. } => "RedeclarationError",
            Self::UndeclaredIdentifier { .. } => "UndeclaredIdentifierError",
            Self::UnsupportedConstruct { .. } => "UnsupportedConstructError",
            Self::MissingReturn { .. } => "MissingReturnError",
            Self::DuplicateFunction { .. } => "DuplicateFunctionError",
            Self::UnreachableCode { .. } => "UnreachableCodeError",
            Self::TypeMismatch { .. } => "TypeMismatchError",
            Self::LiteralOutOfRange { .. } => "LiteralOutOfRangeError",
            Self::JumpOutsideLoop { .. } => "JumpOutsideLoopError",
        }
    }

    /// Location of the offending node
    pub fn span(&self) -> FileSpan {
        match self {
            Self::UnknownType { span, .. }
            | Self::VoidBinding { span, .. }
            | Self::UndeclaredIdentifier { span, .. }
            | Self::UnsupportedConstruct { span, .. }
            | Self::MissingReturn { span, .. }
            | Self::UnreachableCode { span }
            | Self::TypeMismatch { span, .. }
            | Self::LiteralOutOfRange { span, .. }
            | Self::JumpOutsideLoop { span, .. } => *span,
            Self::Redeclaration { second, .. } | Self::DuplicateFunction { second, .. } => *second,
        }
    }

    /// Builds an [`LowerError::UndeclaredIdentifier`] with "did you mean"
    /// suggestions drawn from `visible`
    pub fn undeclared<'name>(
        name: &str,
        span: FileSpan,
        visible: impl IntoIterator<Item = &'name str>,
    ) -> Self {
        let suggestions = compute_suggestions(name, visible);
        let help = match suggestions.as_slice() {
            [] => None,
            [only] => Some(format!("did you mean `{only}`?")),
            many => Some(format!(
                "did you mean one of {}?",
                many.iter().map(|name| format!("`{name}`")).collect::<Vec<_>>().join(", ")
            )),
        };
        Self::UndeclaredIdentifier {
            name: name.to_string(),
            suggestions,
            help,
            span,
        }
    }
}

/// Up to three names within edit distance 2, closest first
fn compute_suggestions<'name>(target: &str, available: impl IntoIterator<Item = &'name str>) -> Vec<String> {
    let mut suggestions: Vec<(&str, usize)> = available
        .into_iter()
        .filter(|candidate| *candidate != target)
        .map(|candidate| (candidate, levenshtein_distance(target, candidate)))
        .filter(|(_, distance)| *distance <= 2)
        .collect();

    suggestions.sort_by(|left, right| left.1.cmp(&right.1).then_with(|| left.0.cmp(right.0)));
    suggestions.dedup_by(|left, right| left.0 == right.0);
    suggestions
        .into_iter()
        .take(3)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Compute Levenshtein distance between two strings
fn levenshtein_distance(source: &str, target: &str) -> usize {
    let source: Vec<char> = source.chars().collect();
    let target: Vec<char> = target.chars().collect();

    if source.is_empty() {
        return target.len();
    }
    if target.is_empty() {
        return source.len();
    }

    let mut previous: Vec<usize> = (0..=target.len()).collect();
    let mut current = vec![0; target.len() + 1];
    for (idx, source_char) in source.iter().enumerate() {
        current[0] = idx + 1;
        for (jdx, target_char) in target.iter().enumerate() {
            let cost = usize::from(source_char != target_char);
            current[jdx + 1] = (previous[jdx + 1] + 1)
                .min(current[jdx] + 1)
                .min(previous[jdx] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[target.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "def"), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("saturday", "sunday"), 3);
    }

    #[test]
    fn test_suggestions_are_sorted_and_limited() {
        let visible = ["count", "cont", "amount", "counter", "coun"];
        let suggestions = compute_suggestions("coutn", visible);
        assert_eq!(suggestions, vec!["count", "coun", "cont"]);
    }

    #[test]
    fn test_undeclared_help_text() {
        let err = LowerError::undeclared("totl", FileSpan::default(), ["total", "x"]);
        let LowerError::UndeclaredIdentifier { help, suggestions, .. } = &err else {
            panic!("wrong variant");
        };
        assert_eq!(suggestions, &vec!["total".to_string()]);
        assert_eq!(help.as_deref(), Some("did you mean `total`?"));
        assert_eq!(err.kind(), "UndeclaredIdentifierError");
    }
}

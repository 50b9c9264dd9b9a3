use thiserror::Error;

use super::memory::ValueType;

/// Every fatal condition raised while resolving names, laying out structs or
/// generating code. Compilation stops at the first one.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CompilerError {
    #[error("undeclared variable `{0}`")]
    UndeclaredVariable(String),
    #[error("undeclared function `{0}`")]
    UndeclaredFunction(String),
    #[error("undefined struct type `{0}`")]
    UndefinedStructType(String),
    #[error("struct `{0}` is already defined")]
    DuplicateStructDefinition(String),
    #[error("function `{0}` is already defined")]
    DuplicateFunctionDefinition(String),
    #[error("field `{field}` of struct `{struct_name}` has unsupported type `{ty}`")]
    UnsupportedFieldType {
        struct_name: String,
        field: String,
        ty: String,
    },
    #[error("struct `{struct_name}` has no field `{field}`")]
    UndefinedField { struct_name: String, field: String },
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),
    #[error("invalid assignment target: {0}")]
    InvalidLvalue(String),
    #[error("arity or shape mismatch: {0}")]
    ArityOrShapeMismatch(String),
    #[error("{context}: expected {expected} but found {found}")]
    TypeMismatch {
        expected: ValueType,
        found: ValueType,
        context: String,
    },
    #[error("missing return at end of function `{0}`")]
    MissingReturn(String),
    #[error("cannot declare `{0}`: no scope is open")]
    NoScope(String),
    #[error("in function `{name}`: {source}")]
    InFunction {
        name: String,
        source: Box<CompilerError>,
    },
}

impl CompilerError {
    /// Strips any function context and returns the underlying error.
    pub fn root(&self) -> &CompilerError {
        match self {
            CompilerError::InFunction { source, .. } => source.root(),
            e => e,
        }
    }

    pub fn in_function(self, name: &str) -> CompilerError {
        CompilerError::InFunction {
            name: name.into(),
            source: Box::new(self),
        }
    }

    pub(crate) fn mismatch(expected: &ValueType, found: &ValueType, context: &str) -> Self {
        CompilerError::TypeMismatch {
            expected: expected.clone(),
            found: found.clone(),
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_strips_context() {
        let err = CompilerError::UndeclaredVariable("x".into()).in_function("main");
        assert_eq!(
            format!("{}", err),
            "in function `main`: undeclared variable `x`"
        );
        assert_eq!(*err.root(), CompilerError::UndeclaredVariable("x".into()));
    }

    #[test]
    fn test_type_mismatch_message() {
        let err = CompilerError::mismatch(&ValueType::Int, &ValueType::Str, "argument 1 of `f`");
        assert_eq!(
            format!("{}", err),
            "argument 1 of `f`: expected int but found string"
        );
    }
}

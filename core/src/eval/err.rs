use crate::error::{GuardErrorExt, Level};
use crate::location::{Location, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvalErrorKind {
    UnknownFunction,
    UnknownVariable,
    Arity,
    TypeMismatch,
    InvalidArgument,
    StepLimit,
    /// Calls nested deeper than the interpreter's depth limit.
    CallDepth,
}

#[derive(Debug, Clone)]
pub struct EvalError {
    kind: EvalErrorKind,
    message: String,
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, message: String) -> Self {
        EvalError { kind, message }
    }

    pub fn unknown_function(name: &str) -> Self {
        EvalError::new(EvalErrorKind::UnknownFunction, format!("no function named `{}`", name))
    }

    pub fn unknown_variable(name: &str) -> Self {
        EvalError::new(EvalErrorKind::UnknownVariable, format!("`{}` is not in scope", name))
    }

    pub fn arity(name: &str, expected: usize, found: usize) -> Self {
        EvalError::new(
            EvalErrorKind::Arity,
            format!("`{}` takes {} argument(s), {} given", name, expected, found),
        )
    }

    pub fn type_mismatch(what: &str) -> Self {
        EvalError::new(EvalErrorKind::TypeMismatch, format!("type mismatch in {}", what))
    }

    pub fn kind(&self) -> EvalErrorKind {
        self.kind
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvalError {}

impl GuardErrorExt for EvalError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "nullguard.eval".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}

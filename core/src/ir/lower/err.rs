use crate::error::{Level, GuardErrorExt};
use crate::location::{Location, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoweringErrorKind {
    /// An earlier phase handed lowering something it promised never to.
    InvariantViolation,
    /// Compilation was cancelled between functions.
    Cancelled,
    /// A lowering worker thread panicked.
    WorkerPanic,
}

#[derive(Debug, Clone)]
pub struct LoweringError {
    kind: LoweringErrorKind,
    level: Level,
    message: String,
    issuer: String,
    location: Option<Location>,
    span: Option<Span>,
}

impl LoweringError {
    pub fn with(
        kind: LoweringErrorKind,
        level: Level,
        message: String,
        issuer: String,
        location: Option<Location>,
        span: Option<Span>,
    ) -> Self {
        LoweringError {
            kind,
            level,
            message,
            issuer,
            location,
            span,
        }
    }

    pub fn invariant(message: String, issuer: &str) -> Self {
        LoweringError::with(
            LoweringErrorKind::InvariantViolation,
            Level::Critical,
            message,
            issuer.to_string(),
            None,
            None,
        )
    }

    pub fn cancelled(module: &str) -> Self {
        LoweringError::with(
            LoweringErrorKind::Cancelled,
            Level::Error,
            format!("lowering of module `{}` was cancelled", module),
            "lower_module".to_string(),
            None,
            None,
        )
    }

    pub fn worker_panic(module: &str) -> Self {
        LoweringError::with(
            LoweringErrorKind::WorkerPanic,
            Level::Critical,
            format!("a lowering worker for module `{}` panicked", module),
            "lower_module".to_string(),
            None,
            None,
        )
    }

    pub fn kind(&self) -> LoweringErrorKind {
        self.kind
    }
}

impl std::fmt::Display for LoweringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{} at {}", self.message, loc)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for LoweringError {}

impl GuardErrorExt for LoweringError {
    fn level(&self) -> Level {
        self.level
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        self.issuer.clone()
    }

    fn span(&self) -> Option<Span> {
        self.span.clone()
    }

    fn location(&self) -> Option<Location> {
        self.location.clone()
    }
}

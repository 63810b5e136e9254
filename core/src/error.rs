use std::fmt;

/// Severity of a reported error, printed as the second column of a report
/// line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    /// Bad input or an interrupted run: an unreadable module file, malformed
    /// JSON, an unknown function, a wrong argument count or cancellation.
    Error,
    /// An internal defect. Either a bound tree that an earlier phase should
    /// have rejected, such as a null-checked parameter of a plain value type,
    /// or a panicking lowering worker. Lowering of the module stops.
    Critical,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level_str = match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Critical => "CRITICAL",
        };
        write!(f, "{}", level_str)
    }
}

/// Common surface of every error raised by the lowering pipeline
/// (`LoweringError`), the source loader (`SourceError`) and the evaluator
/// (`EvalError`), so the CLI can report all of them through
/// `generate_error_report`.
pub trait GuardErrorExt {
    fn level(&self) -> Level;
    fn message(&self) -> String;
    /// Component that raised the error, e.g. `null_check::build_condition`
    /// or `nullguard.source`.
    fn issuer(&self) -> String;
    fn span(&self) -> Option<crate::location::Span>;
    /// Position in a module source file, when the error came from parsing
    /// one. Lowering and evaluation errors carry none.
    fn location(&self) -> Option<crate::location::Location>;
}

impl fmt::Debug for dyn GuardErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let loc_str = match self.location() {
            Some(loc) => loc.to_string(),
            None => "unknown".to_string(),
        };
        let span_str = match self.span() {
            Some(span) => span.to_string(),
            None => "span:none".to_string(),
        };

        write!(
            f,
            "NULLGUARD | {} | {} | {} | {} | {}",
            self.level(),
            loc_str,
            self.issuer(),
            span_str,
            self.message()
        )
    }
}

impl fmt::Display for dyn GuardErrorExt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

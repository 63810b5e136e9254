use nullguard_core::location::{Location, Span};
use nullguard_core::{GuardErrorExt, Level};

/// Failures of the front end itself: bad arguments and unwritable output.
#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        CliError { message: message.into() }
    }

    pub fn boxed(message: impl Into<String>) -> Box<dyn GuardErrorExt> {
        Box::new(CliError::new(message))
    }
}

/// Erase a layer's error type for reporting.
pub fn boxed<E: GuardErrorExt + 'static>(e: E) -> Box<dyn GuardErrorExt> {
    Box::new(e)
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl GuardErrorExt for CliError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "nullguard.cli".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}

pub mod error;
pub mod eval;
pub mod ir;
pub mod location;
pub mod source;
pub mod symbols;

use std::path::Path;

pub use error::{GuardErrorExt, Level};
pub use eval::{Interpreter, Outcome, Value};
pub use ir::{LoweredFunction, LoweredModule, LoweringOptions, lower_module};
pub use location::{Location, Span};
pub use source::{FunctionDecl, ModuleSource};

pub fn generate_error_report<E: GuardErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("NULLGUARD | {} | {} | {}", level, location, message)
}

/// Load the module at `path` and lower it.
pub fn lower_source_file(
    path: &Path,
    options: &LoweringOptions,
) -> Result<LoweredModule, Box<dyn GuardErrorExt>> {
    let source = ModuleSource::load(path).map_err(|e| Box::new(e) as Box<dyn GuardErrorExt>)?;
    lower_module(&source, options).map_err(|e| Box::new(e) as Box<dyn GuardErrorExt>)
}

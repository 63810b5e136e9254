//! file: core/src/eval/mod.rs
//! description: tree-walking evaluator over lowered modules.
//!
//! Runs lowered function bodies and the module's synthesized helpers so the
//! runtime effect of a rewrite can be observed: a triggered guard surfaces
//! as `Outcome::Threw` carrying the `ArgumentNullException`.

pub mod err;
pub mod exec;
pub mod value;

pub use self::err::{EvalError, EvalErrorKind};
pub use self::exec::{Interpreter, Outcome};
pub use self::value::Value;

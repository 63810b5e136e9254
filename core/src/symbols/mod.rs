//! Symbols consumed by lowering: types, parameters and methods.
//!
//! These are produced by earlier phases (or by the source loader) and are
//! read-only by the time null-check lowering runs.

pub mod method;
pub mod param;
pub mod types;

pub use method::{MethodKind, MethodRef, MethodSymbol};
pub use param::ParameterSymbol;
pub use types::{TypeKind, TypeSymbol};

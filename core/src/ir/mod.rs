pub mod factory;
pub mod lower;
pub mod module;
pub mod node;
pub mod pretty;
pub mod synthesized;
pub mod well_known;

pub use self::factory::{NodeFactory, SyntheticNodeFactory};
pub use self::lower::{LoweredFunction, LoweredModule, LoweringOptions, lower_module};
pub use self::module::CompilationModule;
pub use self::node::{BinaryOp, BoundBlock, BoundExpr, BoundStmt, Literal, LocalSymbol, UnaryOp};
pub use self::synthesized::{SynthesizedMembers, SynthesizedMethod};

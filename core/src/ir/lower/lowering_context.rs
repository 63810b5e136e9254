//! file: core/src/ir/lower/lowering_context.rs
//! description: shared lowering context used while rewriting function bodies.
//!
//! `LoweringContext` bundles what every rewrite step needs: the module being
//! compiled (for its synthesized members and well-known symbols), the node
//! factory, and the name of the function currently being lowered. It only
//! borrows, so one context per module can be handed to every worker.

use crate::ir::factory::NodeFactory;
use crate::ir::module::CompilationModule;

#[derive(Clone, Copy)]
pub struct LoweringContext<'a> {
    module: &'a CompilationModule,
    factory: &'a dyn NodeFactory,
    function: Option<&'a str>,
}

impl<'a> LoweringContext<'a> {
    pub fn new(module: &'a CompilationModule, factory: &'a dyn NodeFactory) -> Self {
        LoweringContext { module, factory, function: None }
    }

    /// The same context, scoped to the function named `name`.
    pub fn for_function(&self, name: &'a str) -> Self {
        LoweringContext { function: Some(name), ..*self }
    }

    pub fn module(&self) -> &'a CompilationModule {
        self.module
    }

    pub fn factory(&self) -> &'a dyn NodeFactory {
        self.factory
    }

    pub fn current_function(&self) -> Option<&'a str> {
        self.function
    }
}

impl std::fmt::Debug for LoweringContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoweringContext")
            .field("module", &self.module.name())
            .field("function", &self.function)
            .finish()
    }
}

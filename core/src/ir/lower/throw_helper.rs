//! The module's shared `ThrowIfNull(string name)` helper.
//!
//! Every null guard in a module calls the same helper, which is created on
//! first request and registered in the module's synthesized members.

use log::debug;

use crate::ir::factory::NodeFactory;
use crate::ir::module::CompilationModule;
use crate::ir::synthesized::SynthesizedMethod;
use crate::ir::well_known::{SpecialType, THROW_IF_NULL_METHOD_NAME, special_type};
use crate::symbols::{MethodRef, MethodSymbol, ParameterSymbol};

/// The module's throw helper, synthesizing it on first use. Concurrent
/// callers all receive the same `MethodRef`.
pub fn get_or_create_throw_helper(module: &CompilationModule, factory: &dyn NodeFactory) -> MethodRef {
    let (helper, created) = module
        .synthesized()
        .get_or_add_method(THROW_IF_NULL_METHOD_NAME, || build_throw_helper(module, factory));
    if created {
        debug!(
            "synthesized {} in module `{}`",
            helper.qualified_name(),
            module.name()
        );
    }
    helper
}

/// `static void ThrowIfNull(string name) { throw new ArgumentNullException(name); }`
fn build_throw_helper(module: &CompilationModule, factory: &dyn NodeFactory) -> SynthesizedMethod {
    let name = ParameterSymbol::new("name", special_type(SpecialType::String), 0);
    let symbol = MethodSymbol::synthesized(
        module.synthesized().type_name(),
        THROW_IF_NULL_METHOD_NAME,
        vec![name.clone()],
        special_type(SpecialType::Void),
    );

    let ctor = module.well_known().argument_null_exception_ctor();
    let exception = factory.new_object(ctor, vec![factory.parameter(&name)]);
    let body = factory.block(Vec::new(), vec![factory.throw(exception)]);

    SynthesizedMethod { symbol, body }
}

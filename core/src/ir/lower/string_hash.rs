//! The module's shared `ComputeStringHash(string s)` helper: 32-bit FNV-1a
//! over the UTF-16 code units of `s`. Lives next to `ThrowIfNull` in the
//! synthesized members and follows the same get-or-create rules.

use log::debug;

use crate::ir::factory::NodeFactory;
use crate::ir::module::CompilationModule;
use crate::ir::node::{BinaryOp, LocalSymbol};
use crate::ir::synthesized::SynthesizedMethod;
use crate::ir::well_known::{SpecialType, STRING_HASH_METHOD_NAME, special_type};
use crate::symbols::{MethodRef, MethodSymbol, ParameterSymbol};

pub const FNV_OFFSET_BASIS: u32 = 2166136261;
pub const FNV_PRIME: u32 = 16777619;

pub fn get_or_create_string_hash_helper(
    module: &CompilationModule,
    factory: &dyn NodeFactory,
) -> MethodRef {
    let (helper, created) = module
        .synthesized()
        .get_or_add_method(STRING_HASH_METHOD_NAME, || build_string_hash(module, factory));
    if created {
        debug!(
            "synthesized {} in module `{}`",
            helper.qualified_name(),
            module.name()
        );
    }
    helper
}

// uint hash = 2166136261u;
// if (s != null) {
//     int i = 0;
//     while (i < s.Length) { hash = (s[i] ^ hash) * 16777619u; i = i + 1; }
// }
// return hash;
fn build_string_hash(module: &CompilationModule, factory: &dyn NodeFactory) -> SynthesizedMethod {
    let uint = special_type(SpecialType::UInt32);
    let s = ParameterSymbol::new("s", special_type(SpecialType::String), 0);
    let symbol = MethodSymbol::synthesized(
        module.synthesized().type_name(),
        STRING_HASH_METHOD_NAME,
        vec![s.clone()],
        uint.clone(),
    );

    let hash = LocalSymbol::new("hash", uint);
    let i = LocalSymbol::new("i", special_type(SpecialType::Int32));

    let mix = factory.binary(
        BinaryOp::Multiply,
        factory.binary(
            BinaryOp::Xor,
            factory.string_char(factory.parameter(&s), factory.local(&i)),
            factory.local(&hash),
        ),
        factory.uint_literal(FNV_PRIME),
    );
    let step = factory.binary(BinaryOp::Add, factory.local(&i), factory.int_literal(1));
    let loop_body = factory.block_statement(vec![factory.assign(&hash, mix), factory.assign(&i, step)]);
    let in_bounds = factory.binary(
        BinaryOp::LessThan,
        factory.local(&i),
        factory.string_length(factory.parameter(&s)),
    );

    let scan = factory.block_statement(vec![
        factory.assign(&i, factory.int_literal(0)),
        factory.while_loop(in_bounds, loop_body),
    ]);

    let statements = vec![
        factory.assign(&hash, factory.uint_literal(FNV_OFFSET_BASIS)),
        factory.if_then(
            factory.null_check(factory.parameter(&s), BinaryOp::NotEqual),
            scan,
        ),
        factory.ret(Some(factory.local(&hash))),
    ];

    SynthesizedMethod {
        symbol,
        body: factory.block(vec![hash, i], statements),
    }
}

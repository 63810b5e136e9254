//! file: core/src/ir/lower/null_check.rs
//! description: argument-null guards for null-checked parameters.
//!
//! For every parameter declared null-checked, lowering prepends
//!
//! ```text
//! #line hidden
//! if (x == null) { ThrowIfNull("x"); return; }
//! #line default
//! ```
//!
//! to the function body (`!hasValue(x)` for nullable value types). The throw
//! itself lives in one helper per module, see `throw_helper`.

use log::trace;

use super::err::LoweringError;
use super::lowering_context::LoweringContext;
use super::throw_helper::get_or_create_throw_helper;
use crate::ir::factory::NodeFactory;
use crate::ir::node::{BinaryOp, BoundBlock, BoundExpr, BoundStmt};
use crate::symbols::ParameterSymbol;

/// The test that is true when `param` holds no value.
pub fn build_condition(
    param: &ParameterSymbol,
    factory: &dyn NodeFactory,
) -> Result<BoundExpr, LoweringError> {
    if !param.ty.admits_null() {
        return Err(LoweringError::invariant(
            format!(
                "parameter `{}` of non-nullable value type `{}` is marked null-checked",
                param.name, param.ty
            ),
            "null_check::build_condition",
        ));
    }

    let loaded = factory.parameter(param);
    if param.ty.is_nullable() {
        Ok(factory.not(factory.has_value(loaded)))
    } else {
        Ok(factory.null_check(loaded, BinaryOp::Equal))
    }
}

/// One hidden `if (<absent>) { ThrowIfNull("<name>"); return; }` statement.
pub fn build_guard(
    param: &ParameterSymbol,
    ctx: &LoweringContext<'_>,
) -> Result<BoundStmt, LoweringError> {
    let factory = ctx.factory();
    let condition = build_condition(param, factory)?;
    let helper = get_or_create_throw_helper(ctx.module(), factory);

    let call = factory.static_call(&helper, vec![factory.string_literal(&param.name)]);
    // The helper never returns; the return still gives the branch a regular exit.
    let throw_and_exit = factory.block_statement(vec![factory.expression(call), factory.ret(None)]);

    Ok(factory.hidden_sequence_point(factory.if_then(condition, throw_and_exit)))
}

/// Guards for every null-checked parameter, in declaration order, followed
/// by `existing`. `None` when no parameter is null-checked, in which case
/// the caller keeps its statements as they are.
pub fn construct_null_checked_statement_list(
    parameters: &[ParameterSymbol],
    existing: &[BoundStmt],
    ctx: &LoweringContext<'_>,
) -> Result<Option<Vec<BoundStmt>>, LoweringError> {
    let mut statements: Option<Vec<BoundStmt>> = None;
    for param in parameters.iter().filter(|p| p.null_checked) {
        let guard = build_guard(param, ctx)?;
        trace!(
            "guard for `{}` in `{}`",
            param.name,
            ctx.current_function().unwrap_or("<anon>")
        );
        statements
            .get_or_insert_with(|| Vec::with_capacity(parameters.len() + existing.len()))
            .push(guard);
    }

    Ok(statements.map(|mut list| {
        list.extend_from_slice(existing);
        list
    }))
}

/// Block-level form of `construct_null_checked_statement_list`; the block's
/// locals are carried over unchanged.
pub fn rewrite_null_checking(
    parameters: &[ParameterSymbol],
    block: &BoundBlock,
    ctx: &LoweringContext<'_>,
) -> Result<Option<BoundBlock>, LoweringError> {
    let statements = construct_null_checked_statement_list(parameters, &block.statements, ctx)?;
    Ok(statements.map(|statements| ctx.factory().block(block.locals.clone(), statements)))
}

//! file: core/src/ir/factory.rs
//! description: node construction capability used by lowering.
//!
//! Lowering never builds `BoundExpr`/`BoundStmt` values by hand; it goes
//! through a `NodeFactory` so hosts can substitute their own tree utilities
//! (for instance to attach syntax or type information) without touching the
//! rewrite logic. `SyntheticNodeFactory` is the plain implementation.

use std::sync::Arc;

use super::node::{BinaryOp, BoundBlock, BoundExpr, BoundStmt, Literal, LocalSymbol, UnaryOp};
use crate::symbols::{MethodRef, ParameterSymbol};

pub trait NodeFactory: Send + Sync {
    fn null_literal(&self) -> BoundExpr;
    fn string_literal(&self, value: &str) -> BoundExpr;
    fn int_literal(&self, value: i64) -> BoundExpr;
    fn uint_literal(&self, value: u32) -> BoundExpr;

    fn parameter(&self, param: &ParameterSymbol) -> BoundExpr;
    fn local(&self, local: &LocalSymbol) -> BoundExpr;

    fn not(&self, operand: BoundExpr) -> BoundExpr;
    fn binary(&self, op: BinaryOp, left: BoundExpr, right: BoundExpr) -> BoundExpr;
    fn has_value(&self, operand: BoundExpr) -> BoundExpr;
    /// `operand <op> null`, where `op` is `Equal` or `NotEqual`.
    fn null_check(&self, operand: BoundExpr, op: BinaryOp) -> BoundExpr;
    fn string_length(&self, operand: BoundExpr) -> BoundExpr;
    fn string_char(&self, operand: BoundExpr, index: BoundExpr) -> BoundExpr;

    fn static_call(&self, method: &MethodRef, args: Vec<BoundExpr>) -> BoundExpr;
    fn new_object(&self, constructor: &MethodRef, args: Vec<BoundExpr>) -> BoundExpr;

    fn expression(&self, expr: BoundExpr) -> BoundStmt;
    fn ret(&self, value: Option<BoundExpr>) -> BoundStmt;
    fn throw(&self, value: BoundExpr) -> BoundStmt;
    fn assign(&self, target: &LocalSymbol, value: BoundExpr) -> BoundStmt;
    fn if_then(&self, condition: BoundExpr, then_branch: BoundStmt) -> BoundStmt;
    fn while_loop(&self, condition: BoundExpr, body: BoundStmt) -> BoundStmt;
    fn block_statement(&self, statements: Vec<BoundStmt>) -> BoundStmt;
    /// Mark `statement` as invisible to step debugging.
    fn hidden_sequence_point(&self, statement: BoundStmt) -> BoundStmt;

    fn block(&self, locals: Vec<LocalSymbol>, statements: Vec<BoundStmt>) -> BoundBlock;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticNodeFactory;

impl NodeFactory for SyntheticNodeFactory {
    fn null_literal(&self) -> BoundExpr {
        BoundExpr::Literal { value: Literal::Null }
    }

    fn string_literal(&self, value: &str) -> BoundExpr {
        BoundExpr::Literal { value: Literal::Str(value.to_string()) }
    }

    fn int_literal(&self, value: i64) -> BoundExpr {
        BoundExpr::Literal { value: Literal::Int(value) }
    }

    fn uint_literal(&self, value: u32) -> BoundExpr {
        BoundExpr::Literal { value: Literal::UInt(value) }
    }

    fn parameter(&self, param: &ParameterSymbol) -> BoundExpr {
        BoundExpr::parameter(param)
    }

    fn local(&self, local: &LocalSymbol) -> BoundExpr {
        BoundExpr::Local { name: local.name.clone() }
    }

    fn not(&self, operand: BoundExpr) -> BoundExpr {
        BoundExpr::Unary { op: UnaryOp::Not, operand: Box::new(operand) }
    }

    fn binary(&self, op: BinaryOp, left: BoundExpr, right: BoundExpr) -> BoundExpr {
        BoundExpr::Binary { op, left: Box::new(left), right: Box::new(right) }
    }

    fn has_value(&self, operand: BoundExpr) -> BoundExpr {
        BoundExpr::HasValue { operand: Box::new(operand) }
    }

    fn null_check(&self, operand: BoundExpr, op: BinaryOp) -> BoundExpr {
        debug_assert!(matches!(op, BinaryOp::Equal | BinaryOp::NotEqual));
        self.binary(op, operand, self.null_literal())
    }

    fn string_length(&self, operand: BoundExpr) -> BoundExpr {
        BoundExpr::StringLength { operand: Box::new(operand) }
    }

    fn string_char(&self, operand: BoundExpr, index: BoundExpr) -> BoundExpr {
        BoundExpr::StringChar { operand: Box::new(operand), index: Box::new(index) }
    }

    fn static_call(&self, method: &MethodRef, args: Vec<BoundExpr>) -> BoundExpr {
        BoundExpr::Call { method: Arc::clone(method), args }
    }

    fn new_object(&self, constructor: &MethodRef, args: Vec<BoundExpr>) -> BoundExpr {
        BoundExpr::New { constructor: Arc::clone(constructor), args }
    }

    fn expression(&self, expr: BoundExpr) -> BoundStmt {
        BoundStmt::Expression { expr }
    }

    fn ret(&self, value: Option<BoundExpr>) -> BoundStmt {
        BoundStmt::Return { value }
    }

    fn throw(&self, value: BoundExpr) -> BoundStmt {
        BoundStmt::Throw { value }
    }

    fn assign(&self, target: &LocalSymbol, value: BoundExpr) -> BoundStmt {
        BoundStmt::Assign { target: target.name.clone(), value }
    }

    fn if_then(&self, condition: BoundExpr, then_branch: BoundStmt) -> BoundStmt {
        BoundStmt::If { condition, then_branch: Box::new(then_branch), else_branch: None }
    }

    fn while_loop(&self, condition: BoundExpr, body: BoundStmt) -> BoundStmt {
        BoundStmt::While { condition, body: Box::new(body) }
    }

    fn block_statement(&self, statements: Vec<BoundStmt>) -> BoundStmt {
        BoundStmt::Block { block: BoundBlock::new(Vec::new(), statements) }
    }

    fn hidden_sequence_point(&self, statement: BoundStmt) -> BoundStmt {
        BoundStmt::SequencePoint { span: None, statement: Box::new(statement) }
    }

    fn block(&self, locals: Vec<LocalSymbol>, statements: Vec<BoundStmt>) -> BoundBlock {
        BoundBlock::new(locals, statements)
    }
}

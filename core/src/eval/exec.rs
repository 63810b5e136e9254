//! file: core/src/eval/exec.rs
//! description: statement/expression interpreter.
//!
//! Exceptions thrown by evaluated code unwind as `Unwind::Throw` and come
//! back to the caller of `invoke` as `Outcome::Threw`; only evaluator
//! faults (unknown names, type mismatches, step budget) are `EvalError`s.

use std::cell::Cell;
use std::collections::HashMap;

use log::trace;

use super::err::{EvalError, EvalErrorKind};
use super::value::Value;
use crate::ir::lower::{LoweredFunction, LoweredModule};
use crate::ir::node::{BinaryOp, BoundBlock, BoundExpr, BoundStmt, UnaryOp};
use crate::ir::synthesized::SynthesizedMethod;
use crate::symbols::{MethodKind, MethodSymbol, ParameterSymbol, TypeKind, TypeSymbol};

pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;
/// Nested calls allowed before evaluation gives up. Bounded so that deep
/// recursion fails as an error before the native stack runs out.
pub const DEFAULT_CALL_DEPTH_LIMIT: usize = 64;

const NULL_REFERENCE_EXCEPTION: &str = "System.NullReferenceException";
const INDEX_OUT_OF_RANGE_EXCEPTION: &str = "System.IndexOutOfRangeException";

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Returned(Value),
    Threw(Value),
}

impl Outcome {
    pub fn is_throw(&self) -> bool {
        matches!(self, Outcome::Threw(_))
    }
}

enum Unwind {
    Throw(Value),
    Fault(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(e: EvalError) -> Self {
        Unwind::Fault(e)
    }
}

enum Flow {
    Normal,
    Return(Value),
}

struct Frame {
    params: HashMap<String, Value>,
    locals: HashMap<String, Value>,
}

pub struct Interpreter<'a> {
    functions: HashMap<&'a str, &'a LoweredFunction>,
    synthesized: HashMap<String, SynthesizedMethod>,
    step_limit: usize,
    steps: Cell<usize>,
    depth_limit: usize,
    depth: Cell<usize>,
}

fn default_value(ty: &TypeSymbol) -> Value {
    match (ty.kind, ty.name.as_str()) {
        (TypeKind::NullableValue, _) => Value::Nullable(None),
        (TypeKind::Reference, _) => Value::Null,
        (TypeKind::PlainValue, "uint") => Value::UInt(0),
        (TypeKind::PlainValue, "bool") => Value::Bool(false),
        (TypeKind::PlainValue, _) => Value::Int(0),
    }
}

fn exception(class: &str, message: &str) -> Unwind {
    Unwind::Throw(Value::Object {
        class: class.to_string(),
        fields: vec![Value::Str(message.to_string())],
    })
}

impl<'a> Interpreter<'a> {
    pub fn new(lowered: &'a LoweredModule) -> Self {
        let functions = lowered
            .functions
            .iter()
            .map(|f| (f.name.as_str(), f))
            .collect();
        let synthesized = lowered
            .module
            .synthesized_methods()
            .into_iter()
            .map(|m| (m.symbol.name.clone(), m))
            .collect();
        Interpreter {
            functions,
            synthesized,
            step_limit: DEFAULT_STEP_LIMIT,
            steps: Cell::new(0),
            depth_limit: DEFAULT_CALL_DEPTH_LIMIT,
            depth: Cell::new(0),
        }
    }

    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = limit;
        self
    }

    pub fn with_call_depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = limit;
        self
    }

    /// Call the lowered function `name` with `args`.
    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Outcome, EvalError> {
        self.steps.set(0);
        self.depth.set(0);
        let function = self
            .functions
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::unknown_function(name))?;
        match self.call(name, &function.parameters, &function.body, args) {
            Ok(value) => Ok(Outcome::Returned(value)),
            Err(Unwind::Throw(value)) => {
                trace!("`{}` threw {}", name, value);
                Ok(Outcome::Threw(value))
            }
            Err(Unwind::Fault(e)) => Err(e),
        }
    }

    fn tick(&self) -> Result<(), EvalError> {
        let steps = self.steps.get() + 1;
        self.steps.set(steps);
        if steps > self.step_limit {
            return Err(EvalError::new(
                EvalErrorKind::StepLimit,
                format!("step limit of {} exceeded", self.step_limit),
            ));
        }
        Ok(())
    }

    fn call(
        &self,
        name: &str,
        parameters: &[ParameterSymbol],
        body: &BoundBlock,
        args: Vec<Value>,
    ) -> Result<Value, Unwind> {
        if parameters.len() != args.len() {
            return Err(EvalError::arity(name, parameters.len(), args.len()).into());
        }
        let depth = self.depth.get() + 1;
        if depth > self.depth_limit {
            return Err(EvalError::new(
                EvalErrorKind::CallDepth,
                format!("call depth of {} exceeded in `{}`", self.depth_limit, name),
            )
            .into());
        }
        self.depth.set(depth);
        let result = self.run_frame(parameters, body, args);
        self.depth.set(depth - 1);
        result
    }

    fn run_frame(
        &self,
        parameters: &[ParameterSymbol],
        body: &BoundBlock,
        args: Vec<Value>,
    ) -> Result<Value, Unwind> {
        let mut frame = Frame {
            params: parameters
                .iter()
                .map(|p| p.name.clone())
                .zip(args)
                .collect(),
            locals: HashMap::new(),
        };
        match self.exec_block(&mut frame, body)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Null),
        }
    }

    fn call_method(&self, method: &MethodSymbol, args: Vec<Value>) -> Result<Value, Unwind> {
        match method.kind {
            MethodKind::Synthesized => {
                let target = self
                    .synthesized
                    .get(&method.name)
                    .ok_or_else(|| EvalError::unknown_function(&method.qualified_name()))?;
                self.call(&method.name, &target.symbol.parameters, &target.body, args)
            }
            MethodKind::Ordinary => {
                let target = self
                    .functions
                    .get(method.name.as_str())
                    .copied()
                    .ok_or_else(|| EvalError::unknown_function(&method.name))?;
                self.call(&method.name, &target.parameters, &target.body, args)
            }
            MethodKind::Constructor => Err(EvalError::type_mismatch("direct constructor call").into()),
        }
    }

    /// Locals declared by `block` shadow same-named outer locals until the
    /// block exits.
    fn exec_block(&self, frame: &mut Frame, block: &BoundBlock) -> Result<Flow, Unwind> {
        let shadowed: Vec<(String, Option<Value>)> = block
            .locals
            .iter()
            .map(|local| {
                let outer = frame.locals.insert(local.name.clone(), default_value(&local.ty));
                (local.name.clone(), outer)
            })
            .collect();

        let flow = self.exec_statements(frame, &block.statements);

        for (name, outer) in shadowed.into_iter().rev() {
            match outer {
                Some(value) => {
                    frame.locals.insert(name, value);
                }
                None => {
                    frame.locals.remove(&name);
                }
            }
        }
        flow
    }

    fn exec_statements(&self, frame: &mut Frame, statements: &[BoundStmt]) -> Result<Flow, Unwind> {
        for stmt in statements {
            if let Flow::Return(value) = self.exec_stmt(frame, stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&self, frame: &mut Frame, stmt: &BoundStmt) -> Result<Flow, Unwind> {
        self.tick()?;
        match stmt {
            BoundStmt::Expression { expr } => {
                self.eval(frame, expr)?;
                Ok(Flow::Normal)
            }
            BoundStmt::Return { value } => {
                let value = match value {
                    Some(expr) => self.eval(frame, expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
            BoundStmt::If { condition, then_branch, else_branch } => {
                if self.eval_condition(frame, condition)? {
                    self.exec_stmt(frame, then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(frame, else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            }
            BoundStmt::Throw { value } => Err(Unwind::Throw(self.eval(frame, value)?)),
            BoundStmt::Assign { target, value } => {
                let value = self.eval(frame, value)?;
                let slot = match frame.locals.get_mut(target) {
                    Some(slot) => slot,
                    None => frame
                        .params
                        .get_mut(target)
                        .ok_or_else(|| EvalError::unknown_variable(target))?,
                };
                *slot = value;
                Ok(Flow::Normal)
            }
            BoundStmt::While { condition, body } => {
                while self.eval_condition(frame, condition)? {
                    if let Flow::Return(value) = self.exec_stmt(frame, body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            BoundStmt::Block { block } => self.exec_block(frame, block),
            BoundStmt::SequencePoint { statement, .. } => self.exec_stmt(frame, statement),
        }
    }

    fn eval_condition(&self, frame: &Frame, condition: &BoundExpr) -> Result<bool, Unwind> {
        let value = self.eval(frame, condition)?;
        value
            .as_bool()
            .ok_or_else(|| EvalError::type_mismatch("condition").into())
    }

    fn eval(&self, frame: &Frame, expr: &BoundExpr) -> Result<Value, Unwind> {
        match expr {
            BoundExpr::Literal { value } => Ok(Value::from(value)),
            BoundExpr::Parameter { name, .. } => frame
                .params
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::unknown_variable(name).into()),
            BoundExpr::Local { name } => frame
                .locals
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::unknown_variable(name).into()),
            BoundExpr::Unary { op: UnaryOp::Not, operand } => match self.eval(frame, operand)? {
                Value::Bool(b) => Ok(Value::Bool(!b)),
                _ => Err(EvalError::type_mismatch("`!`").into()),
            },
            BoundExpr::Binary { op, left, right } => {
                let left = self.eval(frame, left)?;
                let right = self.eval(frame, right)?;
                Ok(binary(*op, left, right)?)
            }
            BoundExpr::HasValue { operand } => match self.eval(frame, operand)? {
                Value::Nullable(inner) => Ok(Value::Bool(inner.is_some())),
                _ => Err(EvalError::type_mismatch("hasValue").into()),
            },
            BoundExpr::Call { method, args } => {
                let args = self.eval_args(frame, args)?;
                self.call_method(method, args)
            }
            BoundExpr::New { constructor, args } => Ok(Value::Object {
                class: constructor.container.clone(),
                fields: self.eval_args(frame, args)?,
            }),
            BoundExpr::StringLength { operand } => match self.eval(frame, operand)? {
                Value::Str(s) => Ok(Value::Int(s.encode_utf16().count() as i64)),
                Value::Null => Err(exception(NULL_REFERENCE_EXCEPTION, "Length")),
                _ => Err(EvalError::type_mismatch("Length").into()),
            },
            BoundExpr::StringChar { operand, index } => {
                let target = self.eval(frame, operand)?;
                let index = self.eval(frame, index)?;
                match (target, index) {
                    (Value::Null, _) => Err(exception(NULL_REFERENCE_EXCEPTION, "indexer")),
                    (Value::Str(s), Value::Int(i)) => usize::try_from(i)
                        .ok()
                        .and_then(|i| s.encode_utf16().nth(i))
                        .map(|unit| Value::UInt(u32::from(unit)))
                        .ok_or_else(|| exception(INDEX_OUT_OF_RANGE_EXCEPTION, "index")),
                    _ => Err(EvalError::type_mismatch("indexer").into()),
                }
            }
        }
    }

    fn eval_args(&self, frame: &Frame, args: &[BoundExpr]) -> Result<Vec<Value>, Unwind> {
        args.iter().map(|arg| self.eval(frame, arg)).collect()
    }
}

fn values_equal(left: &Value, right: &Value) -> bool {
    if left.is_null() || right.is_null() {
        return left.is_null() && right.is_null();
    }
    left == right
}

fn binary(op: BinaryOp, left: Value, right: Value) -> Result<Value, EvalError> {
    let mismatch = || EvalError::type_mismatch(&format!("`{}`", op.symbol()));
    match op {
        BinaryOp::Equal => Ok(Value::Bool(values_equal(&left, &right))),
        BinaryOp::NotEqual => Ok(Value::Bool(!values_equal(&left, &right))),
        BinaryOp::LessThan => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a < b)),
            (Value::UInt(a), Value::UInt(b)) => Ok(Value::Bool(a < b)),
            _ => Err(mismatch()),
        },
        BinaryOp::Add => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_add(b))),
            (Value::UInt(a), Value::UInt(b)) => Ok(Value::UInt(a.wrapping_add(b))),
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(a + &b)),
            _ => Err(mismatch()),
        },
        BinaryOp::Multiply => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a.wrapping_mul(b))),
            (Value::UInt(a), Value::UInt(b)) => Ok(Value::UInt(a.wrapping_mul(b))),
            _ => Err(mismatch()),
        },
        BinaryOp::Xor => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(a ^ b)),
            (Value::UInt(a), Value::UInt(b)) => Ok(Value::UInt(a ^ b)),
            _ => Err(mismatch()),
        },
    }
}

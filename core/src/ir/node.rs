//! file: core/src/ir/node.rs
//! description: bound-tree IR produced and consumed by lowering.
//!
//! Lowered function bodies are trees of `BoundStmt` over `BoundExpr`.
//! The node set is the subset the null-check rewrite and the synthesized
//! helpers need, plus enough control flow to express ordinary bodies.

use serde::{Deserialize, Serialize};

use crate::location::Span;
use crate::symbols::{MethodRef, ParameterSymbol, TypeSymbol};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    #[serde(rename = "uint")]
    UInt(u32),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Equal,
    NotEqual,
    LessThan,
    Add,
    Multiply,
    Xor,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::Add => "+",
            BinaryOp::Multiply => "*",
            BinaryOp::Xor => "^",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum BoundExpr {
    Literal {
        value: Literal,
    },
    Parameter {
        name: String,
        #[serde(rename = "type")]
        ty: TypeSymbol,
    },
    Local {
        name: String,
    },
    Unary {
        op: UnaryOp,
        operand: Box<BoundExpr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<BoundExpr>,
        right: Box<BoundExpr>,
    },
    /// Structural presence test on a nullable value.
    HasValue {
        operand: Box<BoundExpr>,
    },
    Call {
        method: MethodRef,
        #[serde(default)]
        args: Vec<BoundExpr>,
    },
    New {
        constructor: MethodRef,
        #[serde(default)]
        args: Vec<BoundExpr>,
    },
    StringLength {
        operand: Box<BoundExpr>,
    },
    /// UTF-16 code unit at `index`.
    StringChar {
        operand: Box<BoundExpr>,
        index: Box<BoundExpr>,
    },
}

impl BoundExpr {
    pub fn parameter(param: &ParameterSymbol) -> Self {
        BoundExpr::Parameter {
            name: param.name.clone(),
            ty: param.ty.clone(),
        }
    }

    /// The method this expression calls directly, if any.
    pub fn called_method(&self) -> Option<&MethodRef> {
        match self {
            BoundExpr::Call { method, .. } => Some(method),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeSymbol,
}

impl LocalSymbol {
    pub fn new(name: impl Into<String>, ty: TypeSymbol) -> Self {
        LocalSymbol { name: name.into(), ty }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "snake_case")]
pub enum BoundStmt {
    Expression {
        expr: BoundExpr,
    },
    Return {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<BoundExpr>,
    },
    If {
        condition: BoundExpr,
        then_branch: Box<BoundStmt>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_branch: Option<Box<BoundStmt>>,
    },
    Throw {
        value: BoundExpr,
    },
    Assign {
        target: String,
        value: BoundExpr,
    },
    While {
        condition: BoundExpr,
        body: Box<BoundStmt>,
    },
    Block {
        block: BoundBlock,
    },
    /// `span: None` is a hidden sequence point.
    SequencePoint {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        span: Option<Span>,
        statement: Box<BoundStmt>,
    },
}

impl BoundStmt {
    pub fn is_hidden_sequence_point(&self) -> bool {
        matches!(self, BoundStmt::SequencePoint { span: None, .. })
    }

    /// Strip any sequence point wrappers.
    pub fn inner(&self) -> &BoundStmt {
        match self {
            BoundStmt::SequencePoint { statement, .. } => statement.inner(),
            other => other,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundBlock {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locals: Vec<LocalSymbol>,
    #[serde(default)]
    pub statements: Vec<BoundStmt>,
}

impl BoundBlock {
    pub fn new(locals: Vec<LocalSymbol>, statements: Vec<BoundStmt>) -> Self {
        BoundBlock { locals, statements }
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

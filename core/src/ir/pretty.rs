//! Text rendering of the bound tree.
//!
//! Statements render on one line (`if (x == null) { ThrowIfNull("x"); return; }`),
//! blocks render one statement per line. Hidden sequence points are fenced
//! with `#line hidden` / `#line default` at block level.

use std::fmt;

use super::node::{BoundBlock, BoundExpr, BoundStmt, Literal, UnaryOp};
use super::synthesized::SynthesizedMethod;

const INDENT: &str = "    ";

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "null"),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Int(i) => write!(f, "{}", i),
            Literal::UInt(u) => write!(f, "{}u", u),
            Literal::Str(s) => write!(f, "{:?}", s),
        }
    }
}

fn is_compound(expr: &BoundExpr) -> bool {
    matches!(expr, BoundExpr::Binary { .. } | BoundExpr::Unary { .. })
}

fn write_operand(f: &mut fmt::Formatter<'_>, expr: &BoundExpr) -> fmt::Result {
    if is_compound(expr) {
        write!(f, "({})", expr)
    } else {
        write!(f, "{}", expr)
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[BoundExpr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for BoundExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundExpr::Literal { value } => write!(f, "{}", value),
            BoundExpr::Parameter { name, .. } | BoundExpr::Local { name } => write!(f, "{}", name),
            BoundExpr::Unary { op: UnaryOp::Not, operand } => {
                write!(f, "!")?;
                write_operand(f, operand)
            }
            BoundExpr::Binary { op, left, right } => {
                write_operand(f, left)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, right)
            }
            BoundExpr::HasValue { operand } => write!(f, "hasValue({})", operand),
            BoundExpr::Call { method, args } => {
                write!(f, "{}(", method.name)?;
                write_args(f, args)?;
                write!(f, ")")
            }
            BoundExpr::New { constructor, args } => {
                write!(f, "new {}(", constructor.container)?;
                write_args(f, args)?;
                write!(f, ")")
            }
            BoundExpr::StringLength { operand } => {
                write_operand(f, operand)?;
                write!(f, ".Length")
            }
            BoundExpr::StringChar { operand, index } => {
                write_operand(f, operand)?;
                write!(f, "[{}]", index)
            }
        }
    }
}

fn write_branch(f: &mut fmt::Formatter<'_>, stmt: &BoundStmt) -> fmt::Result {
    match stmt.inner() {
        BoundStmt::Block { .. } => write!(f, "{}", stmt),
        other => write!(f, "{{ {} }}", other),
    }
}

impl fmt::Display for BoundStmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundStmt::Expression { expr } => write!(f, "{};", expr),
            BoundStmt::Return { value: None } => write!(f, "return;"),
            BoundStmt::Return { value: Some(value) } => write!(f, "return {};", value),
            BoundStmt::If { condition, then_branch, else_branch } => {
                write!(f, "if ({}) ", condition)?;
                write_branch(f, then_branch)?;
                if let Some(else_branch) = else_branch {
                    write!(f, " else ")?;
                    write_branch(f, else_branch)?;
                }
                Ok(())
            }
            BoundStmt::Throw { value } => write!(f, "throw {};", value),
            BoundStmt::Assign { target, value } => write!(f, "{} = {};", target, value),
            BoundStmt::While { condition, body } => {
                write!(f, "while ({}) ", condition)?;
                write_branch(f, body)
            }
            BoundStmt::Block { block } => {
                if block.statements.is_empty() {
                    return write!(f, "{{ }}");
                }
                write!(f, "{{")?;
                for stmt in &block.statements {
                    write!(f, " {}", stmt)?;
                }
                write!(f, " }}")
            }
            BoundStmt::SequencePoint { statement, .. } => write!(f, "{}", statement),
        }
    }
}

fn pad(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        write!(f, "{}", INDENT)?;
    }
    Ok(())
}

fn write_line(f: &mut fmt::Formatter<'_>, stmt: &BoundStmt, depth: usize) -> fmt::Result {
    match stmt {
        BoundStmt::SequencePoint { span: None, statement } => {
            pad(f, depth)?;
            writeln!(f, "#line hidden")?;
            write_line(f, statement, depth)?;
            pad(f, depth)?;
            writeln!(f, "#line default")
        }
        BoundStmt::Block { block } => {
            pad(f, depth)?;
            write_block(f, block, depth)?;
            writeln!(f)
        }
        other => {
            pad(f, depth)?;
            writeln!(f, "{}", other)
        }
    }
}

fn write_block(f: &mut fmt::Formatter<'_>, block: &BoundBlock, depth: usize) -> fmt::Result {
    writeln!(f, "{{")?;
    for local in &block.locals {
        pad(f, depth + 1)?;
        writeln!(f, "{} {};", local.ty, local.name)?;
    }
    for stmt in &block.statements {
        write_line(f, stmt, depth + 1)?;
    }
    pad(f, depth)?;
    write!(f, "}}")
}

impl fmt::Display for BoundBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_block(f, self, 0)
    }
}

impl fmt::Display for SynthesizedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.symbol)?;
        writeln!(f, "{}", self.body)
    }
}

//! Constant expression evaluation
//!
//! Array bounds and scalar initializers are handed to an
//! [`ExpressionEvaluator`]. The lowering treats it as a black box; this module
//! also provides [`ConstEvaluator`], an integer/float folder that resolves
//! identifiers against the values recorded so far.

use std::fmt::{self, Display};

use serde::Serialize;

use crate::ast::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
use crate::semantic::symbol_table::SymbolTable;

/// Result of evaluating an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Int(i64),
    Float(f64),
    Char(char),
    Str(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Char(c) => Some(*c as i64),
            Value::Float(_) | Value::Str(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::Char(c) => Some(*c as i64 as f64),
            Value::Str(_) => None,
        }
    }

    fn is_truthy(&self) -> Option<bool> {
        match self {
            Value::Float(v) => Some(*v != 0.0),
            Value::Str(_) => Some(true),
            _ => self.as_int().map(|v| v != 0),
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::Char(c) => write!(f, "{:?}", c),
            Value::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Evaluates and renders expressions found in declarations.
pub trait ExpressionEvaluator {
    /// Literal value of `expr`, or `None` when it is not a constant.
    fn evaluate(&self, expr: &Expr, symbols: &SymbolTable) -> Option<Value>;

    /// Source-like rendering of `expr`.
    fn render(&self, expr: &Expr) -> String {
        render_expr(expr)
    }
}

/// Folds integer and floating constant expressions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConstEvaluator;

impl ExpressionEvaluator for ConstEvaluator {
    fn evaluate(&self, expr: &Expr, symbols: &SymbolTable) -> Option<Value> {
        eval_const_expr(expr, symbols)
    }
}

/// Evaluate a constant expression node
pub fn eval_const_expr(expr: &Expr, symbols: &SymbolTable) -> Option<Value> {
    match &expr.kind {
        ExprKind::Literal(literal) => Some(match literal {
            Literal::Int(v) => Value::Int(*v),
            Literal::Float(v) => Value::Float(*v),
            Literal::Char(c) => Value::Char(*c),
            Literal::Str(s) => Value::Str(s.clone()),
        }),
        ExprKind::Ident(name) => symbols.value(name).cloned(),
        ExprKind::Paren(inner) => eval_const_expr(inner, symbols),
        ExprKind::Cast(_, inner) => eval_const_expr(inner, symbols),
        ExprKind::Unary(op, operand) => {
            let value = eval_const_expr(operand, symbols)?;
            eval_unary(*op, value)
        }
        ExprKind::Binary(op, lhs, rhs) => {
            let left_val = eval_const_expr(lhs, symbols)?;

            // Short-circuiting logic
            match op {
                BinaryOp::LogicAnd => {
                    if !left_val.is_truthy()? {
                        return Some(Value::Int(0));
                    }
                    let right_val = eval_const_expr(rhs, symbols)?;
                    return Some(Value::Int(right_val.is_truthy()? as i64));
                }
                BinaryOp::LogicOr => {
                    if left_val.is_truthy()? {
                        return Some(Value::Int(1));
                    }
                    let right_val = eval_const_expr(rhs, symbols)?;
                    return Some(Value::Int(right_val.is_truthy()? as i64));
                }
                _ => {}
            }

            let right_val = eval_const_expr(rhs, symbols)?;
            match (left_val.as_int(), right_val.as_int()) {
                (Some(l), Some(r)) => eval_int_binary(*op, l, r).map(Value::Int),
                _ => eval_float_binary(*op, left_val.as_float()?, right_val.as_float()?),
            }
        }
        ExprKind::Conditional(cond, then_expr, else_expr) => {
            if eval_const_expr(cond, symbols)?.is_truthy()? {
                eval_const_expr(then_expr, symbols)
            } else {
                eval_const_expr(else_expr, symbols)
            }
        }
        ExprKind::SizeOfType(_) | ExprKind::Opaque(_) => None,
    }
}

fn eval_unary(op: UnaryOp, value: Value) -> Option<Value> {
    if let Value::Float(v) = value {
        return match op {
            UnaryOp::Plus => Some(Value::Float(v)),
            UnaryOp::Minus => Some(Value::Float(-v)),
            UnaryOp::LogicNot => Some(Value::Int((v == 0.0) as i64)),
            UnaryOp::BitNot => None,
        };
    }
    let v = value.as_int()?;
    match op {
        UnaryOp::Plus => Some(Value::Int(v)),
        UnaryOp::Minus => Some(Value::Int(v.wrapping_neg())),
        UnaryOp::BitNot => Some(Value::Int(!v)),
        UnaryOp::LogicNot => Some(Value::Int((v == 0) as i64)),
    }
}

fn eval_int_binary(op: BinaryOp, l: i64, r: i64) -> Option<i64> {
    match op {
        BinaryOp::Add => Some(l.wrapping_add(r)),
        BinaryOp::Sub => Some(l.wrapping_sub(r)),
        BinaryOp::Mul => Some(l.wrapping_mul(r)),
        BinaryOp::Div => (r != 0).then(|| l.wrapping_div(r)),
        BinaryOp::Mod => (r != 0).then(|| l.wrapping_rem(r)),
        BinaryOp::LShift => Some(l.wrapping_shl(r as u32)),
        BinaryOp::RShift => Some(l.wrapping_shr(r as u32)),
        BinaryOp::Less => Some((l < r) as i64),
        BinaryOp::LessEqual => Some((l <= r) as i64),
        BinaryOp::Greater => Some((l > r) as i64),
        BinaryOp::GreaterEqual => Some((l >= r) as i64),
        BinaryOp::Equal => Some((l == r) as i64),
        BinaryOp::NotEqual => Some((l != r) as i64),
        BinaryOp::BitAnd => Some(l & r),
        BinaryOp::BitXor => Some(l ^ r),
        BinaryOp::BitOr => Some(l | r),
        BinaryOp::LogicAnd => Some((l != 0 && r != 0) as i64),
        BinaryOp::LogicOr => Some((l != 0 || r != 0) as i64),
    }
}

fn eval_float_binary(op: BinaryOp, l: f64, r: f64) -> Option<Value> {
    match op {
        BinaryOp::Add => Some(Value::Float(l + r)),
        BinaryOp::Sub => Some(Value::Float(l - r)),
        BinaryOp::Mul => Some(Value::Float(l * r)),
        BinaryOp::Div => (r != 0.0).then(|| Value::Float(l / r)),
        BinaryOp::Less => Some(Value::Int((l < r) as i64)),
        BinaryOp::LessEqual => Some(Value::Int((l <= r) as i64)),
        BinaryOp::Greater => Some(Value::Int((l > r) as i64)),
        BinaryOp::GreaterEqual => Some(Value::Int((l >= r) as i64)),
        BinaryOp::Equal => Some(Value::Int((l == r) as i64)),
        BinaryOp::NotEqual => Some(Value::Int((l != r) as i64)),
        _ => None,
    }
}

/// Render an expression back to C source text.
pub fn render_expr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Literal(literal) => match literal {
            Literal::Int(v) => v.to_string(),
            Literal::Float(v) => format!("{:?}", v),
            Literal::Char(c) => format!("{:?}", c),
            Literal::Str(s) => format!("{:?}", s),
        },
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Paren(inner) => format!("({})", render_expr(inner)),
        ExprKind::Unary(op, operand) => format!("{}{}", op.as_str(), render_expr(operand)),
        ExprKind::Binary(op, lhs, rhs) => {
            format!("{} {} {}", render_expr(lhs), op.as_str(), render_expr(rhs))
        }
        ExprKind::Conditional(cond, then_expr, else_expr) => format!(
            "{} ? {} : {}",
            render_expr(cond),
            render_expr(then_expr),
            render_expr(else_expr)
        ),
        ExprKind::Cast(type_name, inner) => format!("({}){}", type_name, render_expr(inner)),
        ExprKind::SizeOfType(type_name) => format!("sizeof({})", type_name),
        ExprKind::Opaque(text) => text.clone(),
    }
}

//! Parse tree handed over by the external C parser.
//!
//! This module provides the grammar-shaped input of the lowering pass:
//!
//! - [`nodes`]: declarations, specifiers, declarators and their grammar cases
//! - [`expr`]: the expression subset used by array bounds and initializers
//!
//! The tree is assumed to be syntactically valid; the lowering only decides
//! which productions it can model. All nodes are `serde`-deserialisable so a
//! parser written in any language can hand them over as JSON.

pub mod expr;
pub mod nodes;

pub use expr::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};
pub use nodes::*;

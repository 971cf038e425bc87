//! Semantic lowering module.
//!
//! This module turns the grammar-shaped declarations of the parse tree into
//! the declarator-free type model of [`types`]:
//! - Type specifier accumulation
//! - Struct/union member resolution
//! - Parameter list resolution
//! - Declarator resolution (pointers, arrays, function suffixes)
//! - Unit sequencing with symbol and tag recording

pub mod const_eval;
mod declarator;
pub mod error;
pub mod lowering;
mod params;
mod struct_lowering;
pub mod symbol_table;
pub mod type_builder;
pub mod types;

// Re-export key types for public API
pub use const_eval::{ConstEvaluator, ExpressionEvaluator, Value};
pub use error::LowerError;
pub use lowering::{LowerOutput, Lowerer, lower, lower_translation_unit};
pub use symbol_table::SymbolTable;
pub use type_builder::SpecInfo;
pub use types::{AggregateType, ArrayDim, BaseType, DeclNode, FunctionType, ScalarType, TypeDescriptor};

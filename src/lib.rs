//! Lowering of C declarators into a declarator-free type model.
//!
//! The input is the parse tree of one or more chained translation units
//! ([`ast`]); the output is an ordered list of [`semantic::DeclNode`]s plus the
//! name to value table and the tag table built along the way.
pub mod ast;
/// Contains the diagnostic engine.
pub mod diagnostic;
/// Contains the command-line driver.
pub mod driver;
pub mod dumper;
/// Contains the error types for the application.
pub mod error;
/// Contains the semantic lowering.
pub mod semantic;
pub mod source;

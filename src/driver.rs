//! Command-line driver
//!
//! - [`cli`]: clap arguments and the derived [`CompileConfig`]
//! - [`compiler`]: loads parse trees, runs the lowering and writes the output

pub mod cli;
pub mod compiler;

pub use cli::{Cli, CompileConfig, EmitKind};
pub use compiler::CompilerDriver;

//! CLI parsing and configuration module
//!
//! This module handles command-line argument parsing using clap and
//! provides the configuration structure for the driver.

use clap::{Parser as CliParser, ValueEnum};
use std::path::PathBuf;

/// Output format of the driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum EmitKind {
    /// Indented declaration tree
    #[default]
    Tree,
    /// JSON serialised lowering output
    Json,
}

/// CLI interface using clap
#[derive(CliParser, Debug)]
#[clap(
    name = "ctype-lower",
    about = "Lower C declarators from a JSON parse tree into a flat type model"
)]
pub struct Cli {
    /// Input parse trees, one JSON translation unit per file, chained in order
    #[clap(value_parser, required = true)]
    pub input_files: Vec<PathBuf>,

    /// Output file (defaults to stdout)
    #[clap(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format
    #[clap(long, value_enum, default_value_t = EmitKind::Tree)]
    pub emit: EmitKind,

    /// Enable verbose diagnostic output
    #[clap(short, long)]
    pub verbose: bool,

    /// Warning options: `error` makes unsupported constructs fatal, `no-warnings` silences them
    #[clap(short = 'W', action = clap::ArgAction::Append)]
    pub warnings: Vec<String>,
}

/// Configuration for one lowering run
#[derive(Debug, Clone)]
pub struct CompileConfig {
    pub input_files: Vec<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub emit: EmitKind,
    pub verbose: bool,
    pub warnings: Vec<String>,
}

impl CompileConfig {
    pub fn new(input_files: Vec<PathBuf>) -> Self {
        CompileConfig {
            input_files,
            output_path: None,
            emit: EmitKind::default(),
            verbose: false,
            warnings: Vec::new(),
        }
    }

    /// `-W error`
    pub fn is_strict(&self) -> bool {
        self.warnings.iter().any(|w| w == "error")
    }
}

impl Cli {
    /// Convert CLI arguments into a lowering configuration
    pub fn into_config(self) -> CompileConfig {
        CompileConfig {
            input_files: self.input_files,
            output_path: self.output,
            emit: self.emit,
            verbose: self.verbose,
            warnings: self.warnings,
        }
    }
}

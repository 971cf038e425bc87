//! Lowering pipeline orchestration
//!
//! Reads every input parse tree, chains the units in command-line order,
//! lowers them and writes the requested output.

use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::ast::TranslationUnit;
use crate::diagnostic::{DiagnosticEngine, ErrorFormatter};
use crate::dumper::DeclDumper;
use crate::error::Error;
use crate::semantic::{ConstEvaluator, LowerOutput, Lowerer};

use super::cli::{Cli, CompileConfig, EmitKind};

/// Main lowering driver
pub struct CompilerDriver {
    config: CompileConfig,
    formatter: ErrorFormatter,
}

impl CompilerDriver {
    /// Create a new driver from CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self::from_config(cli.into_config())
    }

    /// Create a new driver from configuration
    pub fn from_config(config: CompileConfig) -> Self {
        let formatter = ErrorFormatter {
            show_notes: config.verbose,
            ..ErrorFormatter::default()
        };
        CompilerDriver { config, formatter }
    }

    /// Load, lower and emit. Diagnostics are printed to stderr.
    pub fn run(&mut self) -> Result<(), Error> {
        let (output, diagnostic_ends) = self.lower_inputs()?;

        let mut start = 0;
        for (path, &end) in self.config.input_files.iter().zip(&diagnostic_ends) {
            let path = path.display().to_string();
            self.formatter
                .print_diagnostics(&output.diagnostics[start..end], Some(&path));
            start = end;
        }

        let output = if self.config.is_strict() {
            output.into_strict()?
        } else {
            output
        };

        let rendered = match self.config.emit {
            EmitKind::Tree => DeclDumper::new().dump_output(&output),
            EmitKind::Json => {
                let mut json = serde_json::to_string_pretty(&output)?;
                json.push('\n');
                json
            }
        };

        match &self.config.output_path {
            Some(path) => fs::write(path, rendered).map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?,
            None => print!("{}", rendered),
        }
        Ok(())
    }

    /// Lower every input in order. Units are lowered one at a time so the
    /// file that failed can be named in the log.
    ///
    /// Also returns, per input file, the number of diagnostics collected once
    /// that file was done.
    pub fn lower_inputs(&self) -> Result<(LowerOutput, Vec<usize>), Error> {
        let units = self
            .config
            .input_files
            .iter()
            .map(|path| load_unit(path))
            .collect::<Result<Vec<_>, _>>()?;

        let diag = DiagnosticEngine::from_warnings(&self.config.warnings);
        let mut lowerer = Lowerer::new(&ConstEvaluator, diag);
        let mut diagnostic_ends = Vec::with_capacity(units.len());
        for (path, head) in self.config.input_files.iter().zip(&units) {
            for unit in head.units() {
                let produced = lowerer.lower_unit(unit).inspect_err(|e| {
                    info!(
                        "{}: lowering stopped after {} declarations: {}",
                        path.display(),
                        lowerer.declarations().len(),
                        e
                    )
                })?;
                debug!("{}: {} declarations", path.display(), produced);
            }
            diagnostic_ends.push(lowerer.diagnostics().len());
        }
        Ok((lowerer.finish(), diagnostic_ends))
    }
}

fn load_unit(path: &Path) -> Result<TranslationUnit, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

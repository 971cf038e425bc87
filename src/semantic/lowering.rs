//! Semantic lowering of declarations.
//!
//! Responsibility
//! - Walk chained translation units in source order
//! - Resolve every declarator of a declaration against its own copy of the base descriptor
//! - Evaluate scalar initializers
//! - Record top-level names and their values in the symbol table
//! - Record tagged aggregate definitions in the tag table
//!
//! Unsupported grammar never aborts the walk; it is reported through the
//! diagnostic engine and the affected piece is left out. Only an inconsistent
//! tree shape ([`LowerError`]) stops the run.

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use crate::ast::{Declaration, ExternalDeclaration, FunctionDefinition, GrammarNode, Initializer, TranslationUnit};
use crate::diagnostic::{Diagnostic, DiagnosticEngine, DiagnosticLevel, UnsupportedConstruct};
use crate::error::Error;
use crate::semantic::const_eval::{ConstEvaluator, ExpressionEvaluator};
use crate::semantic::declarator::resolve_declarator;
use crate::semantic::error::LowerError;
use crate::semantic::symbol_table::SymbolTable;
use crate::semantic::type_builder::lower_declaration_specifiers;
use crate::semantic::types::{AggregateType, DeclNode};

/// Context for the semantic lowering phase
pub(crate) struct LowerCtx<'a> {
    pub(crate) diag: DiagnosticEngine,
    pub(crate) symbols: SymbolTable,
    pub(crate) tags: IndexMap<String, AggregateType>,
    pub(crate) evaluator: &'a dyn ExpressionEvaluator,
}

impl<'a> LowerCtx<'a> {
    pub(crate) fn new(evaluator: &'a dyn ExpressionEvaluator, diag: DiagnosticEngine) -> Self {
        LowerCtx {
            diag,
            symbols: SymbolTable::new(),
            tags: IndexMap::new(),
            evaluator,
        }
    }
}

/// Everything one lowering run produces.
#[derive(Debug, Clone, Serialize)]
pub struct LowerOutput {
    pub declarations: Vec<DeclNode>,
    pub symbols: SymbolTable,
    pub tags: IndexMap<String, AggregateType>,
    pub diagnostics: Vec<Diagnostic>,
}

impl LowerOutput {
    /// Diagnostics about unsupported constructs, without informational notes.
    pub fn issues(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.level != DiagnosticLevel::Note)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.level == DiagnosticLevel::Error)
    }

    /// Treat every recoverable issue as fatal.
    pub fn into_strict(self) -> Result<Self, Error> {
        match self.issues().count() {
            0 => Ok(self),
            count => Err(Error::Diagnostics { count }),
        }
    }
}

/// Incremental lowering over one or more translation units.
///
/// Declarations lowered before a fatal error stay available through
/// [`Lowerer::declarations`] and [`Lowerer::finish`].
pub struct Lowerer<'a> {
    ctx: LowerCtx<'a>,
    declarations: Vec<DeclNode>,
}

impl<'a> Lowerer<'a> {
    pub fn new(evaluator: &'a dyn ExpressionEvaluator, diag: DiagnosticEngine) -> Self {
        Lowerer {
            ctx: LowerCtx::new(evaluator, diag),
            declarations: Vec::new(),
        }
    }

    /// Lower the items of `unit` only; chained units are not followed.
    /// Returns the number of declaration nodes produced.
    pub fn lower_unit(&mut self, unit: &TranslationUnit) -> Result<usize, LowerError> {
        let before = self.declarations.len();
        for item in &unit.items {
            match item {
                ExternalDeclaration::Declaration(decl) => {
                    let nodes = lower_declaration(decl, &mut self.ctx)?;
                    self.declarations.extend(nodes);
                }
                ExternalDeclaration::FunctionDefinition(def) => {
                    let node = lower_function_definition(def, &mut self.ctx)?;
                    self.declarations.push(node);
                }
            }
        }
        let produced = self.declarations.len() - before;
        debug!("unit lowered into {} declarations", produced);
        Ok(produced)
    }

    pub fn declarations(&self) -> &[DeclNode] {
        &self.declarations
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.ctx.symbols
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.ctx.diag.diagnostics()
    }

    pub fn finish(self) -> LowerOutput {
        LowerOutput {
            declarations: self.declarations,
            symbols: self.ctx.symbols,
            tags: self.ctx.tags,
            diagnostics: self.ctx.diag.into_diagnostics(),
        }
    }
}

/// Lower `unit` and every unit chained after it.
pub fn lower_translation_unit(
    unit: &TranslationUnit,
    evaluator: &dyn ExpressionEvaluator,
    diag: DiagnosticEngine,
) -> Result<LowerOutput, LowerError> {
    let mut lowerer = Lowerer::new(evaluator, diag);
    for unit in unit.units() {
        lowerer.lower_unit(unit)?;
    }
    Ok(lowerer.finish())
}

/// [`lower_translation_unit`] with [`ConstEvaluator`] and default diagnostics.
pub fn lower(unit: &TranslationUnit) -> Result<LowerOutput, LowerError> {
    lower_translation_unit(unit, &ConstEvaluator, DiagnosticEngine::default())
}

fn lower_declaration(decl: &Declaration, ctx: &mut LowerCtx) -> Result<Vec<DeclNode>, LowerError> {
    let spec_info = lower_declaration_specifiers(&decl.specifiers, ctx)?;

    if decl.init_declarators.is_empty() {
        ctx.diag
            .report_note("declaration does not declare an identifier".to_string(), decl.span);
        return Ok(Vec::new());
    }

    let mut nodes = Vec::with_capacity(decl.init_declarators.len());
    for init_declarator in &decl.init_declarators {
        let mut node = resolve_declarator(&spec_info.descriptor, &init_declarator.declarator, ctx)?;
        node.storage = spec_info.storage;

        if let Some(initializer) = &init_declarator.initializer {
            lower_initializer(&mut node, initializer, ctx);
        }

        // Recorded before the next sibling so `N = 4, a[N]` resolves.
        ctx.symbols.record(node.name.clone(), node.value.clone());
        debug!("declared {}", node);
        nodes.push(node);
    }
    Ok(nodes)
}

fn lower_function_definition(def: &FunctionDefinition, ctx: &mut LowerCtx) -> Result<DeclNode, LowerError> {
    let spec_info = lower_declaration_specifiers(&def.specifiers, ctx)?;

    if !def.declarations.is_empty() {
        ctx.diag
            .report_unsupported(UnsupportedConstruct::KnrDeclarationList, def.grammar_case(), def.span);
    }

    let mut node = resolve_declarator(&spec_info.descriptor, &def.declarator, ctx)?;
    node.storage = spec_info.storage;
    ctx.symbols.record(node.name.clone(), None);
    debug!("defined {}", node);
    Ok(node)
}

fn lower_initializer(node: &mut DeclNode, initializer: &Initializer, ctx: &mut LowerCtx) {
    match initializer {
        Initializer::Expr(expr) => {
            node.value = ctx.evaluator.evaluate(expr, &ctx.symbols);
            node.expression = Some(ctx.evaluator.render(expr));
        }
        Initializer::List { span, .. } => {
            ctx.diag
                .report_unsupported(UnsupportedConstruct::InitializerList, initializer.grammar_case(), *span);
        }
    }
}

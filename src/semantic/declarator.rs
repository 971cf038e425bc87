//! Declarator resolution.
//!
//! A declarator is applied to its base descriptor top-down: the outermost
//! suffix or prefix is peeled first and the walk continues with the
//! declarator it was attached to, until the identifier leaf is reached. With
//! this order every modifier lands on the node that exists at the moment it is
//! met:
//!
//! - pointer markers add to `pointers`
//! - an array suffix prepends its dimension, so `a[X][Y]` ends up as `[X, Y]`
//! - a function suffix moves everything accumulated so far into the return
//!   node, and the walk continues on the function node itself
//!
//! So `int (*f(void))[3]` first records `[3]`, then one pointer, then wraps both
//! into the return type of `f`.

use log::debug;

use crate::ast::{ArraySize, Declarator, DirectDeclarator, Expr, FunctionSuffix, GrammarNode};
use crate::diagnostic::UnsupportedConstruct;
use crate::semantic::error::LowerError;
use crate::semantic::lowering::LowerCtx;
use crate::semantic::params::lower_parameter_list;
use crate::semantic::types::{ArrayDim, DeclNode, FunctionType, TypeDescriptor};

/// Resolve `declarator` against a base descriptor shared by its siblings.
pub(crate) fn resolve_declarator(
    base: &TypeDescriptor,
    declarator: &Declarator,
    ctx: &mut LowerCtx,
) -> Result<DeclNode, LowerError> {
    // Each declarator owns a deep copy of the shared base.
    let mut node = DeclNode::new(base.clone());
    node.span = declarator.span;
    apply_declarator(node, declarator, ctx)
}

fn apply_declarator(mut node: DeclNode, declarator: &Declarator, ctx: &mut LowerCtx) -> Result<DeclNode, LowerError> {
    if let Some(pointer) = &declarator.pointer {
        let depth = pointer.markers().count() as u32;
        node.pointers += depth;
        debug!("pointer depth +{} -> {}", depth, node.pointers);
    }
    apply_direct_declarator(node, &declarator.direct, ctx)
}

fn apply_direct_declarator(
    mut node: DeclNode,
    direct: &DirectDeclarator,
    ctx: &mut LowerCtx,
) -> Result<DeclNode, LowerError> {
    node.span = direct.span();

    match direct {
        DirectDeclarator::Identifier(ident) => {
            debug!("identifier {}", ident.name);
            node.name = ident.name.clone();
            Ok(node)
        }
        DirectDeclarator::Paren(inner) => apply_declarator(node, inner, ctx),
        DirectDeclarator::Array { inner, size, .. } => {
            let dim = lower_array_size(size, direct, ctx);
            debug!("array dimension [{}]", dim);
            node.arrays.insert(0, dim);
            apply_direct_declarator(node, inner, ctx)
        }
        DirectDeclarator::Function { inner, suffix, .. } => {
            let node = wrap_function(node, suffix, ctx)?;
            apply_direct_declarator(node, inner, ctx)
        }
    }
}

/// Wrap the node built so far into the return type of a function node.
fn wrap_function(returns: DeclNode, suffix: &FunctionSuffix, ctx: &mut LowerCtx) -> Result<DeclNode, LowerError> {
    let span = returns.span;
    debug!("function returning {}", returns.type_string());

    let (params, variadic) = match suffix {
        FunctionSuffix::Parameters(list) => (lower_parameter_list(list, ctx)?, list.variadic),
        FunctionSuffix::Identifiers(_) => {
            ctx.diag
                .report_unsupported(UnsupportedConstruct::OldStyleParameters, suffix.grammar_case(), span);
            (Vec::new(), false)
        }
    };

    let mut node = DeclNode::new(TypeDescriptor::Function(FunctionType {
        returns: Box::new(returns),
        params,
        variadic,
    }));
    node.span = span;
    Ok(node)
}

fn lower_array_size(size: &ArraySize, direct: &DirectDeclarator, ctx: &mut LowerCtx) -> ArrayDim {
    match size {
        ArraySize::Sized(None) => ArrayDim::Unsized,
        ArraySize::Sized(Some(expr)) => evaluate_dimension(expr, ctx),
        ArraySize::Static(expr) | ArraySize::QualifiedStatic(expr) => {
            ctx.diag.report_unsupported(
                UnsupportedConstruct::StaticArrayQualifier,
                direct.grammar_case(),
                direct.span(),
            );
            evaluate_dimension(expr, ctx)
        }
        ArraySize::Star => {
            ctx.diag.report_unsupported(
                UnsupportedConstruct::VariableLengthArray,
                direct.grammar_case(),
                direct.span(),
            );
            ArrayDim::Unsized
        }
    }
}

/// Evaluated bound, or its rendered text when it is not a non-negative constant.
fn evaluate_dimension(expr: &Expr, ctx: &mut LowerCtx) -> ArrayDim {
    match ctx.evaluator.evaluate(expr, &ctx.symbols).and_then(|value| value.as_int()) {
        Some(len) if len >= 0 => ArrayDim::Known(len as u64),
        _ => ArrayDim::Symbolic(ctx.evaluator.render(expr)),
    }
}

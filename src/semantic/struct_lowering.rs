use log::debug;

use crate::ast::{GrammarNode, StructDeclaration, StructDeclarator, StructOrUnion, StructOrUnionSpecifier};
use crate::diagnostic::UnsupportedConstruct;
use crate::semantic::declarator::resolve_declarator;
use crate::semantic::error::LowerError;
use crate::semantic::lowering::LowerCtx;
use crate::semantic::type_builder::lower_specifier_qualifiers;
use crate::semantic::types::{AggregateType, DeclNode, TypeDescriptor};

/// Resolve a struct/union specifier. Definitions with a tag are recorded in
/// the tag table; a bare reference only carries its tag.
pub(crate) fn lower_record_specifier(
    spec: &StructOrUnionSpecifier,
    ctx: &mut LowerCtx,
) -> Result<AggregateType, LowerError> {
    let tag = spec.tag.as_ref().map(|ident| ident.name.clone());
    let is_union = spec.kind == StructOrUnion::Union;

    let Some(members) = &spec.members else {
        debug!("reference to {} {:?}", if is_union { "union" } else { "struct" }, tag);
        return Ok(AggregateType {
            tag,
            is_union,
            members: Vec::new(),
        });
    };

    let aggregate = AggregateType {
        tag,
        is_union,
        members: lower_struct_members(members, ctx)?,
    };
    debug!("{} with {} members", aggregate, aggregate.members.len());

    if let Some(tag) = &aggregate.tag {
        ctx.tags.insert(tag.clone(), aggregate.clone());
    }
    Ok(aggregate)
}

/// Lower the member declarations of a struct or union body.
pub(crate) fn lower_struct_members(
    members: &[StructDeclaration],
    ctx: &mut LowerCtx,
) -> Result<Vec<DeclNode>, LowerError> {
    let mut struct_members = Vec::new();
    for decl in members {
        let base = lower_specifier_qualifiers(&decl.specifiers, ctx)?;

        // Anonymous struct/union member (C11 6.7.2.1p13)
        if decl.declarators.is_empty() {
            match &base {
                TypeDescriptor::Aggregate(aggregate) if aggregate.tag.is_none() => {
                    let mut node = DeclNode::new(base.clone());
                    node.span = decl.span;
                    struct_members.push(node);
                }
                _ => ctx
                    .diag
                    .report_note("member declaration does not declare anything".to_string(), decl.span),
            }
            continue;
        }

        for declarator in &decl.declarators {
            match declarator {
                StructDeclarator::Declarator(d) => struct_members.push(resolve_declarator(&base, d, ctx)?),
                StructDeclarator::BitField { span, .. } => {
                    ctx.diag
                        .report_unsupported(UnsupportedConstruct::BitField, declarator.grammar_case(), *span);
                }
            }
        }
    }
    Ok(struct_members)
}

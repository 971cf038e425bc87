use crate::ast::{
    DeclarationSpecifier, GrammarNode, ParameterDeclaration, ParameterTypeList, TypeSpecifier, TypeSpecifierKind,
};
use crate::diagnostic::UnsupportedConstruct;
use crate::semantic::declarator::resolve_declarator;
use crate::semantic::error::LowerError;
use crate::semantic::lowering::LowerCtx;
use crate::semantic::type_builder::lower_declaration_specifiers;
use crate::semantic::types::DeclNode;

/// Lower a parameter-type-list into one node per named parameter.
///
/// `(void)` yields no parameters. Any other parameter without a declarator
/// identifier is reported and left out; its siblings are still lowered.
pub(crate) fn lower_parameter_list(list: &ParameterTypeList, ctx: &mut LowerCtx) -> Result<Vec<DeclNode>, LowerError> {
    if is_void_list(list) {
        return Ok(Vec::new());
    }

    let mut params = Vec::with_capacity(list.params.len());
    for param in &list.params {
        match param {
            ParameterDeclaration::Named {
                specifiers, declarator, ..
            } => {
                let spec_info = lower_declaration_specifiers(specifiers, ctx)?;
                let mut node = resolve_declarator(&spec_info.descriptor, declarator, ctx)?;
                node.storage = spec_info.storage;
                params.push(node);
            }
            ParameterDeclaration::Abstract { span, .. } => {
                ctx.diag
                    .report_unsupported(UnsupportedConstruct::AbstractDeclarator, param.grammar_case(), *span);
            }
        }
    }
    Ok(params)
}

fn is_void_list(list: &ParameterTypeList) -> bool {
    if list.variadic {
        return false;
    }
    let [ParameterDeclaration::Abstract {
        specifiers,
        declarator: None,
        ..
    }] = list.params.as_slice()
    else {
        return false;
    };
    matches!(
        specifiers.as_slice(),
        [DeclarationSpecifier::TypeSpecifier(TypeSpecifier {
            kind: TypeSpecifierKind::Void,
            ..
        })]
    )
}

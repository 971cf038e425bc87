//! Type specifier accumulation.
//!
//! Specifier keywords are applied in the order they appear, each one writing
//! into the descriptor built so far. The accumulation follows the grammar
//! cases rather than C's "any order" rules, so a later keyword overwrites an
//! earlier one instead of being validated against it.

use log::debug;

use crate::ast::{
    DeclarationSpecifier, GrammarNode, SpecifierQualifier, StorageClass, TypeQualifier, TypeQualifierKind,
    TypeSpecifier, TypeSpecifierKind,
};
use crate::diagnostic::UnsupportedConstruct;
use crate::semantic::error::LowerError;
use crate::semantic::lowering::LowerCtx;
use crate::semantic::struct_lowering::lower_record_specifier;
use crate::semantic::types::{BaseType, ScalarType, TypeDescriptor};
use crate::source::SourceSpan;

/// Information about declaration specifiers after processing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecInfo {
    pub descriptor: TypeDescriptor,
    pub storage: Option<StorageClass>,
}

/// Accumulate declaration specifiers into a base descriptor.
pub(crate) fn lower_declaration_specifiers(
    specs: &[DeclarationSpecifier],
    ctx: &mut LowerCtx,
) -> Result<SpecInfo, LowerError> {
    let mut info = SpecInfo::default();

    for spec in specs {
        match spec {
            DeclarationSpecifier::StorageClass(sc) => {
                debug!("storage class {}", sc.kind.as_str());
                info.storage = Some(sc.kind);
            }
            DeclarationSpecifier::TypeSpecifier(ts) => apply_type_specifier(&mut info.descriptor, ts, ctx)?,
            DeclarationSpecifier::TypeQualifier(tq) => apply_type_qualifier(&mut info.descriptor, tq, ctx),
            DeclarationSpecifier::FunctionSpecifier(fs) => {
                ctx.diag
                    .report_unsupported(UnsupportedConstruct::FunctionSpecifier, spec.grammar_case(), fs.span);
            }
        }
    }

    Ok(info)
}

/// Accumulate the specifier/qualifier list of a member declaration.
pub(crate) fn lower_specifier_qualifiers(
    specs: &[SpecifierQualifier],
    ctx: &mut LowerCtx,
) -> Result<TypeDescriptor, LowerError> {
    let mut descriptor = TypeDescriptor::default();

    for spec in specs {
        match spec {
            SpecifierQualifier::TypeSpecifier(ts) => apply_type_specifier(&mut descriptor, ts, ctx)?,
            SpecifierQualifier::TypeQualifier(tq) => apply_type_qualifier(&mut descriptor, tq, ctx),
        }
    }

    Ok(descriptor)
}

fn scalar_mut(descriptor: &mut TypeDescriptor, location: SourceSpan) -> Result<&mut ScalarType, LowerError> {
    let found = descriptor.kind_name();
    descriptor.as_scalar_mut().ok_or(LowerError::ShapeMismatch {
        expected: "scalar",
        found,
        location,
    })
}

fn apply_type_specifier(
    descriptor: &mut TypeDescriptor,
    ts: &TypeSpecifier,
    ctx: &mut LowerCtx,
) -> Result<(), LowerError> {
    let span = ts.span;
    match &ts.kind {
        TypeSpecifierKind::Void => scalar_mut(descriptor, span)?.base = Some(BaseType::Void),
        TypeSpecifierKind::Char => scalar_mut(descriptor, span)?.base = Some(BaseType::Char),
        TypeSpecifierKind::Short => scalar_mut(descriptor, span)?.short = true,
        TypeSpecifierKind::Int => scalar_mut(descriptor, span)?.base = Some(BaseType::Int),
        TypeSpecifierKind::Long => {
            let scalar = scalar_mut(descriptor, span)?;
            // `long long` is spelled as a plain long base.
            if scalar.long {
                scalar.base = Some(BaseType::Long);
            } else {
                scalar.long = true;
            }
        }
        TypeSpecifierKind::Float => scalar_mut(descriptor, span)?.base = Some(BaseType::Float),
        TypeSpecifierKind::Double => scalar_mut(descriptor, span)?.base = Some(BaseType::Double),
        TypeSpecifierKind::Signed => {
            scalar_mut(descriptor, span)?;
        }
        TypeSpecifierKind::Unsigned => scalar_mut(descriptor, span)?.unsigned = true,
        TypeSpecifierKind::Bool => scalar_mut(descriptor, span)?.base = Some(BaseType::Bool),
        TypeSpecifierKind::Complex => scalar_mut(descriptor, span)?.base = Some(BaseType::Complex),
        TypeSpecifierKind::StructOrUnion(record) => {
            *descriptor = TypeDescriptor::Aggregate(lower_record_specifier(record, ctx)?);
        }
        TypeSpecifierKind::Enum(_) => {
            ctx.diag
                .report_unsupported(UnsupportedConstruct::Enumeration, ts.grammar_case(), span);
        }
        TypeSpecifierKind::TypedefName(name) => {
            scalar_mut(descriptor, span)?.base = Some(BaseType::Named(name.clone()));
        }
    }
    Ok(())
}

/// Qualifiers do not accumulate: the last one seen decides `is_const`, `_Atomic` included.
fn apply_type_qualifier(descriptor: &mut TypeDescriptor, tq: &TypeQualifier, ctx: &mut LowerCtx) {
    if tq.kind == TypeQualifierKind::Atomic {
        ctx.diag
            .report_unsupported(UnsupportedConstruct::AtomicQualifier, tq.grammar_case(), tq.span);
    }

    let kind_name = descriptor.kind_name();
    match descriptor.as_scalar_mut() {
        Some(scalar) => scalar.is_const = tq.kind == TypeQualifierKind::Const,
        None => debug!("qualifier {:?} on {} descriptor ignored", tq.kind, kind_name),
    }
}

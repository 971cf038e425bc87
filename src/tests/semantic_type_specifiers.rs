use thin_vec::ThinVec;

use super::test_utils::*;
use crate::ast::TypeSpecifierKind::*;
use crate::ast::*;
use crate::semantic::LowerError;
use crate::semantic::type_builder::lower_declaration_specifiers;
use crate::semantic::types::{BaseType, ScalarType, TypeDescriptor};

fn resolve(specifiers: ThinVec<DeclarationSpecifier>) -> (ScalarType, usize) {
    let (node, diagnostics) = lower_single(specifiers, ident("x"));
    match node.ty {
        TypeDescriptor::Scalar(scalar) => (scalar, diagnostics.len()),
        other => panic!("expected scalar descriptor, found {}", other.kind_name()),
    }
}

fn check_type(kinds: &[TypeSpecifierKind], expected: &str) {
    let (scalar, _) = resolve(specs(kinds.iter().cloned()));
    assert_eq!(scalar.to_string(), expected);
}

#[test]
fn test_plain_keywords() {
    check_type(&[Int], "int");
    check_type(&[Char], "char");
    check_type(&[Double], "double");
    check_type(&[Void], "void");
    check_type(&[Bool], "_Bool");
}

#[test]
fn test_unsigned_long_int() {
    let (scalar, _) = resolve(specs([Unsigned, Long, Int]));
    assert!(scalar.unsigned);
    assert!(scalar.long);
    assert_eq!(scalar.base, Some(BaseType::Int));
    assert_eq!(scalar.to_string(), "unsigned long int");
}

#[test]
fn test_short_int() {
    check_type(&[Short, Int], "short int");
}

#[test]
fn test_signed_is_ignored() {
    let (scalar, _) = resolve(specs([Signed, Char]));
    assert_eq!(scalar, ScalarType::new(BaseType::Char));
}

#[test]
fn test_unsigned_without_base() {
    let (scalar, _) = resolve(specs([Unsigned]));
    assert_eq!(scalar.base, None);
    assert_eq!(scalar.to_string(), "unsigned");
}

#[test]
fn test_long_long_rewrites_base() {
    let (scalar, _) = resolve(specs([Long, Long]));
    assert!(scalar.long);
    assert_eq!(scalar.base, Some(BaseType::Long));
    assert_eq!(scalar.to_string(), "long long");
}

#[test]
fn test_long_long_int_keeps_last_base() {
    // Later keywords overwrite: `int` replaces the base written by the second `long`.
    let (scalar, _) = resolve(specs([Long, Long, Int]));
    assert!(scalar.long);
    assert_eq!(scalar.base, Some(BaseType::Int));

    let (scalar, _) = resolve(specs([Int, Long, Long]));
    assert_eq!(scalar.base, Some(BaseType::Long));
}

#[test]
fn test_last_base_keyword_wins() {
    check_type(&[Int, Char], "char");
}

#[test]
fn test_typedef_name_is_not_expanded() {
    let (scalar, _) = resolve(specs([TypedefName("size_t".into())]));
    assert_eq!(scalar.base, Some(BaseType::Named("size_t".into())));
    assert_eq!(scalar.to_string(), "size_t");
}

#[test]
fn test_const_int() {
    let specifiers = [
        DeclarationSpecifier::qualifier(TypeQualifierKind::Const),
        DeclarationSpecifier::ty(Int),
    ]
    .into_iter()
    .collect();
    let (scalar, _) = resolve(specifiers);
    assert!(scalar.is_const);
    assert_eq!(scalar.to_string(), "const int");
}

/// Qualifiers do not accumulate: only the last one seen decides `is_const`.
#[test]
fn test_qualifier_last_write_wins() {
    let const_volatile = [
        DeclarationSpecifier::qualifier(TypeQualifierKind::Const),
        DeclarationSpecifier::qualifier(TypeQualifierKind::Volatile),
        DeclarationSpecifier::ty(Int),
    ];
    let (scalar, _) = resolve(const_volatile.into_iter().collect());
    assert!(!scalar.is_const, "volatile after const clears const");

    let volatile_const = [
        DeclarationSpecifier::qualifier(TypeQualifierKind::Volatile),
        DeclarationSpecifier::qualifier(TypeQualifierKind::Const),
        DeclarationSpecifier::ty(Int),
    ];
    let (scalar, _) = resolve(volatile_const.into_iter().collect());
    assert!(scalar.is_const);
}

#[test]
fn test_atomic_qualifier_is_reported_and_clears_const() {
    let specifiers = [
        DeclarationSpecifier::qualifier(TypeQualifierKind::Const),
        DeclarationSpecifier::qualifier(TypeQualifierKind::Atomic),
        DeclarationSpecifier::ty(Int),
    ];
    let output = lower_items(vec![declaration(specifiers.into_iter().collect(), vec![ident("x")])]);
    let scalar = output.declarations[0].ty.as_scalar().cloned().unwrap_or_default();
    assert!(!scalar.is_const, "_Atomic after const clears const");
    assert_eq!(scalar.to_string(), "int");
    assert_eq!(codes(&output.diagnostics), vec![case(Production::TypeQualifier, 3)]);

    let atomic_const = [
        DeclarationSpecifier::qualifier(TypeQualifierKind::Atomic),
        DeclarationSpecifier::qualifier(TypeQualifierKind::Const),
        DeclarationSpecifier::ty(Int),
    ];
    let (scalar, reported) = resolve(atomic_const.into_iter().collect());
    assert!(scalar.is_const);
    assert_eq!(reported, 1);
}

#[test]
fn test_enum_leaves_base_unset() {
    let color = Enum(EnumSpecifier {
        tag: Some(Ident::new("Color")),
        enumerators: None,
        span: Default::default(),
    });
    let output = lower_items(vec![
        declaration(specs([color]), vec![ident("c")]),
        declaration(int_specs(), vec![ident("after")]),
    ]);

    assert_eq!(output.declarations.len(), 2);
    assert_eq!(output.declarations[0].ty.as_scalar().and_then(|s| s.base.clone()), None);
    assert_eq!(codes(&output.diagnostics), vec![case(Production::TypeSpecifier, 12)]);
}

#[test]
fn test_function_specifier_is_reported() {
    let specifiers = [
        DeclarationSpecifier::function(FunctionSpecifierKind::Inline),
        DeclarationSpecifier::ty(Int),
    ];
    let output = lower_items(vec![declaration(specifiers.into_iter().collect(), vec![ident("x")])]);
    assert_eq!(output.declarations[0].to_string(), "x: int");
    assert_eq!(codes(&output.diagnostics), vec![case(Production::DeclarationSpecifiers, 3)]);
}

#[test]
fn test_storage_class_is_kept() {
    let specifiers = [DeclarationSpecifier::storage(StorageClass::Static), DeclarationSpecifier::ty(Int)];
    let (node, _) = lower_single(specifiers.into_iter().collect(), ident("counter"));
    assert_eq!(node.storage, Some(StorageClass::Static));

    let specifiers = [DeclarationSpecifier::storage(StorageClass::Typedef), DeclarationSpecifier::ty(Int)];
    let (node, _) = lower_single(specifiers.into_iter().collect(), ident("myint"));
    assert!(node.is_typedef());
    assert_eq!(node.type_string(), "int");
}

#[test]
fn test_builder_is_idempotent() {
    let specifiers: ThinVec<DeclarationSpecifier> = [
        DeclarationSpecifier::storage(StorageClass::Extern),
        DeclarationSpecifier::qualifier(TypeQualifierKind::Const),
        DeclarationSpecifier::ty(Unsigned),
        DeclarationSpecifier::ty(Long),
        DeclarationSpecifier::ty(Int),
    ]
    .into_iter()
    .collect();

    with_ctx(|ctx| {
        let first = lower_declaration_specifiers(&specifiers, ctx);
        let second = lower_declaration_specifiers(&specifiers, ctx);
        assert_eq!(first, second);
    });
}

#[test]
fn test_builder_is_idempotent_for_aggregates() {
    let specifiers = specs([struct_def(Some("Pair"), vec![int_member(&["a", "b"])])]);
    with_ctx(|ctx| {
        let first = lower_declaration_specifiers(&specifiers, ctx);
        let second = lower_declaration_specifiers(&specifiers, ctx);
        assert!(first.is_ok());
        assert_eq!(first, second);
    });
}

#[test]
fn test_scalar_keyword_after_aggregate_is_fatal() {
    let specifiers = specs([struct_ref("Foo"), Int]);
    let result = with_ctx(|ctx| lower_declaration_specifiers(&specifiers, ctx));
    assert!(matches!(
        result,
        Err(LowerError::ShapeMismatch {
            expected: "scalar",
            found: "aggregate",
            ..
        })
    ));
}

#[test]
fn test_qualifier_after_aggregate_is_ignored() {
    let specifiers = [
        DeclarationSpecifier::ty(struct_ref("Foo")),
        DeclarationSpecifier::qualifier(TypeQualifierKind::Const),
    ];
    let (node, diagnostics) = lower_single(specifiers.into_iter().collect(), ident("f"));
    assert_eq!(node.to_string(), "f: struct Foo");
    assert!(diagnostics.is_empty());
}

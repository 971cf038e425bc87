use thin_vec::ThinVec;

use super::test_utils::*;
use crate::ast::*;
use crate::semantic::{FunctionType, Value};

fn function_of(node: &crate::semantic::DeclNode) -> FunctionType {
    match node.ty.as_function() {
        Some(function) => function.clone(),
        None => panic!("expected function descriptor, found {}", node.ty.kind_name()),
    }
}

fn const_char() -> ThinVec<DeclarationSpecifier> {
    [
        DeclarationSpecifier::qualifier(TypeQualifierKind::Const),
        DeclarationSpecifier::ty(TypeSpecifierKind::Char),
    ]
    .into_iter()
    .collect()
}

#[test]
fn test_named_parameters() {
    let declarator = DirectDeclarator::ident("add")
        .function(ParameterTypeList::new(vec![int_param("a"), int_param("b")]))
        .into_declarator();
    let (node, diagnostics) = lower_single(int_specs(), declarator);

    let function = function_of(&node);
    let names: Vec<_> = function.params.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(!function.variadic);
    assert!(diagnostics.is_empty());
    assert_eq!(node.to_string(), "add: fn(int a, int b) -> int");
}

#[test]
fn test_void_parameter_list_is_empty() {
    let declarator = DirectDeclarator::ident("rand")
        .function(ParameterTypeList::void())
        .into_declarator();
    let (node, diagnostics) = lower_single(int_specs(), declarator);
    assert!(function_of(&node).params.is_empty());
    assert!(diagnostics.is_empty());
}

#[test]
fn test_variadic_parameters() {
    let fmt = named_param(const_char(), ident("fmt").pointers(1));
    let declarator = DirectDeclarator::ident("printf")
        .function(ParameterTypeList::new(vec![fmt]).variadic())
        .into_declarator();
    let (node, _) = lower_single(int_specs(), declarator);

    let function = function_of(&node);
    assert!(function.variadic);
    assert_eq!(function.params[0].pointers, 1);
    assert_eq!(node.to_string(), "printf: fn(const char * fmt, ...) -> int");
}

#[test]
fn test_abstract_parameter_is_omitted() {
    // int f(int, char *name);
    let declarator = DirectDeclarator::ident("f")
        .function(ParameterTypeList::new(vec![
            ParameterDeclaration::unnamed(int_specs(), None),
            named_param(specs([TypeSpecifierKind::Char]), ident("name").pointers(1)),
        ]))
        .into_declarator();
    let (node, diagnostics) = lower_single(int_specs(), declarator);

    let function = function_of(&node);
    assert_eq!(function.params.len(), 1);
    assert_eq!(function.params[0].name, "name");
    assert_eq!(codes(&diagnostics), vec![case(Production::ParameterDeclaration, 1)]);
}

#[test]
fn test_void_with_variadic_is_not_empty_list() {
    // `(void, ...)` is not the empty list: the abstract `void` is reported.
    let declarator = DirectDeclarator::ident("odd")
        .function(ParameterTypeList::void().variadic())
        .into_declarator();
    let (node, diagnostics) = lower_single(int_specs(), declarator);
    assert!(function_of(&node).variadic);
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_parameter_storage_class() {
    let specifiers = [
        DeclarationSpecifier::storage(StorageClass::Register),
        DeclarationSpecifier::ty(TypeSpecifierKind::Int),
    ]
    .into_iter()
    .collect();
    let declarator = DirectDeclarator::ident("fast")
        .function(ParameterTypeList::new(vec![named_param(specifiers, ident("n"))]))
        .into_declarator();
    let (node, _) = lower_single(specs([TypeSpecifierKind::Void]), declarator);
    assert_eq!(function_of(&node).params[0].storage, Some(StorageClass::Register));
}

#[test]
fn test_function_pointer_parameter() {
    // void sort(int (*cmp)(int a, int b));
    let cmp = DirectDeclarator::paren(ident("cmp").pointers(1))
        .function(ParameterTypeList::new(vec![int_param("a"), int_param("b")]))
        .into_declarator();
    let declarator = DirectDeclarator::ident("sort")
        .function(ParameterTypeList::new(vec![named_param(int_specs(), cmp)]))
        .into_declarator();
    let (node, _) = lower_single(specs([TypeSpecifierKind::Void]), declarator);

    let param = &function_of(&node).params[0];
    assert_eq!(param.name, "cmp");
    assert_eq!(param.pointers, 1);
    assert_eq!(function_of(param).params.len(), 2);
    assert_eq!(node.to_string(), "sort: fn((fn(int a, int b) -> int) * cmp) -> void");
}

#[test]
fn test_function_definition() {
    // static int main(void) { ... }
    let specifiers = [
        DeclarationSpecifier::storage(StorageClass::Static),
        DeclarationSpecifier::ty(TypeSpecifierKind::Int),
    ]
    .into_iter()
    .collect();
    let declarator = DirectDeclarator::ident("main")
        .function(ParameterTypeList::void())
        .into_declarator();
    let output = lower_items(vec![FunctionDefinition::new(specifiers, declarator).into()]);

    let main = &output.declarations[0];
    assert!(main.is_function());
    assert_eq!(main.storage, Some(StorageClass::Static));
    assert_eq!(output.symbols.get("main"), Some(&None::<Value>));
    assert!(output.diagnostics.is_empty());
}

#[test]
fn test_old_style_definition_is_reported() {
    // int area(w, h) int w; int h; { ... }
    let declarator = DirectDeclarator::ident("area")
        .function_with(FunctionSuffix::Identifiers(vec![Ident::new("w"), Ident::new("h")]))
        .into_declarator();
    let mut definition = FunctionDefinition::new(int_specs(), declarator);
    definition.declarations = vec![
        Declaration::new(int_specs(), vec![ident("w").into()]),
        Declaration::new(int_specs(), vec![ident("h").into()]),
    ];
    let output = lower_items(vec![definition.into()]);

    assert_eq!(output.declarations.len(), 1);
    assert!(!output.symbols.contains("w"));
    assert_eq!(
        codes(&output.diagnostics),
        vec![case(Production::FunctionDefinition, 1), case(Production::FunctionSuffix, 1)]
    );
}

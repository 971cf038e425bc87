use super::test_utils::*;
use crate::ast::*;
use crate::diagnostic::DiagnosticLevel;
use crate::semantic::{AggregateType, TypeDescriptor};

fn aggregate_of(ty: &TypeDescriptor) -> &AggregateType {
    match ty.as_aggregate() {
        Some(aggregate) => aggregate,
        None => panic!("expected aggregate descriptor, found {}", ty.kind_name()),
    }
}

fn member_names(aggregate: &AggregateType) -> Vec<&str> {
    aggregate.members.iter().map(|m| m.name.as_str()).collect()
}

#[test]
fn test_struct_point_round_trip() {
    // struct Point { int x; int y; };
    // struct Point p;
    let output = lower_items(vec![
        declaration(
            specs([struct_def(Some("Point"), vec![int_member(&["x"]), int_member(&["y"])])]),
            vec![],
        ),
        declaration(specs([struct_ref("Point")]), vec![ident("p")]),
    ]);

    assert_eq!(output.declarations.len(), 1);
    let p = &output.declarations[0];
    assert_eq!(p.name, "p");
    assert_eq!(aggregate_of(&p.ty).tag.as_deref(), Some("Point"));
    assert!(aggregate_of(&p.ty).members.is_empty());

    let point = &output.tags["Point"];
    assert!(!point.is_union);
    assert_eq!(member_names(point), vec!["x", "y"]);
    assert!(point.members.iter().all(|m| m.ty.as_scalar().is_some()));

    let notes: Vec<_> = output
        .diagnostics
        .iter()
        .filter(|d| d.level == DiagnosticLevel::Note)
        .collect();
    assert_eq!(notes.len(), 1);
    assert_eq!(output.issues().count(), 0);
}

#[test]
fn test_definition_with_declarators() {
    // struct Point { int x, y; } origin, *cursor;
    let output = lower_items(vec![declaration(
        specs([struct_def(Some("Point"), vec![int_member(&["x", "y"])])]),
        vec![ident("origin"), ident("cursor").pointers(1)],
    )]);

    let origin = &output.declarations[0];
    let cursor = &output.declarations[1];
    assert_eq!(member_names(aggregate_of(&origin.ty)), vec!["x", "y"]);
    assert_eq!(origin.ty, cursor.ty);
    assert_eq!(cursor.pointers, 1);
    assert_eq!(cursor.to_string(), "cursor: struct Point *");
    assert_eq!(output.tags.len(), 1);
}

#[test]
fn test_members_get_their_own_modifiers() {
    // struct List { int len, *items, slots[4]; };
    let member = StructDeclaration::new(
        member_specs([TypeSpecifierKind::Int]),
        vec![
            ident("len").into(),
            ident("items").pointers(1).into(),
            DirectDeclarator::ident("slots")
                .array(Some(Expr::int(4)))
                .into_declarator()
                .into(),
        ],
    );
    let output = lower_items(vec![declaration(specs([struct_def(Some("List"), vec![member])]), vec![])]);

    let list = &output.tags["List"];
    let rendered: Vec<String> = list.members.iter().map(|m| m.to_string()).collect();
    assert_eq!(rendered, vec!["len: int", "items: int *", "slots: int [4]"]);
}

#[test]
fn test_bit_field_does_not_abort_siblings() {
    // struct Flags { int a; unsigned b : 3; int c, d : 2, e; };
    let bit_field = StructDeclaration::new(
        member_specs([TypeSpecifierKind::Unsigned]),
        vec![StructDeclarator::BitField {
            declarator: Some(ident("b")),
            width: Expr::int(3),
            span: Default::default(),
        }],
    );
    let mixed = StructDeclaration::new(
        member_specs([TypeSpecifierKind::Int]),
        vec![
            ident("c").into(),
            StructDeclarator::BitField {
                declarator: Some(ident("d")),
                width: Expr::int(2),
                span: Default::default(),
            },
            ident("e").into(),
        ],
    );
    let output = lower_items(vec![declaration(
        specs([struct_def(Some("Flags"), vec![int_member(&["a"]), bit_field, mixed])]),
        vec![ident("flags")],
    )]);

    let flags = &output.declarations[0];
    assert_eq!(member_names(aggregate_of(&flags.ty)), vec!["a", "c", "e"]);
    assert_eq!(
        codes(&output.diagnostics),
        vec![case(Production::StructDeclarator, 1), case(Production::StructDeclarator, 1)]
    );
}

#[test]
fn test_union_and_forward_reference() {
    let value = TypeSpecifierKind::StructOrUnion(StructOrUnionSpecifier::definition(
        StructOrUnion::Union,
        Some("Value"),
        vec![int_member(&["i"]), StructDeclaration::new(
            member_specs([TypeSpecifierKind::Double]),
            vec![ident("d").into()],
        )],
    ));
    let reference = TypeSpecifierKind::StructOrUnion(StructOrUnionSpecifier::reference(StructOrUnion::Union, "Value"));
    let output = lower_items(vec![
        declaration(specs([value]), vec![ident("v")]),
        declaration(specs([reference]), vec![ident("w")]),
    ]);

    let v = aggregate_of(&output.declarations[0].ty);
    assert!(v.is_union);
    assert_eq!(v.to_string(), "union Value");
    assert_eq!(member_names(v), vec!["i", "d"]);

    let w = aggregate_of(&output.declarations[1].ty);
    assert!(w.is_union);
    assert!(w.members.is_empty());
}

#[test]
fn test_anonymous_member() {
    // struct Shape { int kind; union { int radius; int side; }; };
    let anonymous = StructDeclaration::new(
        [SpecifierQualifier::TypeSpecifier(TypeSpecifier::new(TypeSpecifierKind::StructOrUnion(
            StructOrUnionSpecifier::definition(StructOrUnion::Union, None, vec![int_member(&["radius", "side"])]),
        )))]
        .into_iter()
        .collect(),
        vec![],
    );
    let output = lower_items(vec![declaration(
        specs([struct_def(Some("Shape"), vec![int_member(&["kind"]), anonymous])]),
        vec![],
    )]);

    let shape = &output.tags["Shape"];
    assert_eq!(shape.members.len(), 2);
    let unnamed = &shape.members[1];
    assert_eq!(unnamed.name, "");
    let inner = aggregate_of(&unnamed.ty);
    assert!(inner.is_union);
    assert_eq!(inner.tag, None);
    assert_eq!(member_names(inner), vec!["radius", "side"]);
    assert_eq!(output.tags.len(), 1);
}

#[test]
fn test_declarator_less_tagged_member_is_dropped() {
    // struct Outer { struct Inner { int v; }; int w; };
    let inner = StructDeclaration::new(
        member_specs([struct_def(Some("Inner"), vec![int_member(&["v"])])]),
        vec![],
    );
    let output = lower_items(vec![declaration(
        specs([struct_def(Some("Outer"), vec![inner, int_member(&["w"])])]),
        vec![],
    )]);

    assert_eq!(member_names(&output.tags["Outer"]), vec!["w"]);
    assert_eq!(output.tags.keys().collect::<Vec<_>>(), vec!["Inner", "Outer"]);
    assert_eq!(output.issues().count(), 0);
    assert_eq!(output.diagnostics.len(), 2);
}

#[test]
fn test_nested_member_struct() {
    // struct Line { struct Point { int x, y; } from, to; };
    let endpoints = StructDeclaration::new(
        member_specs([struct_def(Some("Point"), vec![int_member(&["x", "y"])])]),
        vec![ident("from").into(), ident("to").into()],
    );
    let output = lower_items(vec![declaration(
        specs([struct_def(Some("Line"), vec![endpoints])]),
        vec![ident("segment")],
    )]);

    let line = aggregate_of(&output.declarations[0].ty);
    assert_eq!(member_names(line), vec!["from", "to"]);
    assert_eq!(line.members[0].ty, line.members[1].ty);
    assert_eq!(member_names(aggregate_of(&line.members[1].ty)), vec!["x", "y"]);
    assert!(output.tags.contains_key("Point"));
}

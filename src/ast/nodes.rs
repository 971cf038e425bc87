//! Parse tree node definitions and builder helpers.
//!
//! The tree mirrors the C grammar productions the external parser reduces. Every
//! production that has alternatives exposes its grammar case index through
//! [`GrammarNode`], which is what diagnostics report for constructs the lowering
//! declines to model.

use std::fmt;

use serde::{Deserialize, Serialize};
use thin_vec::ThinVec;

use crate::ast::expr::Expr;
use crate::source::SourceSpan;

/// Grammar productions that diagnostics can refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Production {
    DeclarationSpecifiers,
    SpecifierQualifierList,
    TypeSpecifier,
    TypeQualifier,
    StructOrUnionSpecifier,
    StructDeclarator,
    DirectDeclarator,
    FunctionSuffix,
    ParameterDeclaration,
    Initializer,
    FunctionDefinition,
}

/// A production together with the alternative that was reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GrammarCase {
    pub production: Production,
    pub case: u8,
}

impl fmt::Display for GrammarCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} case {}", self.production, self.case)
    }
}

/// Closed production tag of a parse tree node.
pub trait GrammarNode {
    const PRODUCTION: Production;

    fn case(&self) -> u8;

    fn grammar_case(&self) -> GrammarCase {
        GrammarCase {
            production: Self::PRODUCTION,
            case: self.case(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    #[serde(default)]
    pub span: SourceSpan,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Ident {
            name: name.into(),
            span: SourceSpan::empty(),
        }
    }
}

// --- Translation units ---

/// One parsed source file. Units are chained through `next` in the order the
/// parser produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationUnit {
    #[serde(default)]
    pub items: Vec<ExternalDeclaration>,
    #[serde(default)]
    pub next: Option<Box<TranslationUnit>>,
}

impl TranslationUnit {
    pub fn new(items: Vec<ExternalDeclaration>) -> Self {
        TranslationUnit { items, next: None }
    }

    /// Appends `unit` at the end of the chain.
    pub fn chain(mut self, unit: TranslationUnit) -> Self {
        let mut tail = &mut self.next;
        while let Some(next) = tail {
            tail = &mut next.next;
        }
        *tail = Some(Box::new(unit));
        self
    }

    /// Iterates this unit and every unit chained after it.
    pub fn units(&self) -> impl Iterator<Item = &TranslationUnit> {
        std::iter::successors(Some(self), |unit| unit.next.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExternalDeclaration {
    FunctionDefinition(FunctionDefinition),
    Declaration(Declaration),
}

impl From<Declaration> for ExternalDeclaration {
    fn from(decl: Declaration) -> Self {
        ExternalDeclaration::Declaration(decl)
    }
}

impl From<FunctionDefinition> for ExternalDeclaration {
    fn from(def: FunctionDefinition) -> Self {
        ExternalDeclaration::FunctionDefinition(def)
    }
}

/// `declaration-specifiers declarator declaration-list? compound-statement`.
/// The body is not part of this tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub specifiers: ThinVec<DeclarationSpecifier>,
    pub declarator: Declarator,
    /// Old-style parameter declarations between the declarator and the body.
    #[serde(default)]
    pub declarations: Vec<Declaration>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl FunctionDefinition {
    pub fn new(specifiers: ThinVec<DeclarationSpecifier>, declarator: Declarator) -> Self {
        FunctionDefinition {
            specifiers,
            declarator,
            declarations: Vec::new(),
            span: SourceSpan::empty(),
        }
    }
}

impl GrammarNode for FunctionDefinition {
    const PRODUCTION: Production = Production::FunctionDefinition;

    fn case(&self) -> u8 {
        if self.declarations.is_empty() { 0 } else { 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    pub specifiers: ThinVec<DeclarationSpecifier>,
    #[serde(default)]
    pub init_declarators: Vec<InitDeclarator>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl Declaration {
    pub fn new(specifiers: ThinVec<DeclarationSpecifier>, init_declarators: Vec<InitDeclarator>) -> Self {
        Declaration {
            specifiers,
            init_declarators,
            span: SourceSpan::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitDeclarator {
    pub declarator: Declarator,
    #[serde(default)]
    pub initializer: Option<Initializer>,
}

impl InitDeclarator {
    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = Some(initializer);
        self
    }
}

impl From<Declarator> for InitDeclarator {
    fn from(declarator: Declarator) -> Self {
        InitDeclarator {
            declarator,
            initializer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Initializer {
    Expr(Expr),
    List {
        items: Vec<Initializer>,
        #[serde(default)]
        trailing_comma: bool,
        #[serde(default)]
        span: SourceSpan,
    },
}

impl Initializer {
    pub fn span(&self) -> SourceSpan {
        match self {
            Initializer::Expr(expr) => expr.span,
            Initializer::List { span, .. } => *span,
        }
    }
}

impl GrammarNode for Initializer {
    const PRODUCTION: Production = Production::Initializer;

    fn case(&self) -> u8 {
        match self {
            Initializer::Expr(_) => 0,
            Initializer::List { trailing_comma: false, .. } => 1,
            Initializer::List { trailing_comma: true, .. } => 2,
        }
    }
}

// --- Specifiers and qualifiers ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclarationSpecifier {
    StorageClass(StorageClassSpecifier),
    TypeSpecifier(TypeSpecifier),
    TypeQualifier(TypeQualifier),
    FunctionSpecifier(FunctionSpecifier),
}

impl DeclarationSpecifier {
    pub fn ty(kind: TypeSpecifierKind) -> Self {
        DeclarationSpecifier::TypeSpecifier(TypeSpecifier::new(kind))
    }

    pub fn qualifier(kind: TypeQualifierKind) -> Self {
        DeclarationSpecifier::TypeQualifier(TypeQualifier::new(kind))
    }

    pub fn storage(kind: StorageClass) -> Self {
        DeclarationSpecifier::StorageClass(StorageClassSpecifier {
            kind,
            span: SourceSpan::empty(),
        })
    }

    pub fn function(kind: FunctionSpecifierKind) -> Self {
        DeclarationSpecifier::FunctionSpecifier(FunctionSpecifier {
            kind,
            span: SourceSpan::empty(),
        })
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            DeclarationSpecifier::StorageClass(s) => s.span,
            DeclarationSpecifier::TypeSpecifier(s) => s.span,
            DeclarationSpecifier::TypeQualifier(q) => q.span,
            DeclarationSpecifier::FunctionSpecifier(f) => f.span,
        }
    }
}

impl GrammarNode for DeclarationSpecifier {
    const PRODUCTION: Production = Production::DeclarationSpecifiers;

    fn case(&self) -> u8 {
        match self {
            DeclarationSpecifier::StorageClass(_) => 0,
            DeclarationSpecifier::TypeSpecifier(_) => 1,
            DeclarationSpecifier::TypeQualifier(_) => 2,
            DeclarationSpecifier::FunctionSpecifier(_) => 3,
        }
    }
}

/// Specifier list of a struct member declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecifierQualifier {
    TypeSpecifier(TypeSpecifier),
    TypeQualifier(TypeQualifier),
}

impl SpecifierQualifier {
    pub fn ty(kind: TypeSpecifierKind) -> Self {
        SpecifierQualifier::TypeSpecifier(TypeSpecifier::new(kind))
    }

    pub fn qualifier(kind: TypeQualifierKind) -> Self {
        SpecifierQualifier::TypeQualifier(TypeQualifier::new(kind))
    }
}

impl GrammarNode for SpecifierQualifier {
    const PRODUCTION: Production = Production::SpecifierQualifierList;

    fn case(&self) -> u8 {
        match self {
            SpecifierQualifier::TypeSpecifier(_) => 0,
            SpecifierQualifier::TypeQualifier(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageClass {
    Typedef,
    Extern,
    Static,
    Auto,
    Register,
}

impl StorageClass {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageClass::Typedef => "typedef",
            StorageClass::Extern => "extern",
            StorageClass::Static => "static",
            StorageClass::Auto => "auto",
            StorageClass::Register => "register",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageClassSpecifier {
    pub kind: StorageClass,
    #[serde(default)]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionSpecifierKind {
    Inline,
    Noreturn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpecifier {
    pub kind: FunctionSpecifierKind,
    #[serde(default)]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeQualifierKind {
    Const,
    Restrict,
    Volatile,
    Atomic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeQualifier {
    pub kind: TypeQualifierKind,
    #[serde(default)]
    pub span: SourceSpan,
}

impl TypeQualifier {
    pub fn new(kind: TypeQualifierKind) -> Self {
        TypeQualifier {
            kind,
            span: SourceSpan::empty(),
        }
    }
}

impl GrammarNode for TypeQualifier {
    const PRODUCTION: Production = Production::TypeQualifier;

    fn case(&self) -> u8 {
        match self.kind {
            TypeQualifierKind::Const => 0,
            TypeQualifierKind::Restrict => 1,
            TypeQualifierKind::Volatile => 2,
            TypeQualifierKind::Atomic => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpecifier {
    pub kind: TypeSpecifierKind,
    #[serde(default)]
    pub span: SourceSpan,
}

impl TypeSpecifier {
    pub fn new(kind: TypeSpecifierKind) -> Self {
        TypeSpecifier {
            kind,
            span: SourceSpan::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TypeSpecifierKind {
    Void,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Signed,
    Unsigned,
    Bool,
    Complex,
    StructOrUnion(StructOrUnionSpecifier),
    Enum(EnumSpecifier),
    TypedefName(String),
}

impl GrammarNode for TypeSpecifier {
    const PRODUCTION: Production = Production::TypeSpecifier;

    fn case(&self) -> u8 {
        match self.kind {
            TypeSpecifierKind::Void => 0,
            TypeSpecifierKind::Char => 1,
            TypeSpecifierKind::Short => 2,
            TypeSpecifierKind::Int => 3,
            TypeSpecifierKind::Long => 4,
            TypeSpecifierKind::Float => 5,
            TypeSpecifierKind::Double => 6,
            TypeSpecifierKind::Signed => 7,
            TypeSpecifierKind::Unsigned => 8,
            TypeSpecifierKind::Bool => 9,
            TypeSpecifierKind::Complex => 10,
            TypeSpecifierKind::StructOrUnion(_) => 11,
            TypeSpecifierKind::Enum(_) => 12,
            TypeSpecifierKind::TypedefName(_) => 13,
        }
    }
}

// --- Aggregates ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructOrUnion {
    Struct,
    Union,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructOrUnionSpecifier {
    pub kind: StructOrUnion,
    #[serde(default)]
    pub tag: Option<Ident>,
    /// `None` for a bare reference such as `struct Foo`.
    #[serde(default)]
    pub members: Option<Vec<StructDeclaration>>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl StructOrUnionSpecifier {
    pub fn definition(kind: StructOrUnion, tag: Option<&str>, members: Vec<StructDeclaration>) -> Self {
        StructOrUnionSpecifier {
            kind,
            tag: tag.map(Ident::new),
            members: Some(members),
            span: SourceSpan::empty(),
        }
    }

    pub fn reference(kind: StructOrUnion, tag: &str) -> Self {
        StructOrUnionSpecifier {
            kind,
            tag: Some(Ident::new(tag)),
            members: None,
            span: SourceSpan::empty(),
        }
    }
}

impl GrammarNode for StructOrUnionSpecifier {
    const PRODUCTION: Production = Production::StructOrUnionSpecifier;

    fn case(&self) -> u8 {
        if self.members.is_some() { 0 } else { 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDeclaration {
    pub specifiers: ThinVec<SpecifierQualifier>,
    #[serde(default)]
    pub declarators: Vec<StructDeclarator>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl StructDeclaration {
    pub fn new(specifiers: ThinVec<SpecifierQualifier>, declarators: Vec<StructDeclarator>) -> Self {
        StructDeclaration {
            specifiers,
            declarators,
            span: SourceSpan::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StructDeclarator {
    Declarator(Declarator),
    BitField {
        #[serde(default)]
        declarator: Option<Declarator>,
        width: Expr,
        #[serde(default)]
        span: SourceSpan,
    },
}

impl From<Declarator> for StructDeclarator {
    fn from(declarator: Declarator) -> Self {
        StructDeclarator::Declarator(declarator)
    }
}

impl GrammarNode for StructDeclarator {
    const PRODUCTION: Production = Production::StructDeclarator;

    fn case(&self) -> u8 {
        match self {
            StructDeclarator::Declarator(_) => 0,
            StructDeclarator::BitField { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumSpecifier {
    #[serde(default)]
    pub tag: Option<Ident>,
    #[serde(default)]
    pub enumerators: Option<Vec<Enumerator>>,
    #[serde(default)]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enumerator {
    pub name: Ident,
    #[serde(default)]
    pub value: Option<Expr>,
}

// --- Declarators ---

/// `pointer? direct-declarator`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declarator {
    #[serde(default)]
    pub pointer: Option<Pointer>,
    pub direct: DirectDeclarator,
    #[serde(default)]
    pub span: SourceSpan,
}

impl Declarator {
    pub fn new(direct: DirectDeclarator) -> Self {
        Declarator {
            pointer: None,
            direct,
            span: SourceSpan::empty(),
        }
    }

    /// Replaces the pointer prefix with a chain of `depth` markers.
    pub fn pointers(mut self, depth: usize) -> Self {
        self.pointer = Pointer::chain(depth);
        self
    }
}

/// `* type-qualifier-list? pointer?`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    #[serde(default)]
    pub qualifiers: ThinVec<TypeQualifier>,
    #[serde(default)]
    pub next: Option<Box<Pointer>>,
    #[serde(default)]
    pub span: SourceSpan,
}

impl Pointer {
    pub fn chain(depth: usize) -> Option<Pointer> {
        (0..depth).fold(None, |next, _| {
            Some(Pointer {
                qualifiers: ThinVec::new(),
                next: next.map(Box::new),
                span: SourceSpan::empty(),
            })
        })
    }

    /// Iterates this marker and every marker after it.
    pub fn markers(&self) -> impl Iterator<Item = &Pointer> {
        std::iter::successors(Some(self), |p| p.next.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DirectDeclarator {
    Identifier(Ident),
    Paren(Box<Declarator>),
    Array {
        inner: Box<DirectDeclarator>,
        #[serde(default)]
        qualifiers: ThinVec<TypeQualifier>,
        size: ArraySize,
        #[serde(default)]
        span: SourceSpan,
    },
    Function {
        inner: Box<DirectDeclarator>,
        suffix: FunctionSuffix,
        #[serde(default)]
        span: SourceSpan,
    },
}

/// Bracket contents of an array declarator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArraySize {
    /// `[q? expr?]`
    Sized(Option<Expr>),
    /// `[static q? expr]`
    Static(Expr),
    /// `[q static expr]`
    QualifiedStatic(Expr),
    /// `[q? *]`
    Star,
}

impl DirectDeclarator {
    pub fn ident(name: impl Into<String>) -> Self {
        DirectDeclarator::Identifier(Ident::new(name))
    }

    pub fn paren(inner: Declarator) -> Self {
        DirectDeclarator::Paren(Box::new(inner))
    }

    pub fn array(self, size: Option<Expr>) -> Self {
        self.array_with(ArraySize::Sized(size))
    }

    pub fn array_with(self, size: ArraySize) -> Self {
        DirectDeclarator::Array {
            inner: Box::new(self),
            qualifiers: ThinVec::new(),
            size,
            span: SourceSpan::empty(),
        }
    }

    pub fn function(self, params: ParameterTypeList) -> Self {
        self.function_with(FunctionSuffix::Parameters(params))
    }

    pub fn function_with(self, suffix: FunctionSuffix) -> Self {
        DirectDeclarator::Function {
            inner: Box::new(self),
            suffix,
            span: SourceSpan::empty(),
        }
    }

    pub fn into_declarator(self) -> Declarator {
        Declarator::new(self)
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            DirectDeclarator::Identifier(ident) => ident.span,
            DirectDeclarator::Paren(inner) => inner.span,
            DirectDeclarator::Array { span, .. } | DirectDeclarator::Function { span, .. } => *span,
        }
    }
}

impl GrammarNode for DirectDeclarator {
    const PRODUCTION: Production = Production::DirectDeclarator;

    fn case(&self) -> u8 {
        match self {
            DirectDeclarator::Identifier(_) => 0,
            DirectDeclarator::Paren(_) => 1,
            DirectDeclarator::Array { size, .. } => match size {
                ArraySize::Sized(_) => 2,
                ArraySize::Static(_) => 3,
                ArraySize::QualifiedStatic(_) => 4,
                ArraySize::Star => 5,
            },
            DirectDeclarator::Function { .. } => 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FunctionSuffix {
    Parameters(ParameterTypeList),
    /// Old-style `(a, b, c)`; empty for `()`.
    Identifiers(Vec<Ident>),
}

impl GrammarNode for FunctionSuffix {
    const PRODUCTION: Production = Production::FunctionSuffix;

    fn case(&self) -> u8 {
        match self {
            FunctionSuffix::Parameters(_) => 0,
            FunctionSuffix::Identifiers(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterTypeList {
    #[serde(default)]
    pub params: Vec<ParameterDeclaration>,
    #[serde(default)]
    pub variadic: bool,
    #[serde(default)]
    pub span: SourceSpan,
}

impl ParameterTypeList {
    pub fn new(params: Vec<ParameterDeclaration>) -> Self {
        ParameterTypeList {
            params,
            variadic: false,
            span: SourceSpan::empty(),
        }
    }

    /// `(void)`
    pub fn void() -> Self {
        ParameterTypeList::new(vec![ParameterDeclaration::unnamed(
            [DeclarationSpecifier::ty(TypeSpecifierKind::Void)].into_iter().collect(),
            None,
        )])
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterDeclaration {
    Named {
        specifiers: ThinVec<DeclarationSpecifier>,
        declarator: Declarator,
        #[serde(default)]
        span: SourceSpan,
    },
    Abstract {
        specifiers: ThinVec<DeclarationSpecifier>,
        #[serde(default)]
        declarator: Option<AbstractDeclarator>,
        #[serde(default)]
        span: SourceSpan,
    },
}

impl ParameterDeclaration {
    pub fn named(specifiers: ThinVec<DeclarationSpecifier>, declarator: Declarator) -> Self {
        ParameterDeclaration::Named {
            specifiers,
            declarator,
            span: SourceSpan::empty(),
        }
    }

    pub fn unnamed(specifiers: ThinVec<DeclarationSpecifier>, declarator: Option<AbstractDeclarator>) -> Self {
        ParameterDeclaration::Abstract {
            specifiers,
            declarator,
            span: SourceSpan::empty(),
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            ParameterDeclaration::Named { span, .. } | ParameterDeclaration::Abstract { span, .. } => *span,
        }
    }
}

impl GrammarNode for ParameterDeclaration {
    const PRODUCTION: Production = Production::ParameterDeclaration;

    fn case(&self) -> u8 {
        match self {
            ParameterDeclaration::Named { .. } => 0,
            ParameterDeclaration::Abstract { .. } => 1,
        }
    }
}

/// Declarator without an identifier, as in `int (*)[3]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractDeclarator {
    #[serde(default)]
    pub pointer: Option<Pointer>,
    #[serde(default)]
    pub direct: Option<Box<DirectAbstractDeclarator>>,
    #[serde(default)]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DirectAbstractDeclarator {
    Paren(Box<AbstractDeclarator>),
    Array {
        #[serde(default)]
        inner: Option<Box<DirectAbstractDeclarator>>,
        size: ArraySize,
    },
    Function {
        #[serde(default)]
        inner: Option<Box<DirectAbstractDeclarator>>,
        #[serde(default)]
        params: Option<ParameterTypeList>,
    },
}

//! Declarator-free type model produced by the lowering.
//!
//! A [`DeclNode`] owns exactly one [`TypeDescriptor`]. Pointer indirections are
//! collapsed into `DeclNode::pointers` and array bounds into
//! `DeclNode::arrays`, so the only nesting left is the return type of a
//! function and the members of an aggregate.

use std::fmt::{self, Display};

use itertools::Itertools;
use serde::Serialize;

use crate::ast::StorageClass;
use crate::semantic::const_eval::Value;
use crate::source::SourceSpan;

/// One resolved declared entity: variable, parameter, member or function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeclNode {
    /// Empty until the identifier leaf is reached, and for return types.
    pub name: String,
    pub ty: TypeDescriptor,
    pub pointers: u32,
    /// Outermost dimension first.
    pub arrays: Vec<ArrayDim>,
    pub span: SourceSpan,
    pub storage: Option<StorageClass>,
    pub value: Option<Value>,
    /// Rendered initializer expression.
    pub expression: Option<String>,
}

impl DeclNode {
    pub fn new(ty: TypeDescriptor) -> Self {
        DeclNode {
            name: String::new(),
            ty,
            pointers: 0,
            arrays: Vec::new(),
            span: SourceSpan::empty(),
            storage: None,
            value: None,
            expression: None,
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.ty, TypeDescriptor::Function(_)) && self.pointers == 0 && self.arrays.is_empty()
    }

    pub fn is_typedef(&self) -> bool {
        self.storage == Some(StorageClass::Typedef)
    }

    /// C-like description of the node's type, without the name.
    pub fn type_string(&self) -> String {
        let base = match &self.ty {
            TypeDescriptor::Function(func) if self.pointers > 0 || !self.arrays.is_empty() => {
                format!("({})", func)
            }
            ty => ty.to_string(),
        };
        let mut out = base;
        if self.pointers > 0 {
            out.push(' ');
            out.extend(std::iter::repeat_n('*', self.pointers as usize));
        }
        if !self.arrays.is_empty() {
            if self.pointers == 0 {
                out.push(' ');
            }
            for dim in &self.arrays {
                out.push_str(&format!("[{}]", dim));
            }
        }
        out
    }
}

impl Display for DeclNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_string())
    }
}

/// Shape of a declared entity. Closed: every consumer matches all three.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeDescriptor {
    Scalar(ScalarType),
    Aggregate(AggregateType),
    Function(FunctionType),
}

impl Default for TypeDescriptor {
    fn default() -> Self {
        TypeDescriptor::Scalar(ScalarType::default())
    }
}

impl TypeDescriptor {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeDescriptor::Scalar(_) => "scalar",
            TypeDescriptor::Aggregate(_) => "aggregate",
            TypeDescriptor::Function(_) => "function",
        }
    }

    pub fn as_scalar(&self) -> Option<&ScalarType> {
        match self {
            TypeDescriptor::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateType> {
        match self {
            TypeDescriptor::Aggregate(aggregate) => Some(aggregate),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            TypeDescriptor::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn as_scalar_mut(&mut self) -> Option<&mut ScalarType> {
        match self {
            TypeDescriptor::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(scalar) => scalar.fmt(f),
            TypeDescriptor::Aggregate(aggregate) => aggregate.fmt(f),
            TypeDescriptor::Function(func) => func.fmt(f),
        }
    }
}

/// Base keyword of a scalar, or the name of an unexpanded typedef.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BaseType {
    Void,
    Char,
    Int,
    Long,
    Float,
    Double,
    Bool,
    Complex,
    Named(String),
}

impl Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BaseType::Void => "void",
            BaseType::Char => "char",
            BaseType::Int => "int",
            BaseType::Long => "long",
            BaseType::Float => "float",
            BaseType::Double => "double",
            BaseType::Bool => "_Bool",
            BaseType::Complex => "_Complex",
            BaseType::Named(name) => name,
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScalarType {
    /// `None` when no base keyword was seen (`unsigned x;`) or the
    /// specifier is an enumeration, which is not resolved.
    pub base: Option<BaseType>,
    pub unsigned: bool,
    pub short: bool,
    pub long: bool,
    pub is_const: bool,
}

impl ScalarType {
    pub fn new(base: BaseType) -> Self {
        ScalarType {
            base: Some(base),
            ..ScalarType::default()
        }
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<String> = Vec::new();
        if self.is_const {
            words.push("const".into());
        }
        if self.unsigned {
            words.push("unsigned".into());
        }
        if self.short {
            words.push("short".into());
        }
        if self.long {
            words.push("long".into());
        }
        if let Some(base) = &self.base {
            words.push(base.to_string());
        }
        if words.is_empty() {
            return f.write_str("<unresolved>");
        }
        write!(f, "{}", words.join(" "))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateType {
    pub tag: Option<String>,
    pub is_union: bool,
    /// Empty for a bare `struct Foo` reference.
    pub members: Vec<DeclNode>,
}

impl AggregateType {
    pub fn keyword(&self) -> &'static str {
        if self.is_union { "union" } else { "struct" }
    }
}

impl Display for AggregateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{} {}", self.keyword(), tag),
            None => write!(f, "{} (anonymous)", self.keyword()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionType {
    pub returns: Box<DeclNode>,
    pub params: Vec<DeclNode>,
    pub variadic: bool,
}

impl Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut params: Vec<String> = self
            .params
            .iter()
            .map(|param| {
                if param.name.is_empty() {
                    param.type_string()
                } else {
                    format!("{} {}", param.type_string(), param.name)
                }
            })
            .collect();
        if self.variadic {
            params.push("...".into());
        }
        write!(f, "fn({}) -> {}", params.iter().join(", "), self.returns.type_string())
    }
}

/// One array dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ArrayDim {
    Known(u64),
    /// Size expression that could not be evaluated, as rendered text.
    Symbolic(String),
    /// `[]` or `[*]`.
    Unsized,
}

impl Display for ArrayDim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayDim::Known(len) => write!(f, "{}", len),
            ArrayDim::Symbolic(text) => f.write_str(text),
            ArrayDim::Unsized => Ok(()),
        }
    }
}

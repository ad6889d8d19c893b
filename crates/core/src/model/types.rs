//! The normalized type algebra.
//!
//! Every [`TypeDefinition`](crate::schema::TypeDefinition) maps to exactly one
//! [`TypeNode`]. The tree is language-agnostic; rendering into TypeScript lives
//! in [`crate::ir::render`].

use crate::error::{Error, Result};
use crate::model::format::FormatTarget;
use crate::schema::Literal;

/// A normalized type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    /// Plain string, optionally carrying an unrecognized `format`.
    String(StringType),
    /// A string whose `format` is known to the format registry.
    FormattedString(FormattedStringType),
    /// `number` or `integer`.
    Number(NumberType),
    Boolean,
    /// A single literal value.
    Constant(Constant),
    /// Two or more alternatives.
    Union(UnionType),
    Object(ObjectType),
    Array(ArrayType),
    /// Named type resolved at render time.
    Reference(TypeReference),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringType {
    pub format: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedStringType {
    pub format: String,
    pub target: FormatTarget,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberType {
    pub integer: bool,
    pub format: Option<String>,
}

/// A literal value together with the type it was declared as.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub value: Literal,
    pub base: Box<TypeNode>,
}

impl Constant {
    pub fn new(value: Literal, base: TypeNode) -> Self {
        Self {
            value,
            base: Box::new(base),
        }
    }

    /// A string constant, as used for screen and feature names.
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(
            Literal::String(value.into()),
            TypeNode::String(StringType::default()),
        )
    }
}

/// Ordered alternatives. Always holds at least two options.
#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    options: Vec<TypeNode>,
}

impl UnionType {
    pub fn options(&self) -> &[TypeNode] {
        &self.options
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectType {
    pub properties: Vec<ObjectProperty>,
    pub additional_properties: bool,
}

impl ObjectType {
    pub fn property(&self, name: &str) -> Option<&ObjectProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectProperty {
    pub name: String,
    pub ty: TypeNode,
    pub required: bool,
}

impl ObjectProperty {
    pub fn new(name: impl Into<String>, ty: TypeNode, required: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            required,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    pub items: Box<TypeNode>,
}

/// Pointer to a named type, e.g. `#/$defs/Foo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReference {
    pub reference: String,
}

impl TypeReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }

    /// Second path segment (`$defs` in `#/$defs/Foo`), used for import mappings.
    pub fn namespace(&self) -> Option<&str> {
        self.reference.split('/').nth(1)
    }

    /// Last path segment.
    pub fn name(&self) -> &str {
        self.reference
            .rsplit('/')
            .next()
            .unwrap_or(self.reference.as_str())
    }
}

impl TypeNode {
    /// Build a union, collapsing a single option to itself.
    pub fn union(mut options: Vec<TypeNode>) -> Result<TypeNode> {
        match options.len() {
            0 => Err(Error::EmptyUnion),
            1 => Ok(options.remove(0)),
            _ => Ok(TypeNode::Union(UnionType { options })),
        }
    }

    /// Build the constant form of an enum: one value is a constant, more is a
    /// union of constants, in input order.
    ///
    /// `inf` and `NaN` have no TypeScript literal type and are rejected.
    pub fn enumeration(values: Vec<Literal>, base: &TypeNode) -> Result<TypeNode> {
        let mut constants = Vec::with_capacity(values.len());
        for value in values {
            if let Literal::Float(f) = value
                && !f.is_finite()
            {
                return Err(Error::UnsupportedConstantKind(format!(
                    "non-finite number `{f}`"
                )));
            }
            constants.push(TypeNode::Constant(Constant::new(value, base.clone())));
        }
        match constants.len() {
            0 => Err(Error::EmptyEnum),
            1 => Ok(constants.remove(0)),
            _ => Ok(TypeNode::Union(UnionType { options: constants })),
        }
    }

    pub fn array(items: TypeNode) -> TypeNode {
        TypeNode::Array(ArrayType {
            items: Box::new(items),
        })
    }

    /// Whether a value-position literal can be requested for this type.
    ///
    /// Arrays, unions and references have no single default value.
    pub fn has_literal_form(&self) -> bool {
        !matches!(
            self,
            TypeNode::Array(_) | TypeNode::Union(_) | TypeNode::Reference(_)
        )
    }

    /// Short name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeNode::String(_) => "string",
            TypeNode::FormattedString(_) => "formatted string",
            TypeNode::Number(_) => "number",
            TypeNode::Boolean => "boolean",
            TypeNode::Constant(_) => "constant",
            TypeNode::Union(_) => "union",
            TypeNode::Object(_) => "object",
            TypeNode::Array(_) => "array",
            TypeNode::Reference(_) => "reference",
        }
    }
}

//! Schema fragment -> [`TypeNode`] normalization.
//!
//! Dispatch follows [`TypeDefinition::kind`]: `const`, then `type` (with an
//! optional `enum`), then `$ref`, then `oneOf`. References are kept verbatim
//! and never resolved here.

use std::collections::HashSet;

use tracing::trace;

use crate::error::{Error, Result, ResultExt};
use crate::model::format::{BUILTIN_FORMATS, FormatRegistry};
use crate::model::types::{
    Constant, FormattedStringType, NumberType, ObjectProperty, ObjectType, StringType,
    TypeNode, TypeReference,
};
use crate::schema::{DefinitionKind, Literal, PrimitiveKind, TypeDefinition};

/// Normalize with the built-in format registry.
pub fn normalize(definition: &TypeDefinition) -> Result<TypeNode> {
    TypeMapper::new(&BUILTIN_FORMATS).map(definition)
}

/// Normalizer bound to a format registry.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    formats: &'a FormatRegistry,
}

impl<'a> TypeMapper<'a> {
    pub fn new(formats: &'a FormatRegistry) -> Self {
        Self { formats }
    }

    pub fn map(&self, definition: &TypeDefinition) -> Result<TypeNode> {
        let kind = definition.kind()?;
        trace!(?kind, "Normalizing type definition.");

        match kind {
            DefinitionKind::Constant => {
                let value = definition.const_value.as_ref().ok_or_else(|| {
                    Error::UnknownSchemaShape("`const` without a value".to_string())
                })?;
                map_constant(value)
            }
            DefinitionKind::Primitive(_) | DefinitionKind::Object | DefinitionKind::Array => {
                let base = self.map_typed(kind, definition)?;
                match &definition.enum_values {
                    Some(values) => TypeNode::enumeration(values.clone(), &base),
                    None => Ok(base),
                }
            }
            DefinitionKind::Reference => {
                let path = definition.ref_path.clone().unwrap_or_default();
                Ok(TypeNode::Reference(TypeReference::new(path)))
            }
            DefinitionKind::Union => {
                let options = definition
                    .one_of
                    .iter()
                    .flatten()
                    .map(|option| self.map(option))
                    .collect::<Result<Vec<_>>>()?;
                TypeNode::union(options)
            }
        }
    }

    /// Base type of a `type` fragment, ignoring any `enum`.
    fn map_typed(&self, kind: DefinitionKind, definition: &TypeDefinition) -> Result<TypeNode> {
        match kind {
            DefinitionKind::Primitive(PrimitiveKind::String) => Ok(self.map_string(definition)),
            DefinitionKind::Primitive(PrimitiveKind::Number) => Ok(TypeNode::Number(NumberType {
                integer: false,
                format: definition.format.clone(),
            })),
            DefinitionKind::Primitive(PrimitiveKind::Integer) => Ok(TypeNode::Number(NumberType {
                integer: true,
                format: definition.format.clone(),
            })),
            DefinitionKind::Primitive(PrimitiveKind::Boolean) => Ok(TypeNode::Boolean),
            DefinitionKind::Object => self.map_object(definition).map(TypeNode::Object),
            DefinitionKind::Array => {
                let items = definition.items.as_deref().ok_or_else(|| {
                    Error::UnknownSchemaShape("array without `items`".to_string())
                })?;
                let items = self.map(items).context_with(|| "array items")?;
                Ok(TypeNode::array(items))
            }
            DefinitionKind::Constant | DefinitionKind::Reference | DefinitionKind::Union => Err(
                Error::UnknownSchemaShape(format!("{kind:?} is not a `type` definition")),
            ),
        }
    }

    fn map_string(&self, definition: &TypeDefinition) -> TypeNode {
        match &definition.format {
            Some(format) => match self.formats.resolve(format) {
                Some(target) => TypeNode::FormattedString(FormattedStringType {
                    format: format.clone(),
                    target: target.clone(),
                }),
                None => TypeNode::String(StringType {
                    format: Some(format.clone()),
                }),
            },
            None => TypeNode::String(StringType::default()),
        }
    }

    pub fn map_object(&self, definition: &TypeDefinition) -> Result<ObjectType> {
        let required: HashSet<&str> = definition
            .required
            .iter()
            .flatten()
            .map(String::as_str)
            .collect();

        let mut properties = Vec::new();
        for (name, property) in definition.properties.iter().flatten() {
            let ty = self
                .map(property)
                .context_with(|| format!("property `{name}`"))?;
            properties.push(ObjectProperty::new(
                name.clone(),
                ty,
                required.contains(name.as_str()),
            ));
        }

        Ok(ObjectType {
            properties,
            additional_properties: definition
                .additional_properties
                .as_ref()
                .is_some_and(|a| a.allowed()),
        })
    }
}

fn map_constant(value: &serde_json::Value) -> Result<TypeNode> {
    match value {
        serde_json::Value::String(s) => Ok(TypeNode::Constant(Constant::string(s.clone()))),
        serde_json::Value::Number(n) => {
            let (literal, integer) = match n.as_i64() {
                Some(i) => (Literal::Integer(i), true),
                None => (Literal::Float(n.as_f64().unwrap_or_default()), false),
            };
            Ok(TypeNode::Constant(Constant::new(
                literal,
                TypeNode::Number(NumberType {
                    integer,
                    format: None,
                }),
            )))
        }
        serde_json::Value::Null => Err(Error::UnsupportedConstantKind("null".to_string())),
        serde_json::Value::Bool(_) => Err(Error::UnsupportedConstantKind("boolean".to_string())),
        serde_json::Value::Array(_) => Err(Error::UnsupportedConstantKind("array".to_string())),
        serde_json::Value::Object(_) => {
            Err(Error::UnsupportedConstantKind("object".to_string()))
        }
    }
}

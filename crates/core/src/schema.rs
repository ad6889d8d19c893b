//! Tracking plan document types.
//!
//! These mirror the YAML/JSON layout authored by analytics teams: a plan with
//! `tracks`, `screens`, `$defs` and `traits`, where every property is a
//! JSON-Schema-like [`TypeDefinition`].

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Root plan document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanDefinition {
    /// Module-level tracks, keyed by track key.
    #[serde(default)]
    pub tracks: IndexMap<String, Option<EventDefinition>>,

    /// Screens, keyed by screen key. Screens list the tracks fired on them.
    #[serde(default)]
    pub screens: IndexMap<String, Option<EventDefinition>>,

    /// Shared named types referenced as `#/$defs/<Name>`.
    #[serde(default, rename = "$defs")]
    pub defs: IndexMap<String, TypeDefinition>,

    /// User traits, rendered next to the shared definitions.
    #[serde(default)]
    pub traits: IndexMap<String, TypeDefinition>,
}

impl PlanDefinition {
    /// Parse a plan document. Only the document shape is checked here.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

/// A screen or track as written in the plan.
///
/// `key` is normally injected from the map key by the plan builder. A `type`
/// entry in the document is ignored: the kind comes from the section the
/// event lives in.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    /// Identifier the generated function is exported under.
    pub key: Option<String>,
    /// Name reported at runtime; defaults to `key`.
    pub name: Option<String>,
    /// Emitted as the function's JSDoc.
    pub description: Option<String>,
    /// Features this event belongs to, created on first mention.
    #[serde(default)]
    pub features: Vec<String>,
    /// Track keys fired on a screen. Ignored for tracks.
    #[serde(default)]
    pub tracks: Vec<String>,
    /// Whether `props` accepts keys beyond `properties`. Defaults to `false`.
    pub additional_properties: Option<bool>,
    pub login_required: Option<bool>,
    /// Names of the mandatory `properties`.
    pub required: Option<Vec<String>>,
    /// Payload properties, in declaration order.
    pub properties: Option<IndexMap<String, TypeDefinition>>,
}

impl EventDefinition {
    /// The event payload as an object schema, with the plan defaults applied.
    pub fn properties_definition(&self) -> TypeDefinition {
        TypeDefinition {
            type_name: Some("object".to_string()),
            properties: Some(self.properties.clone().unwrap_or_default()),
            required: Some(self.required.clone().unwrap_or_default()),
            additional_properties: Some(AdditionalProperties::Bool(
                self.additional_properties.unwrap_or(false),
            )),
            ..TypeDefinition::default()
        }
    }
}

/// JSON-Schema-like type fragment. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDefinition {
    /// `string`, `number`, `integer`, `boolean`, `object` or `array`.
    #[serde(rename = "type")]
    pub type_name: Option<String>,

    /// Reference path such as `#/$defs/Name`, kept verbatim.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Union options, in order.
    #[serde(rename = "oneOf")]
    pub one_of: Option<Vec<TypeDefinition>>,

    /// Present even when the value is `null`, so `const: null` is reported
    /// as an unsupported constant rather than an unknown shape.
    #[serde(rename = "const", default, deserialize_with = "deserialize_present")]
    pub const_value: Option<serde_json::Value>,

    /// Closed set of values for a `type` fragment.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Literal>>,

    /// String format keyword, resolved through the format registry.
    pub format: Option<String>,

    /// Object properties, in declaration order.
    pub properties: Option<IndexMap<String, TypeDefinition>>,

    /// Names of the mandatory object properties.
    pub required: Option<Vec<String>>,

    pub additional_properties: Option<AdditionalProperties>,

    /// Element type of an array.
    pub items: Option<Box<TypeDefinition>>,

    pub description: Option<String>,
}

fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// `additionalProperties` is either a flag or a schema; only the flag is used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true|false`
    Bool(bool),
    /// A schema for the extra values; treated as `true`.
    Schema(Box<TypeDefinition>),
}

impl AdditionalProperties {
    /// Whether keys beyond the declared properties are accepted.
    pub fn allowed(&self) -> bool {
        match self {
            AdditionalProperties::Bool(b) => *b,
            AdditionalProperties::Schema(_) => true,
        }
    }
}

/// Literal values allowed in `enum` lists and constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    /// String value.
    String(String),
    /// Whole number, kept exact.
    Integer(i64),
    /// Any other number.
    Float(f64),
    /// Boolean value.
    Bool(bool),
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

/// Which schema construct a [`TypeDefinition`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    /// `const`
    Constant,
    /// `type` with a scalar type name
    Primitive(PrimitiveKind),
    /// `type: object`
    Object,
    /// `type: array`
    Array,
    /// `$ref`
    Reference,
    /// `oneOf`
    Union,
}

/// Scalar `type` names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
}

impl TypeDefinition {
    /// Classify by key presence. Priority: `const`, `type`, `$ref`, `oneOf`.
    pub fn kind(&self) -> Result<DefinitionKind> {
        if self.const_value.is_some() {
            return Ok(DefinitionKind::Constant);
        }
        if let Some(type_name) = &self.type_name {
            return match type_name.as_str() {
                "string" => Ok(DefinitionKind::Primitive(PrimitiveKind::String)),
                "number" => Ok(DefinitionKind::Primitive(PrimitiveKind::Number)),
                "integer" => Ok(DefinitionKind::Primitive(PrimitiveKind::Integer)),
                "boolean" => Ok(DefinitionKind::Primitive(PrimitiveKind::Boolean)),
                "object" => Ok(DefinitionKind::Object),
                "array" => Ok(DefinitionKind::Array),
                other => Err(Error::UnknownSchemaShape(format!(
                    "unsupported type `{other}`"
                ))),
            };
        }
        if self.ref_path.is_some() {
            return Ok(DefinitionKind::Reference);
        }
        if self.one_of.is_some() {
            return Ok(DefinitionKind::Union);
        }
        Err(Error::UnknownSchemaShape(
            "expected one of `const`, `type`, `$ref` or `oneOf`".to_string(),
        ))
    }

    /// Fragment with only `type` set.
    pub fn of_type(type_name: &str) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
            ..Self::default()
        }
    }

    /// Fragment with only `$ref` set.
    pub fn reference(path: &str) -> Self {
        Self {
            ref_path: Some(path.to_string()),
            ..Self::default()
        }
    }
}

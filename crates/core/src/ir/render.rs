//! Rendering of the plan model into TypeScript AST.
//!
//! Two positions per type: as a type annotation ([`ToTsType`]) and as a known
//! value ([`ToTsLiteral`]), the latter used for narrowed defaults.

use indexmap::IndexMap;

use super::types::{ObjectMember, TsExpr, TsLiteral, TsNode, TsPrimitive, TsProp, TsType};
use crate::error::{Error, Result};
use crate::model::format::FormatTarget;
use crate::model::plan::NamedType;
use crate::model::types::{ObjectType, TypeNode, TypeReference};
use crate::schema::Literal;

/// Module and alias a reference namespace is imported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportMapping {
    pub module: String,
    pub alias: String,
}

impl ImportMapping {
    pub fn new(module: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            alias: alias.into(),
        }
    }
}

/// Namespace key (e.g. `$defs`) -> import mapping.
pub type ImportMappings = IndexMap<String, ImportMapping>;

pub const SHARED_DEFINITIONS: &str = "shared-definitions";
pub const SHARED_ALIAS: &str = "shared";

/// `$defs` references resolve through `import * as shared from "shared-definitions"`.
pub fn default_import_mappings() -> ImportMappings {
    let mut mappings = ImportMappings::new();
    mappings.insert(
        "$defs".to_string(),
        ImportMapping::new(SHARED_DEFINITIONS, SHARED_ALIAS),
    );
    mappings
}

pub trait ToTsType {
    fn to_ts_type(&self, mappings: &ImportMappings) -> TsType;
}

pub trait ToTsLiteral {
    /// `Ok(None)` means the type is supported but has no known value.
    fn to_ts_literal(&self) -> Result<Option<TsExpr>>;
}

pub fn literal(value: &Literal) -> TsLiteral {
    match value {
        Literal::String(s) => TsLiteral::String(s.clone()),
        Literal::Integer(i) => TsLiteral::Int(*i),
        Literal::Float(f) => TsLiteral::Number(*f),
        Literal::Bool(b) => TsLiteral::Bool(*b),
    }
}

impl ToTsType for TypeNode {
    fn to_ts_type(&self, mappings: &ImportMappings) -> TsType {
        match self {
            TypeNode::String(_) => TsType::Primitive(TsPrimitive::String),
            TypeNode::FormattedString(formatted) => match &formatted.target {
                FormatTarget::Date => TsType::Ref("Date".to_string()),
                FormatTarget::Named(name) => TsType::Ref(name.clone()),
            },
            TypeNode::Number(_) => TsType::Primitive(TsPrimitive::Number),
            TypeNode::Boolean => TsType::Primitive(TsPrimitive::Boolean),
            TypeNode::Constant(constant) => TsType::Literal(literal(&constant.value)),
            TypeNode::Union(union) => TsType::Union(
                union
                    .options()
                    .iter()
                    .map(|option| option.to_ts_type(mappings))
                    .collect(),
            ),
            TypeNode::Object(object) => object.to_ts_type(mappings),
            TypeNode::Array(array) => TsType::Array(Box::new(array.items.to_ts_type(mappings))),
            TypeNode::Reference(reference) => reference.to_ts_type(mappings),
        }
    }
}

impl ToTsType for ObjectType {
    fn to_ts_type(&self, mappings: &ImportMappings) -> TsType {
        TsType::Object(
            self.properties
                .iter()
                .map(|property| TsProp {
                    name: property.name.clone(),
                    ty: property.ty.to_ts_type(mappings),
                    optional: !property.required,
                })
                .collect(),
        )
    }
}

impl ToTsType for TypeReference {
    fn to_ts_type(&self, mappings: &ImportMappings) -> TsType {
        let name = self.name().to_string();
        match self.namespace().and_then(|ns| mappings.get(ns)) {
            Some(mapping) => TsType::Qualified {
                namespace: mapping.alias.clone(),
                name,
            },
            None => TsType::Ref(name),
        }
    }
}

impl ToTsLiteral for TypeNode {
    fn to_ts_literal(&self) -> Result<Option<TsExpr>> {
        match self {
            TypeNode::Constant(constant) => Ok(Some(TsExpr::Literal(literal(&constant.value)))),
            TypeNode::String(_)
            | TypeNode::FormattedString(_)
            | TypeNode::Number(_)
            | TypeNode::Boolean => Ok(None),
            TypeNode::Object(object) => object.to_ts_literal(),
            TypeNode::Union(_) | TypeNode::Array(_) | TypeNode::Reference(_) => {
                Err(Error::NotImplemented(self.kind_name()))
            }
        }
    }
}

impl ToTsLiteral for ObjectType {
    /// Object literal of the properties with a known value; `None` when there
    /// are none.
    fn to_ts_literal(&self) -> Result<Option<TsExpr>> {
        let members = literal_members(self)?;
        Ok((!members.is_empty()).then_some(TsExpr::Object(members)))
    }
}

/// Members for the properties that have a known value. Properties without a
/// literal form are left to the caller.
pub fn literal_members(object: &ObjectType) -> Result<Vec<ObjectMember>> {
    let mut members = Vec::new();
    for property in &object.properties {
        if !property.ty.has_literal_form() {
            continue;
        }
        if let Some(value) = property.ty.to_ts_literal()? {
            members.push(ObjectMember::Prop(property.name.clone(), value));
        }
    }
    Ok(members)
}

impl NamedType {
    /// `export type Name = T;`, preceded by the description when present.
    pub fn to_ts_nodes(&self, mappings: &ImportMappings) -> Vec<TsNode> {
        let mut nodes = Vec::new();
        if let Some(description) = &self.description {
            nodes.push(TsNode::Doc(description.clone()));
        }
        nodes.push(TsNode::TypeAlias {
            name: self.name.clone(),
            ty: self.ty.to_ts_type(mappings),
        });
        nodes
    }
}

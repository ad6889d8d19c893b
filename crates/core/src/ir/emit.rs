//! TypeScript code emission via the Emit trait.
//!
//! Each AST type implements `Emit`; [`emit_nodes`] lays out a whole module.

use super::types::{
    ObjectMember, TsArrow, TsExpr, TsImport, TsLiteral, TsNode, TsParam, TsPrimitive, TsProp,
    TsStmt, TsType,
};
use super::utils::{doc_comment, escape_js_string, quote_if_needed};

/// Trait for emitting TypeScript code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its TypeScript string representation.
    fn emit(&self) -> String;
}

fn join<T: Emit>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(Emit::emit)
        .collect::<Vec<_>>()
        .join(separator)
}

// =============================================================================
// Types
// =============================================================================

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string",
            TsPrimitive::Number => "number",
            TsPrimitive::Boolean => "boolean",
            TsPrimitive::Null => "null",
            TsPrimitive::Never => "never",
        }
        .to_string()
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", escape_js_string(s)),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
        }
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => {
                let inner_str = inner.emit();
                if matches!(**inner, TsType::Union(_)) {
                    format!("({inner_str})[]")
                } else {
                    format!("{inner_str}[]")
                }
            }
            TsType::Union(types) => join(types, " | "),
            TsType::Object(props) => {
                if props.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", join(props, "; "))
                }
            }
            TsType::Literal(lit) => lit.emit(),
            TsType::Ref(name) => name.clone(),
            TsType::Qualified { namespace, name } => format!("{namespace}.{name}"),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        format!("{}{}: {}", quote_if_needed(&self.name), opt, self.ty.emit())
    }
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for TsExpr {
    fn emit(&self) -> String {
        match self {
            TsExpr::Ident(name) => name.clone(),
            TsExpr::Literal(lit) => lit.emit(),
            TsExpr::Call { callee, args } => format!("{}({})", callee.emit(), join(args, ", ")),
            TsExpr::Arrow(arrow) => arrow.emit(),
            TsExpr::Object(members) => {
                if members.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", join(members, ", "))
                }
            }
            TsExpr::Member { object, prop } => format!("{}.{}", object.emit(), prop),
            TsExpr::Await(expr) => format!("await {}", expr.emit()),
        }
    }
}

impl Emit for ObjectMember {
    fn emit(&self) -> String {
        match self {
            ObjectMember::Prop(key, value) => format!("{}: {}", quote_if_needed(key), value.emit()),
            ObjectMember::Spread(expr) => format!("...{}", expr.emit()),
        }
    }
}

impl Emit for TsParam {
    fn emit(&self) -> String {
        let opt = if self.optional { "?" } else { "" };
        match &self.ty {
            Some(ty) => format!("{}{}: {}", self.name, opt, ty.emit()),
            None => format!("{}{}", self.name, opt),
        }
    }
}

impl Emit for TsArrow {
    fn emit(&self) -> String {
        let async_str = if self.is_async { "async " } else { "" };
        let mut output = format!("{}({}) =>", async_str, join(&self.params, ", "));
        if self.body.is_empty() {
            output.push_str(" {}");
        } else {
            output.push_str(" {\n");
            for stmt in &self.body {
                output.push_str(&stmt.emit_indented(1));
            }
            output.push('}');
        }
        output
    }
}

// =============================================================================
// Statements
// =============================================================================

impl Emit for TsStmt {
    fn emit(&self) -> String {
        self.emit_indented(1)
    }
}

impl TsStmt {
    /// Emit with specified indentation level (2 spaces per level)
    pub fn emit_indented(&self, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match self {
            TsStmt::Const { name, init } => format!("{prefix}const {name} = {};\n", init.emit()),
            TsStmt::Expr(expr) => format!("{prefix}{};\n", expr.emit()),
        }
    }
}

// =============================================================================
// Module items
// =============================================================================

impl Emit for TsImport {
    fn emit(&self) -> String {
        match self {
            TsImport::Namespace { alias, from } => {
                format!("import * as {alias} from \"{}\";\n", escape_js_string(from))
            }
            TsImport::Default { name, from } => {
                format!("import {name} from \"{}\";\n", escape_js_string(from))
            }
        }
    }
}

impl Emit for TsNode {
    fn emit(&self) -> String {
        match self {
            TsNode::Import(import) => import.emit(),
            TsNode::Doc(text) => doc_comment(text),
            TsNode::TypeAlias { name, ty } => format!("export type {name} = {};\n", ty.emit()),
            TsNode::ExportConst { name, init } => format!("export const {name} = {};\n", init.emit()),
            TsNode::ExportDefault(expr) => format!("export default {};\n", expr.emit()),
        }
    }
}

/// Emit a module: imports stay together, every other item is separated by a
/// blank line, and doc comments stick to the item they describe.
pub fn emit_nodes(nodes: &[TsNode]) -> String {
    let mut output = String::new();
    let mut previous: Option<&TsNode> = None;

    for node in nodes {
        let separate = match previous {
            None | Some(TsNode::Doc(_)) => false,
            Some(TsNode::Import(_)) => !matches!(node, TsNode::Import(_)),
            Some(_) => true,
        };
        if separate {
            output.push('\n');
        }
        output.push_str(&node.emit());
        previous = Some(node);
    }

    output
}

// =============================================================================
// Tests
// =============================================================================

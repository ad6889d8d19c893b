//! TypeScript AST for generated tracking modules.
//!
//! - TsType: type annotations (primitives, literals, unions, objects, references)
//! - TsExpr: expressions used in function bodies and export initializers
//! - TsNode: top-level module items (imports, doc comments, exports)

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    /// Primitive types: string, number, boolean, null, never
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Literal type: "foo", 42, true
    Literal(TsLiteral),
    /// Local type name: Date, FeatureNames
    Ref(String),
    /// Type reached through a namespace import: shared.FeatureNames
    Qualified { namespace: String, name: String },
}

/// TypeScript primitive types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Never,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

/// TypeScript literal values
#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Number(f64),
    Int(i64),
    Bool(bool),
}

/// TypeScript expression
#[derive(Debug, Clone, PartialEq)]
pub enum TsExpr {
    /// Identifier: foo
    Ident(String),
    /// Literal value: "bar", 42
    Literal(TsLiteral),
    /// Function call: foo(a, b)
    Call {
        callee: Box<TsExpr>,
        args: Vec<TsExpr>,
    },
    /// Arrow function with a block body
    Arrow(TsArrow),
    /// Object literal: { a: 1, ...rest }
    Object(Vec<ObjectMember>),
    /// Member access: console.log
    Member { object: Box<TsExpr>, prop: String },
    /// Await expression: await track()
    Await(Box<TsExpr>),
}

impl TsExpr {
    pub fn ident(name: &str) -> Self {
        TsExpr::Ident(name.to_string())
    }

    pub fn string(value: &str) -> Self {
        TsExpr::Literal(TsLiteral::String(value.to_string()))
    }
}

/// Object literal member
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    /// key: value
    Prop(String, TsExpr),
    /// ...expr
    Spread(TsExpr),
}

/// Function parameter
#[derive(Debug, Clone, PartialEq)]
pub struct TsParam {
    pub name: String,
    pub ty: Option<TsType>,
    pub optional: bool,
}

/// Arrow function: async (a, b) => { ... }
#[derive(Debug, Clone, PartialEq)]
pub struct TsArrow {
    pub params: Vec<TsParam>,
    pub body: Vec<TsStmt>,
    pub is_async: bool,
}

/// Statement in a function body
#[derive(Debug, Clone, PartialEq)]
pub enum TsStmt {
    /// const name = init;
    Const { name: String, init: TsExpr },
    /// Expression statement
    Expr(TsExpr),
}

// =============================================================================
// Module-Level IR
// =============================================================================

/// Import statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TsImport {
    /// import * as alias from "from";
    Namespace { alias: String, from: String },
    /// import name from "from";
    Default { name: String, from: String },
}

/// Top-level item of a generated module
#[derive(Debug, Clone, PartialEq)]
pub enum TsNode {
    Import(TsImport),
    /// JSDoc block attached to the following node
    Doc(String),
    /// export type Name = T;
    TypeAlias { name: String, ty: TsType },
    /// export const name = init;
    ExportConst { name: String, init: TsExpr },
    /// export default expr;
    ExportDefault(TsExpr),
}

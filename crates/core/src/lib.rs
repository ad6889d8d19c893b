//! Typed tracking-function generation from a declarative tracking plan.
//!
//! Pipeline: parse (`schema`) -> normalize and link (`model`) -> synthesize
//! TypeScript AST (`ir`) -> emit strings.

pub mod error;
pub mod ir;
pub mod model;
pub mod schema;

pub use error::{Error, Result};
pub use ir::{Emit, FileNodes, Transliterator, emit_nodes};
pub use model::format::{FormatRegistry, FormatTarget};
pub use model::plan::TrackingPlan;
pub use schema::PlanDefinition;

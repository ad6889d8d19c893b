//! TypeScript generation for a tracking plan.
//!
//! Three layers, as for any emitter in this crate:
//! 1. Rendering: plan model -> TypeScript AST (`render`, `codegen`, `transliterate`)
//! 2. TypeScript AST IR: types, expressions, statements, module items (`types`)
//! 3. Emission: AST to code strings via the `Emit` trait (`emit`)
//!
//! Only this module knows about TypeScript; the plan model stays
//! language-agnostic.

pub mod codegen;
pub mod emit;
pub mod render;
pub mod transliterate;
pub mod types;
pub mod utils;

pub use codegen::{
    SynthesisOptions, codegen_analytics_function, codegen_screen_module, codegen_track_export,
};
pub use emit::{Emit, emit_nodes};
pub use render::{ImportMapping, ImportMappings, ToTsLiteral, ToTsType, default_import_mappings};
pub use transliterate::{FileNodes, Transliterator, group_by_path};

//! Language-agnostic plan model: the type algebra, its normalizer, and the
//! screen/track/feature graph.

pub mod events;
pub mod format;
pub mod normalize;
pub mod plan;
pub mod types;

//! String `format` registry.
//!
//! Maps a `format` keyword to the type a formatted string renders as. The
//! registry is an owned value handed to the normalizer; callers register
//! their formats before building a plan.

use std::collections::HashMap;
use std::sync::LazyLock;

/// What a formatted string renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatTarget {
    /// The built-in `Date` type.
    Date,
    /// A caller-chosen type name, emitted verbatim.
    Named(String),
}

/// `format` keyword -> render target. `Default` has `date-time` -> `Date`.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    formats: HashMap<String, FormatTarget>,
}

/// Registry holding only the built-in formats.
pub static BUILTIN_FORMATS: LazyLock<FormatRegistry> = LazyLock::new(FormatRegistry::default);

impl Default for FormatRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("date-time", FormatTarget::Date);
        registry
    }
}

impl FormatRegistry {
    /// A registry without the built-ins.
    pub fn empty() -> Self {
        Self {
            formats: HashMap::new(),
        }
    }

    /// Add or replace a format.
    pub fn register(&mut self, format: impl Into<String>, target: FormatTarget) -> &mut Self {
        self.formats.insert(format.into(), target);
        self
    }

    /// `None` for formats the registry doesn't know; those stay plain strings.
    pub fn resolve(&self, format: &str) -> Option<&FormatTarget> {
        self.formats.get(format)
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

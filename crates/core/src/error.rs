//! Error types for plan loading, normalization and code synthesis.

use thiserror::Error;

/// Every failure aborts the whole generation run; nothing is partially emitted.
#[derive(Error, Debug)]
pub enum Error {
    /// None of `const`, `type`, `$ref` or `oneOf` could be interpreted.
    #[error("unknown type definition: {0}")]
    UnknownSchemaShape(String),

    /// An `enum` with no values.
    #[error("enums must have at least one value")]
    EmptyEnum,

    /// A `oneOf` with no options.
    #[error("unions must have at least one option")]
    EmptyUnion,

    /// A `const` whose value is neither a string nor a number.
    #[error("unsupported constant kind: {0}")]
    UnsupportedConstantKind(String),

    /// An event definition without one of its mandatory fields.
    #[error("missing required field `{0}`")]
    MissingRequiredField(&'static str),

    /// Literal rendering requested for a type that has no literal form.
    #[error("literal rendering is not implemented for {0}")]
    NotImplemented(&'static str),

    /// A named reference between plan entities that does not resolve.
    #[error("{kind}({name}) not found")]
    GraphLookup { kind: &'static str, name: String },

    /// Wraps an inner error with the plan construct it was raised for.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    /// Plan document is not valid YAML or does not match the plan layout.
    #[error("failed to parse tracking plan: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Wrap this error with a context segment such as `property `age``.
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping every [`Error::Context`] layer.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Attach context to the error side of a [`Result`].
pub(crate) trait ResultExt<T> {
    fn context_with<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context_with<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|err| err.context(f()))
    }
}

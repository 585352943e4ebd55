use thiserror::Error;

/// Errors surfaced by parsing and name resolution.
///
/// Both variants are recoverable: they describe a lookup that found nothing,
/// never a broken registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No registered enumeration kind has the requested simple name.
    #[error("could not find enumeration '{name}'")]
    NotFound {
        /// The lowercased name that was looked up.
        name: String,
    },

    /// A non-empty raw string matched none of the kind's declared keys.
    #[error("'{value}' is not a valid {kind}")]
    InvalidValue {
        /// The raw string as supplied by the caller.
        value: String,
        /// Simple name of the kind that was parsed into.
        kind: &'static str,
    },
}

/// A module's type listing could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("module '{module}' could not be introspected: {reason}")]
pub struct IntrospectionError {
    /// Name of the module whose types could not be listed.
    pub module: String,
    /// What went wrong, as reported by the catalog.
    pub reason: String,
}

impl IntrospectionError {
    pub fn new(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self { module: module.into(), reason: reason.into() }
    }
}

/// Returned by `try_parse` when parsing failed for any reason.
///
/// Carries no detail; use `parse` when the cause matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("value could not be parsed")]
pub struct ParseFailure;

pub type Result<T> = std::result::Result<T, Error>;

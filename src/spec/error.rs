use std::fmt;
use thiserror::Error;

/// Which declaration a raw mapping came from.
///
/// Carried by every [`SpecError`] so a failure can be traced back to the
/// class-level (base) declaration or to a single handler method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecKind {
    /// Declaration attached to a handler class
    Class,
    /// Declaration attached to a single handler method
    Method,
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecKind::Class => write!(f, "class-level route"),
            SpecKind::Method => write!(f, "method-level route"),
        }
    }
}

/// Validation failure for a single raw route declaration.
///
/// All variants are configuration mistakes in the declared metadata; none of
/// them is transient, so callers never retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// A raw mapping key has no corresponding field
    #[error("Unknown property \"{key}\" on {kind}")]
    UnknownProperty { key: String, kind: SpecKind },

    /// `path` is missing or empty
    #[error("Route path can not be empty ({kind})")]
    InvalidPath { kind: SpecKind },

    /// A declared parameter has no `<name>` placeholder in the path
    #[error("Parameter <{name}> is not present in the url mask \"{path}\" ({kind})")]
    UnboundParameter {
        name: String,
        path: String,
        kind: SpecKind,
    },

    /// A parameter descriptor uses a key outside the recognized set
    #[error(
        "Parameter <{parameter}> may only describe [requirement, type, description, default] - \"{key}\" given ({kind})"
    )]
    InvalidDescriptorKey {
        parameter: String,
        key: String,
        kind: SpecKind,
    },

    /// A parameter descriptor value is an array or object
    #[error("Parameter <{parameter}> descriptor \"{key}\" must be a scalar or null ({kind})")]
    NonScalarDescriptorValue {
        parameter: String,
        key: String,
        kind: SpecKind,
    },

    /// A known property carries a value of the wrong shape
    #[error("Property \"{key}\" on {kind} expects {expected}")]
    InvalidValue {
        key: String,
        expected: &'static str,
        kind: SpecKind,
    },
}

impl SpecError {
    /// Stable snake_case identifier for the error kind, used by the linter.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            SpecError::UnknownProperty { .. } => "unknown_property",
            SpecError::InvalidPath { .. } => "invalid_path",
            SpecError::UnboundParameter { .. } => "unbound_parameter",
            SpecError::InvalidDescriptorKey { .. } => "invalid_descriptor_key",
            SpecError::NonScalarDescriptorValue { .. } => "non_scalar_descriptor_value",
            SpecError::InvalidValue { .. } => "invalid_value",
        }
    }

    /// The declaration kind the error was raised for.
    #[must_use]
    pub fn spec_kind(&self) -> SpecKind {
        match self {
            SpecError::UnknownProperty { kind, .. }
            | SpecError::InvalidPath { kind }
            | SpecError::UnboundParameter { kind, .. }
            | SpecError::InvalidDescriptorKey { kind, .. }
            | SpecError::NonScalarDescriptorValue { kind, .. }
            | SpecError::InvalidValue { kind, .. } => *kind,
        }
    }
}

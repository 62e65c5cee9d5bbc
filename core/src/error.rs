//! Error types for schema construction, value coercion and parsing.
//!
//! Construction mistakes ([`SchemaError`]) are programmer errors raised while
//! a [`Schema`](crate::Schema) is being built. Everything the user can get
//! wrong on the command line surfaces as a [`ParseError`].

use thiserror::Error;

use crate::ValueKind;

/// A value token could not be converted to the cell's declared kind.
///
/// # Examples
///
/// ```
/// use argschema_core::{Value, ValueKind};
///
/// let err = Value::parse(ValueKind::Int64, "50f").unwrap_err();
/// assert_eq!(err.kind, ValueKind::Int64);
/// assert_eq!(err.text, "50f");
/// assert_eq!(err.to_string(), "cannot convert '50f' to int64");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{text}' to {kind}")]
pub struct CoercionError {
    /// Kind the text was supposed to become.
    pub kind: ValueKind,
    /// The offending text, verbatim.
    pub text: String,
}

/// Construction-time schema errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A flag was declared without any alias.
    #[error("flag must define at least one alias")]
    EmptyAliases,
    /// Alias is empty, starts with a dash, or contains whitespace or `=`.
    #[error("invalid flag alias: '{0}'")]
    InvalidAlias(String),
    /// Alias already belongs to another flag.
    #[error("duplicate flag alias: '{0}'")]
    DuplicateAlias(String),
    /// Positional name is empty or contains whitespace.
    #[error("invalid positional name: '{0}'")]
    InvalidPositionalName(String),
    /// Two positionals share a name.
    #[error("duplicate positional: '{0}'")]
    DuplicatePositional(String),
    /// Positional violates the required-before-optional / repeating-last policy.
    #[error("positional '{name}' cannot be added: {reason}")]
    InvalidPositionalOrdering { name: String, reason: String },
    /// Declared default does not match the declared kind.
    #[error("default for '{name}' is {found}, expected {expected}")]
    DefaultKindMismatch {
        name: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

/// Errors produced while consuming a token list.
///
/// The first error aborts the parse. Slots processed before it keep whatever
/// they were assigned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Token looks like a flag but matches no registered alias.
    #[error("unknown flag: '{token}'")]
    UnknownFlag { token: String },
    /// A valued flag was the last token.
    #[error("flag '{flag}' requires a value")]
    MissingFlagValue { flag: String },
    /// A value token failed to convert. Never suppressed.
    #[error("invalid value for '{argument}': {source}")]
    Coercion {
        argument: String,
        #[source]
        source: CoercionError,
    },
    /// Required flag never appeared.
    #[error("required flag '{flag}' is missing")]
    MissingRequiredFlag { flag: String },
    /// Required positional received no token.
    #[error("required positional '{name}' is missing")]
    MissingRequiredPositional { name: String },
    /// Required repeating positional received zero tokens.
    #[error("required at least one positional '{name}'")]
    MissingRepeatingPositional { name: String },
}

impl ParseError {
    /// Whether this error reports missing input rather than malformed input.
    ///
    /// These are exactly the errors an incomplete parse suppresses.
    ///
    /// # Examples
    ///
    /// ```
    /// use argschema_core::ParseError;
    ///
    /// let missing = ParseError::MissingRequiredFlag { flag: "-e".into() };
    /// assert!(missing.is_incomplete());
    ///
    /// let unknown = ParseError::UnknownFlag { token: "-x".into() };
    /// assert!(!unknown.is_incomplete());
    /// ```
    pub fn is_incomplete(&self) -> bool {
        matches!(
            self,
            Self::MissingRequiredFlag { .. }
                | Self::MissingRequiredPositional { .. }
                | Self::MissingRepeatingPositional { .. }
        )
    }
}

/// Convenience alias for results with [`ParseError`].
pub type Result<T> = std::result::Result<T, ParseError>;

//! Typed value cells.
//!
//! Every flag and positional slot owns exactly one [`ValueCell`]. A cell knows
//! its primitive [`ValueKind`], whether it holds one value or a sequence
//! ([`Cardinality`]), its declared default, and whether any token ever
//! reached it. One generic cell covers all eight primitive kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoercionError;

/// Primitive kind a cell converts its tokens into.
///
/// # Examples
///
/// ```
/// use argschema_core::ValueKind;
///
/// assert_eq!(ValueKind::Uint64.to_string(), "uint64");
/// assert_eq!(ValueKind::default(), ValueKind::String);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// UTF-8 text, taken verbatim (the default).
    #[default]
    String,
    /// `true` or `false`, case-sensitive.
    Bool,
    Int32,
    Uint32,
    Int64,
    Uint64,
    /// IEEE-754 single precision.
    Float32,
    /// IEEE-754 double precision.
    Float64,
}

impl ValueKind {
    /// Lowercase name used in messages and usage annotations.
    pub fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Bool => "bool",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether a cell holds a single value or an ordered sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    /// One value; later assignments overwrite earlier ones.
    #[default]
    Scalar,
    /// Every assignment appends.
    Repeated,
}

/// A single typed value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Bool(bool),
    Int32(i32),
    Uint32(u32),
    Int64(i64),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
}

impl Value {
    /// Converts `text` into a value of `kind`.
    ///
    /// Integers are decimal with an optional sign, floats use the usual
    /// decimal/exponent syntax, booleans are exactly `true` or `false`.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] naming `kind` and the untouched `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use argschema_core::{Value, ValueKind};
    ///
    /// assert_eq!(Value::parse(ValueKind::Int32, "-12").unwrap(), Value::Int32(-12));
    /// assert_eq!(Value::parse(ValueKind::Bool, "true").unwrap(), Value::Bool(true));
    /// assert!(Value::parse(ValueKind::Bool, "True").is_err());
    /// assert!(Value::parse(ValueKind::Uint32, "-1").is_err());
    /// ```
    pub fn parse(kind: ValueKind, text: &str) -> Result<Self, CoercionError> {
        let parsed = match kind {
            ValueKind::String => Some(Self::String(text.to_string())),
            ValueKind::Bool => text.parse().ok().map(Self::Bool),
            ValueKind::Int32 => text.parse().ok().map(Self::Int32),
            ValueKind::Uint32 => text.parse().ok().map(Self::Uint32),
            ValueKind::Int64 => text.parse().ok().map(Self::Int64),
            ValueKind::Uint64 => text.parse().ok().map(Self::Uint64),
            ValueKind::Float32 => text.parse().ok().map(Self::Float32),
            ValueKind::Float64 => text.parse().ok().map(Self::Float64),
        };
        parsed.ok_or_else(|| CoercionError {
            kind,
            text: text.to_string(),
        })
    }

    /// Zero value of `kind`: empty string, `false`, or numeric zero.
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::String => Self::String(String::new()),
            ValueKind::Bool => Self::Bool(false),
            ValueKind::Int32 => Self::Int32(0),
            ValueKind::Uint32 => Self::Uint32(0),
            ValueKind::Int64 => Self::Int64(0),
            ValueKind::Uint64 => Self::Uint64(0),
            ValueKind::Float32 => Self::Float32(0.0),
            ValueKind::Float64 => Self::Float64(0.0),
        }
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int32(_) => ValueKind::Int32,
            Self::Uint32(_) => ValueKind::Uint32,
            Self::Int64(_) => ValueKind::Int64,
            Self::Uint64(_) => ValueKind::Uint64,
            Self::Float32(_) => ValueKind::Float32,
            Self::Float64(_) => ValueKind::Float64,
        }
    }

    /// Literal form used in usage annotations; strings are double-quoted.
    ///
    /// ```
    /// use argschema_core::Value;
    ///
    /// assert_eq!(Value::from("a b").literal(), "\"a b\"");
    /// assert_eq!(Value::from(10u32).literal(), "10");
    /// ```
    pub fn literal(&self) -> String {
        match self {
            Self::String(s) => format!("\"{s}\""),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) => f.write_str(v),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Uint32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Uint64(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

mod private {
    pub trait Sealed {}
}

/// Rust types a cell value can be read back as.
///
/// Implemented for `String`, `bool`, `i32`, `u32`, `i64`, `u64`, `f32` and
/// `f64`; sealed so the set of kinds stays closed.
pub trait Primitive: private::Sealed + Sized {
    /// Kind this type corresponds to.
    const KIND: ValueKind;

    /// Extracts `Self` when `value` has the matching kind.
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! primitive {
    ($ty:ty, $variant:ident) => {
        impl private::Sealed for $ty {}

        impl Primitive for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }

        impl From<$ty> for Value {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        }
    };
}

primitive!(String, String);
primitive!(bool, Bool);
primitive!(i32, Int32);
primitive!(u32, Uint32);
primitive!(i64, Int64);
primitive!(u64, Uint64);
primitive!(f32, Float32);
primitive!(f64, Float64);

/// Current or default contents of a cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Scalar(Value),
    Repeated(Vec<Value>),
}

/// A self-describing slot holding a scalar or a sequence of one kind.
///
/// Until the first successful [`set`](ValueCell::set) the cell reports its
/// default and `is_set()` is `false`. A failed `set` leaves the cell as it
/// was.
///
/// # Examples
///
/// ```
/// use argschema_core::{ValueCell, ValueKind};
///
/// let mut port = ValueCell::with_default(8080u32);
/// assert!(!port.is_set());
/// assert_eq!(port.value::<u32>(), Some(8080));
///
/// port.set("9000").unwrap();
/// assert!(port.is_set());
/// assert_eq!(port.value::<u32>(), Some(9000));
///
/// let mut ids = ValueCell::repeated(ValueKind::Int32);
/// ids.set("1").unwrap();
/// ids.set("2").unwrap();
/// assert_eq!(ids.values::<i32>(), vec![1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCell {
    kind: ValueKind,
    default: CellValue,
    current: CellValue,
    present: bool,
}

impl ValueCell {
    /// Scalar cell defaulting to the zero value of `kind`.
    pub fn scalar(kind: ValueKind) -> Self {
        Self::with_default(Value::zero(kind))
    }

    /// Scalar cell whose kind is taken from `default`.
    pub fn with_default(default: impl Into<Value>) -> Self {
        let default = default.into();
        Self {
            kind: default.kind(),
            current: CellValue::Scalar(default.clone()),
            default: CellValue::Scalar(default),
            present: false,
        }
    }

    /// Repeated cell, empty until the first assignment.
    pub fn repeated(kind: ValueKind) -> Self {
        Self {
            kind,
            default: CellValue::Repeated(Vec::new()),
            current: CellValue::Repeated(Vec::new()),
            present: false,
        }
    }

    /// Converts `text` and stores it: replaces a scalar, appends to a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError`] and leaves the cell untouched when `text`
    /// does not convert to the cell's kind.
    pub fn set(&mut self, text: &str) -> Result<(), CoercionError> {
        let value = Value::parse(self.kind, text)?;
        self.assign(value);
        Ok(())
    }

    /// Stores an already typed value of the cell's kind.
    pub(crate) fn assign(&mut self, value: Value) {
        debug_assert_eq!(value.kind(), self.kind);
        match &mut self.current {
            CellValue::Scalar(current) => *current = value,
            CellValue::Repeated(values) => values.push(value),
        }
        self.present = true;
    }

    /// Current contents, the default when never set.
    pub fn get(&self) -> &CellValue {
        &self.current
    }

    /// Whether any assignment reached this cell.
    pub fn is_set(&self) -> bool {
        self.present
    }

    pub fn default_value(&self) -> &CellValue {
        &self.default
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn cardinality(&self) -> Cardinality {
        match self.current {
            CellValue::Scalar(_) => Cardinality::Scalar,
            CellValue::Repeated(_) => Cardinality::Repeated,
        }
    }

    /// Typed scalar read. `None` for sequences or a mismatched `T`.
    pub fn value<T: Primitive>(&self) -> Option<T> {
        match &self.current {
            CellValue::Scalar(value) => T::from_value(value),
            CellValue::Repeated(_) => None,
        }
    }

    /// Typed sequence read; a scalar cell yields its single value.
    ///
    /// Returns an empty vector when `T` does not match the cell's kind.
    pub fn values<T: Primitive>(&self) -> Vec<T> {
        match &self.current {
            CellValue::Scalar(value) => T::from_value(value).into_iter().collect(),
            CellValue::Repeated(values) => values.iter().filter_map(T::from_value).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_defaults_for_every_kind() {
        let kinds = [
            ValueKind::String,
            ValueKind::Bool,
            ValueKind::Int32,
            ValueKind::Uint32,
            ValueKind::Int64,
            ValueKind::Uint64,
            ValueKind::Float32,
            ValueKind::Float64,
        ];
        for kind in kinds {
            let cell = ValueCell::scalar(kind);
            assert!(!cell.is_set());
            assert_eq!(cell.get(), &CellValue::Scalar(Value::zero(kind)));
            assert_eq!(cell.get(), cell.default_value());
            assert_eq!(cell.kind(), kind);
        }
    }

    #[test]
    fn test_numeric_conventions() {
        assert_eq!(Value::parse(ValueKind::Int32, "+7"), Ok(Value::Int32(7)));
        assert_eq!(
            Value::parse(ValueKind::Int64, "-9000000000"),
            Ok(Value::Int64(-9_000_000_000))
        );
        assert_eq!(
            Value::parse(ValueKind::Uint64, "18446744073709551615"),
            Ok(Value::Uint64(u64::MAX))
        );
        assert_eq!(Value::parse(ValueKind::Float64, "1e3"), Ok(Value::Float64(1000.0)));
        assert_eq!(Value::parse(ValueKind::Float32, "0.5"), Ok(Value::Float32(0.5)));

        assert!(Value::parse(ValueKind::Int32, "2147483648").is_err());
        assert!(Value::parse(ValueKind::Uint32, "-1").is_err());
        assert!(Value::parse(ValueKind::Int32, "0x10").is_err());
        assert!(Value::parse(ValueKind::Float32, "0.5d").is_err());
        assert!(Value::parse(ValueKind::Bool, "FALSE").is_err());
        assert!(Value::parse(ValueKind::Bool, "1").is_err());
    }

    #[test]
    fn test_failed_set_leaves_cell_untouched() {
        let mut cell = ValueCell::with_default(3i64);
        let err = cell.set("50f").unwrap_err();

        assert_eq!(err.kind, ValueKind::Int64);
        assert_eq!(err.text, "50f");
        assert!(!cell.is_set());
        assert_eq!(cell.value::<i64>(), Some(3));

        let mut list = ValueCell::repeated(ValueKind::Float64);
        list.set("1.5").unwrap();
        assert!(list.set("x").is_err());
        assert_eq!(list.values::<f64>(), vec![1.5]);
    }

    #[test]
    fn test_scalar_last_assignment_wins() {
        let mut cell = ValueCell::scalar(ValueKind::String);
        cell.set("first").unwrap();
        cell.set("second").unwrap();

        assert_eq!(cell.value::<String>().as_deref(), Some("second"));
        assert_eq!(cell.cardinality(), Cardinality::Scalar);
    }

    #[test]
    fn test_typed_read_with_wrong_type() {
        let cell = ValueCell::with_default(true);
        assert_eq!(cell.value::<bool>(), Some(true));
        assert_eq!(cell.value::<i32>(), None);
        assert!(cell.values::<String>().is_empty());
    }

    #[test]
    fn test_repeated_cell_has_no_scalar_read() {
        let mut cell = ValueCell::repeated(ValueKind::Bool);
        assert_eq!(cell.get(), &CellValue::Repeated(Vec::new()));
        cell.set("false").unwrap();
        cell.set("true").unwrap();

        assert_eq!(cell.value::<bool>(), None);
        assert_eq!(cell.values::<bool>(), vec![false, true]);
        assert_eq!(cell.cardinality(), Cardinality::Repeated);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_string(&CellValue::Repeated(vec![
            Value::Int32(1),
            Value::from("a"),
        ]))
        .unwrap();
        assert_eq!(json, r#"[1,"a"]"#);
        assert_eq!(serde_json::to_string(&ValueKind::Float32).unwrap(), r#""float32""#);
    }
}

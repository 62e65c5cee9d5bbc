//! Declarative command-line argument schemas.
//!
//! This crate turns a programmatic description of a command's arguments into
//! a parser and a help text:
//!
//! - [`ValueCell`]: one typed slot (scalar or repeated) of a primitive
//!   [`ValueKind`], with a default and a presence flag.
//! - [`Schema`]: ordered flags (each with one or more aliases sharing a
//!   cell) and ordered positionals, at most one of them repeating.
//! - [`Parser`]: a single left-to-right pass over the tokens that fills the
//!   cells, then checks required slots unless the parse is incomplete.
//! - [`render_usage`]: a deterministic, width-wrapped usage text derived
//!   from the same schema.
//!
//! Construction problems are reported as [`SchemaError`], user input problems
//! as [`ParseError`]. Nothing here prints or exits; that is up to the caller.
//!
//! # Example
//!
//! ```
//! use argschema_core::*;
//!
//! let mut schema = Schema::new("schema", "Test schema")
//!     .with_flag(FlagSpec::presence(&["h", "help"]).with_description("Print help and exit"))
//!     .unwrap()
//!     .with_flag(FlagSpec::scalar(&["e"], ValueKind::String).required())
//!     .unwrap()
//!     .with_flag(FlagSpec::repeated(&["f"], ValueKind::Int32))
//!     .unwrap()
//!     .with_positional(PositionalSpec::required("PARAMG", ValueKind::Uint64))
//!     .unwrap()
//!     .with_positional(PositionalSpec::required("PARAMH", ValueKind::String).repeating())
//!     .unwrap();
//!
//! schema
//!     .parse(&["-e", "valueE", "-f", "1", "-f", "2", "50", "pos1", "pos2"], false)
//!     .unwrap();
//!
//! assert_eq!(schema.value::<String>("e").as_deref(), Some("valueE"));
//! assert_eq!(schema.values::<i32>("f"), vec![1, 2]);
//! assert_eq!(schema.value::<u64>("PARAMG"), Some(50));
//! assert_eq!(schema.values::<String>("PARAMH"), vec!["pos1", "pos2"]);
//! assert!(!schema.is_set("help"));
//! assert!(schema.usage().starts_with("usage: schema "));
//! ```

mod error;
mod parser;
mod schema;
mod usage;
mod validate;
mod value;

pub use error::{CoercionError, ParseError, Result, SchemaError};
pub use parser::{ParseOptions, Parser, ParserState, parse};
pub use schema::{CellSnapshot, FlagSlot, FlagSpec, PositionalSlot, PositionalSpec, Schema, dashed};
pub use usage::{DEFAULT_LINE_WIDTH, DESCRIPTION_COLUMN, UsageOptions, render_usage, render_with};
pub use value::{Cardinality, CellValue, Primitive, Value, ValueCell, ValueKind};

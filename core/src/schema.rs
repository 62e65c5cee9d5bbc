//! Schema construction and typed access to parsed values.
//!
//! A [`Schema`] is an ordered list of flag slots plus an ordered list of
//! positional slots. Declarations go in through [`FlagSpec`] and
//! [`PositionalSpec`]; parsing mutates only the [`ValueCell`]s inside the
//! slots, never the shape.
//!
//! A schema is meant to be built, parsed once, and read. Parsing the same
//! instance twice accumulates into repeated cells; build a fresh schema per
//! parse instead.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::trace;

use crate::error::{Result, SchemaError};
use crate::parser::{ParseOptions, Parser};
use crate::usage::{UsageOptions, render_with};
use crate::validate::{validate_aliases, validate_default, validate_positional};
use crate::{Cardinality, CellValue, Primitive, Value, ValueCell, ValueKind};

/// Declaration of a flag, consumed by [`Schema::add_flag`].
///
/// # Examples
///
/// ```
/// use argschema_core::{FlagSpec, ValueKind};
///
/// let size = FlagSpec::scalar(&["s", "size"], ValueKind::Uint64)
///     .with_default(0u64)
///     .with_description("Size of the file");
/// assert!(!size.required);
///
/// let help = FlagSpec::presence(&["h", "help"]);
/// assert!(help.presence);
/// assert_eq!(help.kind, ValueKind::Bool);
/// ```
#[derive(Debug, Clone)]
pub struct FlagSpec {
    /// Bare aliases, e.g. `["h", "help"]`.
    pub aliases: Vec<String>,
    pub kind: ValueKind,
    pub cardinality: Cardinality,
    /// Scalar default; zero value of `kind` when absent. Ignored for
    /// repeated flags, which always start empty.
    pub default: Option<Value>,
    pub description: String,
    pub required: bool,
    /// Boolean flag that takes no value token and becomes `true` on sight.
    pub presence: bool,
    /// Placeholder shown in usage; defaults to the longest alias.
    pub value_name: Option<String>,
}

impl FlagSpec {
    /// Flag taking one value token, last occurrence wins.
    pub fn scalar(aliases: &[&str], kind: ValueKind) -> Self {
        Self {
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            kind,
            cardinality: Cardinality::Scalar,
            default: None,
            description: String::new(),
            required: false,
            presence: false,
            value_name: None,
        }
    }

    /// Flag taking one value token per occurrence, every occurrence appends.
    pub fn repeated(aliases: &[&str], kind: ValueKind) -> Self {
        Self {
            cardinality: Cardinality::Repeated,
            ..Self::scalar(aliases, kind)
        }
    }

    /// Presence-only boolean flag (`-h`, `--verbose`).
    pub fn presence(aliases: &[&str]) -> Self {
        Self {
            presence: true,
            ..Self::scalar(aliases, ValueKind::Bool)
        }
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_value_name(mut self, value_name: &str) -> Self {
        self.value_name = Some(value_name.to_string());
        self
    }

    /// Marks the flag as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks a presence flag as repeatable; each occurrence appends `true`.
    pub fn allow_multiple(mut self) -> Self {
        self.cardinality = Cardinality::Repeated;
        self
    }
}

/// Declaration of a positional argument, consumed by [`Schema::add_positional`].
///
/// # Examples
///
/// ```
/// use argschema_core::{PositionalSpec, ValueKind};
///
/// let src = PositionalSpec::required("SRC", ValueKind::String);
/// assert!(src.required);
///
/// let rest = PositionalSpec::optional("FILES", ValueKind::String).repeating();
/// assert!(rest.repeating);
/// assert!(!rest.required);
/// ```
#[derive(Debug, Clone)]
pub struct PositionalSpec {
    pub name: String,
    pub kind: ValueKind,
    pub required: bool,
    /// Absorbs every positional token past the fixed ones. Must be last.
    pub repeating: bool,
    pub default: Option<Value>,
    pub description: String,
}

impl PositionalSpec {
    pub fn required(name: &str, kind: ValueKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            required: true,
            repeating: false,
            default: None,
            description: String::new(),
        }
    }

    pub fn optional(name: &str, kind: ValueKind) -> Self {
        Self {
            required: false,
            ..Self::required(name, kind)
        }
    }

    pub fn repeating(mut self) -> Self {
        self.repeating = true;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

/// Renders a bare alias with its dash marker: `h` → `-h`, `help` → `--help`.
pub fn dashed(alias: &str) -> String {
    if alias.chars().count() == 1 {
        format!("-{alias}")
    } else {
        format!("--{alias}")
    }
}

/// Strips one `--` or `-` marker, if any.
pub(crate) fn strip_marker(token: &str) -> &str {
    token
        .strip_prefix("--")
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token)
}

/// A registered flag: all aliases share the one cell.
#[derive(Debug, Clone)]
pub struct FlagSlot {
    pub(crate) aliases: Vec<String>,
    pub(crate) cell: ValueCell,
    pub(crate) description: String,
    pub(crate) required: bool,
    pub(crate) presence: bool,
    pub(crate) value_name: String,
}

impl FlagSlot {
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn cell(&self) -> &ValueCell {
        &self.cell
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_presence(&self) -> bool {
        self.presence
    }

    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// Dashed name used in errors and snapshots (longest alias preferred).
    ///
    /// ```
    /// use argschema_core::{FlagSpec, Schema};
    ///
    /// let mut schema = Schema::new("program", "");
    /// schema.add_flag(FlagSpec::presence(&["h", "help"])).unwrap();
    /// assert_eq!(schema.lookup("h").unwrap().canonical_name(), "--help");
    /// ```
    pub fn canonical_name(&self) -> String {
        dashed(longest_alias(&self.aliases))
    }

    /// Whether `alias` (with or without dash marker) names this flag.
    pub fn matches(&self, alias: &str) -> bool {
        let bare = strip_marker(alias);
        self.aliases.iter().any(|a| a == bare)
    }
}

fn longest_alias(aliases: &[String]) -> &str {
    aliases
        .iter()
        .fold(None::<&String>, |best, alias| match best {
            Some(b) if b.chars().count() >= alias.chars().count() => Some(b),
            _ => Some(alias),
        })
        .map(String::as_str)
        .unwrap_or_default()
}

/// A registered positional argument.
#[derive(Debug, Clone)]
pub struct PositionalSlot {
    pub(crate) name: String,
    pub(crate) cell: ValueCell,
    pub(crate) required: bool,
    pub(crate) repeating: bool,
    pub(crate) description: String,
}

impl PositionalSlot {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self) -> &ValueCell {
        &self.cell
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_repeating(&self) -> bool {
        self.repeating
    }
}

/// Serializable view of one slot after parsing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub present: bool,
    pub value: CellValue,
}

/// Ordered flag and positional slots for one command level.
///
/// # Examples
///
/// ```
/// use argschema_core::*;
///
/// let mut schema = Schema::new("program create", "Create a file");
/// schema.add_flag(FlagSpec::presence(&["h", "help"])).unwrap();
/// schema
///     .add_flag(FlagSpec::scalar(&["s", "size"], ValueKind::Uint64).with_default(0u64))
///     .unwrap();
/// schema
///     .add_positional(PositionalSpec::required("PATH", ValueKind::String))
///     .unwrap();
///
/// schema.parse(&["-s", "2048", "/tmp/tmp.file"], false).unwrap();
/// assert_eq!(schema.value::<u64>("size"), Some(2048));
/// assert_eq!(schema.value::<String>("PATH").as_deref(), Some("/tmp/tmp.file"));
/// assert!(!schema.is_set("help"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Schema {
    program: String,
    description: String,
    pub(crate) flags: Vec<FlagSlot>,
    pub(crate) positionals: Vec<PositionalSlot>,
    aliases: HashMap<String, usize>,
}

impl Schema {
    pub fn new(program: &str, description: &str) -> Self {
        Self {
            program: program.to_string(),
            description: description.to_string(),
            ..Default::default()
        }
    }

    /// Registers a flag.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for malformed aliases, an alias already owned
    /// by another flag, or a default of the wrong kind.
    pub fn add_flag(&mut self, spec: FlagSpec) -> std::result::Result<(), SchemaError> {
        let aliases = validate_aliases(&spec)?;
        if let Some(taken) = aliases.iter().find(|a| self.aliases.contains_key(*a)) {
            return Err(SchemaError::DuplicateAlias(taken.clone()));
        }

        let name = dashed(longest_alias(&aliases));
        validate_default(&name, spec.kind, spec.default.as_ref())?;

        let cell = match (spec.cardinality, spec.default) {
            (Cardinality::Repeated, _) => ValueCell::repeated(spec.kind),
            (Cardinality::Scalar, Some(default)) => ValueCell::with_default(default),
            (Cardinality::Scalar, None) => ValueCell::scalar(spec.kind),
        };
        let value_name = spec
            .value_name
            .unwrap_or_else(|| longest_alias(&aliases).to_string());

        let index = self.flags.len();
        trace!(flag = %name, index, "registering flag");
        for alias in &aliases {
            self.aliases.insert(alias.clone(), index);
        }
        self.flags.push(FlagSlot {
            aliases,
            cell,
            description: spec.description,
            required: spec.required,
            presence: spec.presence,
            value_name,
        });

        Ok(())
    }

    /// Appends a positional.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPositionalOrdering`] when the new slot
    /// would follow the repeating positional, or is required and would follow
    /// an optional one. Also rejects duplicate names and mismatched defaults.
    pub fn add_positional(&mut self, spec: PositionalSpec) -> std::result::Result<(), SchemaError> {
        validate_positional(&self.positionals, &spec)?;
        validate_default(&spec.name, spec.kind, spec.default.as_ref())?;

        let cell = match (spec.repeating, spec.default) {
            (true, _) => ValueCell::repeated(spec.kind),
            (false, Some(default)) => ValueCell::with_default(default),
            (false, None) => ValueCell::scalar(spec.kind),
        };

        trace!(positional = %spec.name, repeating = spec.repeating, "registering positional");
        self.positionals.push(PositionalSlot {
            name: spec.name,
            cell,
            required: spec.required,
            repeating: spec.repeating,
            description: spec.description,
        });

        Ok(())
    }

    /// Chaining form of [`add_flag`](Schema::add_flag).
    pub fn with_flag(mut self, spec: FlagSpec) -> std::result::Result<Self, SchemaError> {
        self.add_flag(spec)?;
        Ok(self)
    }

    /// Chaining form of [`add_positional`](Schema::add_positional).
    pub fn with_positional(mut self, spec: PositionalSpec) -> std::result::Result<Self, SchemaError> {
        self.add_positional(spec)?;
        Ok(self)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn flags(&self) -> &[FlagSlot] {
        &self.flags
    }

    pub fn positionals(&self) -> &[PositionalSlot] {
        &self.positionals
    }

    /// Finds a flag by alias, written with or without its dash marker.
    pub fn lookup(&self, alias: &str) -> Option<&FlagSlot> {
        self.lookup_index(alias).map(|index| &self.flags[index])
    }

    pub(crate) fn lookup_index(&self, alias: &str) -> Option<usize> {
        self.aliases.get(strip_marker(alias)).copied()
    }

    pub fn positional(&self, name: &str) -> Option<&PositionalSlot> {
        self.positionals.iter().find(|slot| slot.name == name)
    }

    /// Resolves `name` as a flag alias first, then as a positional name.
    pub fn cell(&self, name: &str) -> Option<&ValueCell> {
        self.lookup(name)
            .map(FlagSlot::cell)
            .or_else(|| self.positional(name).map(PositionalSlot::cell))
    }

    /// Typed scalar value of a flag or positional.
    pub fn value<T: Primitive>(&self, name: &str) -> Option<T> {
        self.cell(name).and_then(|cell| cell.value())
    }

    /// Typed values of a flag or positional; empty when `name` is unknown.
    pub fn values<T: Primitive>(&self, name: &str) -> Vec<T> {
        self.cell(name).map(|cell| cell.values()).unwrap_or_default()
    }

    /// Whether any token reached the named flag or positional.
    pub fn is_set(&self, name: &str) -> bool {
        self.cell(name).is_some_and(ValueCell::is_set)
    }

    /// Parses `tokens` (program name excluded) into this schema's cells.
    ///
    /// With `allow_incomplete`, missing required flags and positionals are
    /// not reported; conversion failures and unknown flags still are.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`](crate::ParseError) encountered.
    pub fn parse<S: AsRef<str>>(&mut self, tokens: &[S], allow_incomplete: bool) -> Result<()> {
        self.parse_with(tokens, &ParseOptions { allow_incomplete })
    }

    pub fn parse_with<S: AsRef<str>>(&mut self, tokens: &[S], options: &ParseOptions) -> Result<()> {
        Parser::new(self, *options).run(tokens)
    }

    /// Parses a full argument vector, skipping `argv[0]`.
    pub fn parse_args<S: AsRef<str>>(&mut self, argv: &[S], allow_incomplete: bool) -> Result<()> {
        let tokens = argv.get(1..).unwrap_or_default();
        self.parse(tokens, allow_incomplete)
    }

    /// Usage text at the default 80 columns.
    pub fn usage(&self) -> String {
        self.usage_with(&UsageOptions::default())
    }

    pub fn usage_with(&self, options: &UsageOptions) -> String {
        render_with(self, &self.program, &self.description, options)
    }

    /// Current value and presence of every slot, keyed by canonical flag
    /// name (`--size`) or positional name.
    pub fn snapshot(&self) -> BTreeMap<String, CellSnapshot> {
        let flags = self
            .flags
            .iter()
            .map(|flag| (flag.canonical_name(), &flag.cell));
        let positionals = self
            .positionals
            .iter()
            .map(|slot| (slot.name.clone(), &slot.cell));

        flags
            .chain(positionals)
            .map(|(name, cell)| {
                (
                    name,
                    CellSnapshot {
                        present: cell.is_set(),
                        value: cell.get().clone(),
                    },
                )
            })
            .collect()
    }
}

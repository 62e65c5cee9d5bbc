//! Construction-time checks for flag and positional declarations.
//!
//! These run inside [`Schema::add_flag`](crate::Schema::add_flag) and
//! [`Schema::add_positional`](crate::Schema::add_positional), so a schema
//! that was built without error is always structurally sound.

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::{FlagSpec, PositionalSlot, PositionalSpec};

/// Validates alias syntax and returns the aliases with duplicates removed.
///
/// Aliases are stored bare (`"h"`, `"help"`); the dash marker is only part
/// of the command-line spelling.
pub(crate) fn validate_aliases(spec: &FlagSpec) -> Result<Vec<String>, SchemaError> {
    if spec.aliases.is_empty() {
        return Err(SchemaError::EmptyAliases);
    }

    let mut seen = HashSet::new();
    let mut aliases = Vec::with_capacity(spec.aliases.len());
    for alias in &spec.aliases {
        if alias.is_empty()
            || alias.starts_with('-')
            || alias.contains('=')
            || alias.chars().any(char::is_whitespace)
        {
            return Err(SchemaError::InvalidAlias(alias.clone()));
        }
        if seen.insert(alias.as_str()) {
            aliases.push(alias.clone());
        }
    }

    Ok(aliases)
}

/// Checks the declared default against the declared kind.
pub(crate) fn validate_default(
    name: &str,
    spec_kind: crate::ValueKind,
    default: Option<&crate::Value>,
) -> Result<(), SchemaError> {
    match default {
        Some(value) if value.kind() != spec_kind => Err(SchemaError::DefaultKindMismatch {
            name: name.to_string(),
            expected: spec_kind,
            found: value.kind(),
        }),
        _ => Ok(()),
    }
}

/// Enforces positional naming and ordering policy.
///
/// Required positionals precede optional ones, and at most one repeating
/// positional exists, always in last place.
pub(crate) fn validate_positional(
    existing: &[PositionalSlot],
    spec: &PositionalSpec,
) -> Result<(), SchemaError> {
    let name = spec.name.as_str();
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(SchemaError::InvalidPositionalName(name.to_string()));
    }

    if existing.iter().any(|slot| slot.name() == name) {
        return Err(SchemaError::DuplicatePositional(name.to_string()));
    }

    if let Some(repeating) = existing.iter().find(|slot| slot.is_repeating()) {
        return Err(SchemaError::InvalidPositionalOrdering {
            name: name.to_string(),
            reason: format!("repeating positional '{}' must be last", repeating.name()),
        });
    }

    if spec.required && !spec.repeating {
        if let Some(optional) = existing.iter().find(|slot| !slot.is_required()) {
            return Err(SchemaError::InvalidPositionalOrdering {
                name: name.to_string(),
                reason: format!(
                    "required positional follows optional positional '{}'",
                    optional.name()
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Value, ValueKind};

    #[test]
    fn test_validate_aliases_dedupes() {
        let spec = FlagSpec::presence(&["h", "help", "h"]);
        assert_eq!(
            validate_aliases(&spec).unwrap(),
            vec!["h".to_string(), "help".to_string()]
        );
    }

    #[test]
    fn test_validate_aliases_rejects_bad_syntax() {
        for bad in ["", "-h", "--help", "a=b", "two words"] {
            let spec = FlagSpec::presence(&[bad]);
            assert_eq!(
                validate_aliases(&spec),
                Err(SchemaError::InvalidAlias(bad.to_string()))
            );
        }

        let empty = FlagSpec::presence(&[]);
        assert_eq!(validate_aliases(&empty), Err(SchemaError::EmptyAliases));
    }

    #[test]
    fn test_validate_default_kind() {
        assert!(validate_default("n", ValueKind::Uint32, Some(&Value::Uint32(1))).is_ok());
        assert!(validate_default("n", ValueKind::Uint32, None).is_ok());
        assert_eq!(
            validate_default("n", ValueKind::Uint32, Some(&Value::Int32(1))),
            Err(SchemaError::DefaultKindMismatch {
                name: "n".to_string(),
                expected: ValueKind::Uint32,
                found: ValueKind::Int32,
            })
        );
    }
}

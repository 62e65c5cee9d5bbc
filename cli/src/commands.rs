//! Schemas for each command level of the demo program.

use argschema_core::{FlagSpec, PositionalSpec, Schema, SchemaError, ValueKind};

pub const PROGRAM: &str = "argschema-demo";

fn help_flag() -> FlagSpec {
    FlagSpec::presence(&["h", "help"]).with_description("Print help and exit")
}

/// Top level: global presence flags plus the command name.
pub fn root_schema() -> Result<Schema, SchemaError> {
    Schema::new(PROGRAM, "Useful multi command")
        .with_flag(help_flag())?
        .with_flag(
            FlagSpec::presence(&["v", "verbose"]).with_description("Log parser decisions to stderr"),
        )?
        .with_positional(
            PositionalSpec::required("COMMAND", ValueKind::String)
                .with_description("Command (create, copy)"),
        )
}

pub fn create_schema(program: &str) -> Result<Schema, SchemaError> {
    Schema::new(program, "Useful create")
        .with_flag(help_flag())?
        .with_flag(
            FlagSpec::scalar(&["s", "size"], ValueKind::Uint64)
                .with_default(0u64)
                .with_description("Size of the file"),
        )?
        .with_positional(
            PositionalSpec::required("PATH", ValueKind::String)
                .with_description("Path to file to create"),
        )
}

pub fn copy_schema(program: &str) -> Result<Schema, SchemaError> {
    Schema::new(program, "Useful copy")
        .with_flag(help_flag())?
        .with_flag(FlagSpec::presence(&["r", "recursive"]).with_description("Recursive copy"))?
        .with_positional(
            PositionalSpec::required("SRC", ValueKind::String)
                .with_description("Path to source path"),
        )?
        .with_positional(
            PositionalSpec::required("DST", ValueKind::String)
                .with_description("Path to destination path"),
        )
}

/// Splits tokens into the top-level part (everything up to and including the
/// command name) and the command's own tokens.
///
/// The top level only declares presence flags, so the first token without a
/// dash is the command name.
pub fn split_root(tokens: &[String]) -> (&[String], &[String]) {
    match tokens.iter().position(|token| !token.starts_with('-')) {
        Some(index) => tokens.split_at(index + 1),
        None => (tokens, &[]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_split_root_at_command() {
        let tokens = strings(&["-v", "copy", "-r", "a", "b"]);
        let (root, rest) = split_root(&tokens);
        assert_eq!(root, &tokens[..2]);
        assert_eq!(rest, &tokens[2..]);
    }

    #[test]
    fn test_split_root_without_command() {
        let tokens = strings(&["-h"]);
        let (root, rest) = split_root(&tokens);
        assert_eq!(root, &tokens[..]);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_schemas_build() {
        let root = root_schema().unwrap();
        assert_eq!(root.program(), PROGRAM);
        assert!(root.lookup("verbose").is_some());

        let create = create_schema("argschema-demo create").unwrap();
        assert_eq!(create.value::<u64>("size"), Some(0));

        let copy = copy_schema("argschema-demo copy").unwrap();
        assert_eq!(copy.positionals().len(), 2);
    }
}

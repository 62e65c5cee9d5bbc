mod commands;

use std::collections::BTreeMap;

use argschema_core::{CellSnapshot, ParseError, Schema, SchemaError};
use serde::Serialize;
use tracing::debug;

/// JSON document printed for a successful invocation.
#[derive(Debug, Serialize)]
struct Invocation<'a> {
    command: &'a str,
    arguments: BTreeMap<String, CellSnapshot>,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    match run(&args) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Outcome of parsing one command level.
enum Parsed {
    Help(String),
    Complete(Schema),
}

fn run(args: &[String]) -> Result<String, String> {
    let tokens = args.get(1..).unwrap_or_default();
    let (root_tokens, rest) = commands::split_root(tokens);

    let parsed = parse_level(commands::root_schema, root_tokens, |probe| {
        init_tracing(probe.is_set("verbose"));
    })?;
    let root = match parsed {
        Parsed::Help(usage) => return Ok(usage),
        Parsed::Complete(root) => root,
    };

    let command = root.value::<String>("COMMAND").unwrap_or_default();
    let program = format!("{} {command}", root.program());
    let build = match command.as_str() {
        "create" => commands::create_schema,
        "copy" => commands::copy_schema,
        other => return Err(format!("unknown command '{other}'\n\n{}", root.usage())),
    };

    debug!(command = %command, tokens = rest.len(), "dispatching");
    let schema = match parse_level(|| build(&program), rest, |_| {})? {
        Parsed::Help(usage) => return Ok(usage),
        Parsed::Complete(schema) => schema,
    };

    let invocation = Invocation {
        command: &command,
        arguments: schema.snapshot(),
    };
    serde_json::to_string_pretty(&invocation)
        .map(|json| json + "\n")
        .map_err(|err| format!("failed to serialize arguments: {err}"))
}

/// Parses one command level in two passes over fresh schemas.
///
/// The first pass allows incomplete input so `-h` works without the required
/// arguments; `on_probe` sees its result before the strict pass runs.
fn parse_level<B, P>(build: B, tokens: &[String], on_probe: P) -> Result<Parsed, String>
where
    B: Fn() -> Result<Schema, SchemaError>,
    P: FnOnce(&Schema),
{
    let mut probe = build().map_err(|err| err.to_string())?;
    probe
        .parse(tokens, true)
        .map_err(|err| with_usage(&err, &probe))?;
    on_probe(&probe);
    if probe.is_set("help") {
        return Ok(Parsed::Help(probe.usage()));
    }

    let mut schema = build().map_err(|err| err.to_string())?;
    schema
        .parse(tokens, false)
        .map_err(|err| with_usage(&err, &schema))?;
    Ok(Parsed::Complete(schema))
}

fn with_usage(err: &ParseError, schema: &Schema) -> String {
    format!("{err}\n\n{}", schema.usage())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "argschema_core=debug,argschema_demo=debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

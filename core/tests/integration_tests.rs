use argschema_core::{
    CellValue, FlagSpec, ParseError, ParseOptions, PositionalSpec, Schema, UsageOptions, Value,
    ValueKind, render_usage,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// The full-featured schema exercised by most tests below.
fn test_schema() -> Schema {
    let mut schema = Schema::new("schema", "Test schema");
    let flags = [
        FlagSpec::scalar(&["a", "a-long-param"], ValueKind::String)
            .with_default("// tricky default value")
            .with_value_name("paramA")
            .with_description(
                "String param option with default value. Note: this comment will be taken as description",
            ),
        FlagSpec::scalar(&["b-long-param"], ValueKind::Uint32)
            .with_default(10u32)
            .with_value_name("paramB")
            .with_description("Integer param with default value"),
        FlagSpec::scalar(&["c", "c-long-param"], ValueKind::Int32)
            .with_value_name("paramC")
            .with_description(
                "Integer param without default value. Avoid new lines they are rendered not \
                 correctly in help. Words will be transfered to new line anyway",
            ),
        FlagSpec::scalar(&["d-long-param"], ValueKind::Float32)
            .with_value_name("paramD")
            .with_description("Float param without default value"),
        FlagSpec::scalar(&["e"], ValueKind::String)
            .required()
            .with_value_name("paramE")
            .with_description("String param which should be anyway"),
        FlagSpec::repeated(&["f"], ValueKind::Int32)
            .with_value_name("paramF")
            .with_description("Integer param which may encounter multiple times"),
        FlagSpec::presence(&["i"])
            .with_default(true)
            .with_description("Boolean arg with default value"),
        FlagSpec::presence(&["j-long"]).with_description("Boolean arg without default value"),
        FlagSpec::presence(&["h", "help"]).with_description("Print help and exit"),
        FlagSpec::scalar(&["k"], ValueKind::Float32)
            .with_value_name("paramFloat")
            .with_description("Float param"),
        FlagSpec::scalar(&["l"], ValueKind::Float64)
            .with_value_name("paramDouble")
            .with_description("Double param"),
    ];
    for flag in flags {
        schema.add_flag(flag).unwrap();
    }

    let positionals = [
        PositionalSpec::required("PARAMG", ValueKind::Uint64)
            .with_description("Positional integer param"),
        PositionalSpec::required("P_A_R_A_M_G_2", ValueKind::Bool)
            .with_description("Positional boolean param"),
        PositionalSpec::required("PARAM_FLOAT", ValueKind::Float32)
            .with_description("Positional float param"),
        PositionalSpec::required("PARAM_DOUBLE", ValueKind::Float64)
            .with_description("Positional double param"),
        PositionalSpec::required("PARAMH", ValueKind::String)
            .repeating()
            .with_description("Positional repeating string params"),
    ];
    for positional in positionals {
        schema.add_positional(positional).unwrap();
    }

    schema
}

fn abc_schema() -> Schema {
    Schema::new("program", "")
        .with_positional(PositionalSpec::required("A", ValueKind::String))
        .unwrap()
        .with_positional(PositionalSpec::required("B", ValueKind::String))
        .unwrap()
        .with_positional(PositionalSpec::required("C", ValueKind::String).repeating())
        .unwrap()
}

// ---------------------------------------------------------------------------
// Defaults and presence
// ---------------------------------------------------------------------------

#[test]
fn test_defaults_preserved_for_untouched_slots() {
    let mut schema = test_schema();
    schema
        .parse(
            &["-e", "valueE", "50", "false", "0.5", "0.7", "pos1", "pos2", "pos3"],
            false,
        )
        .unwrap();

    assert!(!schema.is_set("a"));
    assert_eq!(
        schema.value::<String>("a").as_deref(),
        Some("// tricky default value")
    );
    assert!(!schema.is_set("b-long-param"));
    assert_eq!(schema.value::<u32>("b-long-param"), Some(10));
    assert!(!schema.is_set("c"));
    assert_eq!(schema.value::<i32>("c"), Some(0));
    assert!(!schema.is_set("d-long-param"));
    assert_eq!(schema.value::<f32>("d-long-param"), Some(0.0));
    assert!(schema.values::<i32>("f").is_empty());
    assert!(!schema.is_set("i"));
    assert_eq!(schema.value::<bool>("i"), Some(true));
    assert!(!schema.is_set("j-long"));
    assert_eq!(schema.value::<bool>("j-long"), Some(false));
    assert_eq!(schema.value::<f64>("l"), Some(0.0));

    for flag in schema.flags().iter().filter(|flag| !flag.cell().is_set()) {
        assert_eq!(flag.cell().get(), flag.cell().default_value());
    }
}

#[test]
fn test_defaults_preserved_for_untouched_positionals_and_wide_kinds() {
    let mut schema = Schema::new("program", "")
        .with_flag(FlagSpec::scalar(&["offset"], ValueKind::Int64).with_default(-3i64))
        .unwrap()
        .with_flag(FlagSpec::scalar(&["limit"], ValueKind::Uint64).with_default(64u64))
        .unwrap()
        .with_flag(FlagSpec::scalar(&["delta"], ValueKind::Int64))
        .unwrap()
        .with_flag(FlagSpec::scalar(&["count"], ValueKind::Uint64))
        .unwrap()
        .with_positional(PositionalSpec::required("PARAMG", ValueKind::Uint64))
        .unwrap()
        .with_positional(PositionalSpec::optional("OPT", ValueKind::Int64).with_default(7i64))
        .unwrap()
        .with_positional(PositionalSpec::optional("LABEL", ValueKind::String))
        .unwrap();

    schema.parse(&["5"], false).unwrap();

    assert!(schema.is_set("PARAMG"));
    assert_eq!(schema.value::<u64>("PARAMG"), Some(5));
    assert!(!schema.is_set("OPT"));
    assert_eq!(schema.value::<i64>("OPT"), Some(7));
    assert!(!schema.is_set("LABEL"));
    assert_eq!(schema.value::<String>("LABEL").as_deref(), Some(""));
    assert!(!schema.is_set("offset"));
    assert_eq!(schema.value::<i64>("offset"), Some(-3));
    assert!(!schema.is_set("limit"));
    assert_eq!(schema.value::<u64>("limit"), Some(64));
    assert!(!schema.is_set("delta"));
    assert_eq!(schema.value::<i64>("delta"), Some(0));
    assert!(!schema.is_set("count"));
    assert_eq!(schema.value::<u64>("count"), Some(0));

    for slot in schema.positionals().iter().filter(|slot| !slot.cell().is_set()) {
        assert_eq!(slot.cell().get(), slot.cell().default_value());
    }
}

#[test]
fn test_all_flags_and_positionals() {
    let mut schema = test_schema();
    schema
        .parse(
            &[
                "-e", "valueE", "--a-long-param", "somevalue", "--b-long-param", "4", "-c",
                "555", "--d-long-param", "555.5", "-f", "1", "-f", "2", "-f", "3", "-i",
                "--j-long", "-k", "1.25", "-l", "2.5", "50", "false", "0.5", "0.7", "pos1",
                "pos2", "pos3",
            ],
            false,
        )
        .unwrap();

    assert!(schema.is_set("a"));
    assert_eq!(schema.value::<String>("a").as_deref(), Some("somevalue"));
    assert_eq!(schema.value::<u32>("b-long-param"), Some(4));
    assert_eq!(schema.value::<i32>("c-long-param"), Some(555));
    assert_eq!(schema.value::<f32>("d-long-param"), Some(555.5));
    assert_eq!(schema.value::<String>("e").as_deref(), Some("valueE"));
    assert_eq!(schema.values::<i32>("f"), vec![1, 2, 3]);
    assert!(schema.is_set("i"));
    assert_eq!(schema.value::<bool>("i"), Some(true));
    assert_eq!(schema.value::<bool>("j-long"), Some(true));
    assert_eq!(schema.value::<f32>("k"), Some(1.25));
    assert_eq!(schema.value::<f64>("l"), Some(2.5));

    assert_eq!(schema.value::<u64>("PARAMG"), Some(50));
    assert_eq!(schema.value::<bool>("P_A_R_A_M_G_2"), Some(false));
    assert_eq!(schema.value::<f32>("PARAM_FLOAT"), Some(0.5));
    assert_eq!(schema.value::<f64>("PARAM_DOUBLE"), Some(0.7));
    assert_eq!(schema.values::<String>("PARAMH"), vec!["pos1", "pos2", "pos3"]);
}

#[test]
fn test_short_and_long_alias_mark_same_presence() {
    let mut schema = test_schema();
    schema.parse(&["--help"], true).unwrap();

    assert!(schema.is_set("h"));
    assert!(schema.is_set("-h"));
    assert!(schema.lookup("h").unwrap().matches("--help"));
}

// ---------------------------------------------------------------------------
// Cardinality
// ---------------------------------------------------------------------------

#[test]
fn test_last_wins_for_scalars() {
    let mut schema = Schema::new("program", "")
        .with_flag(FlagSpec::scalar(&["x"], ValueKind::Int32))
        .unwrap();
    schema.parse(&["--x", "1", "--x", "2"], false).unwrap();

    assert_eq!(schema.value::<i32>("x"), Some(2));
    assert!(schema.is_set("x"));
}

#[test]
fn test_accumulation_for_repeats() {
    let mut schema = Schema::new("program", "")
        .with_flag(FlagSpec::repeated(&["f"], ValueKind::Int32))
        .unwrap();
    schema.parse(&["-f", "1", "-f", "2", "-f", "3"], false).unwrap();

    assert_eq!(
        schema.cell("f").unwrap().get(),
        &CellValue::Repeated(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)])
    );
}

#[test]
fn test_repeated_bool_flag_takes_values() {
    let mut schema = Schema::new("test_bools", "")
        .with_flag(FlagSpec::repeated(&["repbool"], ValueKind::Bool))
        .unwrap();
    schema
        .parse(&["--repbool", "false", "--repbool", "true", "--repbool", "false"], false)
        .unwrap();

    assert_eq!(schema.values::<bool>("repbool"), vec![false, true, false]);
}

#[test]
fn test_reparse_accumulates_repeated_cells() {
    let mut schema = Schema::new("program", "")
        .with_flag(FlagSpec::repeated(&["f"], ValueKind::Int32))
        .unwrap();
    schema.parse(&["-f", "1"], false).unwrap();
    schema.parse(&["-f", "2"], false).unwrap();

    assert_eq!(schema.values::<i32>("f"), vec![1, 2]);
}

// ---------------------------------------------------------------------------
// Positionals
// ---------------------------------------------------------------------------

#[test]
fn test_positional_ordering_with_trailing_repeat() {
    let mut schema = abc_schema();
    schema.parse(&["x", "y", "p1", "p2", "p3"], false).unwrap();

    assert_eq!(schema.value::<String>("A").as_deref(), Some("x"));
    assert_eq!(schema.value::<String>("B").as_deref(), Some("y"));
    assert_eq!(schema.values::<String>("C"), vec!["p1", "p2", "p3"]);
}

#[test]
fn test_missing_repeating_positional_fails() {
    let mut schema = abc_schema();
    let err = schema.parse(&["x", "y"], false).unwrap_err();

    assert_eq!(
        err,
        ParseError::MissingRepeatingPositional {
            name: "C".to_string()
        }
    );
    assert!(err.is_incomplete());
}

#[test]
fn test_missing_required_flag() {
    let mut schema = test_schema();
    let err = schema.parse(&["50", "true"], false).unwrap_err();

    assert_eq!(
        err,
        ParseError::MissingRequiredFlag {
            flag: "-e".to_string()
        }
    );
}

// ---------------------------------------------------------------------------
// Coercion and incomplete mode
// ---------------------------------------------------------------------------

#[test]
fn test_coercion_failure_is_unconditional() {
    let mut schema = Schema::new("program", "")
        .with_positional(PositionalSpec::required("N", ValueKind::Int64))
        .unwrap();

    let err = schema
        .parse_with(&["50f"], &ParseOptions { allow_incomplete: true })
        .unwrap_err();
    match err {
        ParseError::Coercion { argument, source } => {
            assert_eq!(argument, "N");
            assert_eq!(source.kind, ValueKind::Int64);
            assert_eq!(source.text, "50f");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!schema.is_set("N"));
}

#[test]
fn test_positional_wrong_type() {
    let mut schema = test_schema();
    let err = schema
        .parse(
            &["-e", "valueE", "50f", "0e", "0.5d", "0.7d", "pos1"],
            false,
        )
        .unwrap_err();

    assert!(matches!(err, ParseError::Coercion { ref argument, .. } if argument == "PARAMG"));
    assert!(!err.is_incomplete());
}

#[test]
fn test_incomplete_mode_suppresses_only_missing_required() {
    let mut schema = test_schema();
    schema.parse_args(&["program", "-h"], true).unwrap();

    assert!(schema.is_set("help"));
    assert_eq!(schema.value::<bool>("h"), Some(true));

    let mut strict = test_schema();
    let err = strict.parse_args(&["program", "-h"], false).unwrap_err();
    assert!(err.is_incomplete());
}

#[test]
fn test_unknown_flag_in_incomplete_mode() {
    let mut schema = test_schema();
    let err = schema.parse(&["-z"], true).unwrap_err();
    assert_eq!(
        err,
        ParseError::UnknownFlag {
            token: "-z".to_string()
        }
    );
}

// ---------------------------------------------------------------------------
// Multi-level dispatch
// ---------------------------------------------------------------------------

#[test]
fn test_two_level_dispatch_with_truncated_tokens() {
    let argv = ["program", "create", "-s", "2048", "/tmp/tmp.file"];

    let mut root = Schema::new("program", "Useful multi command")
        .with_positional(PositionalSpec::required("COMMAND", ValueKind::String))
        .unwrap();
    root.parse(&argv[1..2], false).unwrap();
    assert_eq!(root.value::<String>("COMMAND").as_deref(), Some("create"));

    let mut create = Schema::new("program create", "Useful create")
        .with_flag(FlagSpec::scalar(&["s", "size"], ValueKind::Uint64))
        .unwrap()
        .with_positional(PositionalSpec::required("PATH", ValueKind::String))
        .unwrap();
    create.parse(&argv[2..], false).unwrap();

    assert_eq!(create.value::<u64>("size"), Some(2048));
    assert_eq!(create.value::<String>("PATH").as_deref(), Some("/tmp/tmp.file"));
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

#[test]
fn test_usage_is_deterministic() {
    let schema = test_schema();
    assert_eq!(schema.usage(), schema.usage());
    assert_eq!(
        render_usage(&schema, "schema", "Test schema", 60),
        render_usage(&schema, "schema", "Test schema", 60)
    );
}

#[test]
fn test_usage_lines_respect_width() {
    let schema = test_schema();
    for width in [40, 60, 80, 120] {
        let text = render_usage(&schema, "schema", "Test schema", width);
        for line in text.lines() {
            assert!(
                line.chars().count() <= width,
                "line exceeds {width}: {line:?}"
            );
        }
    }
}

#[test]
fn test_usage_blocks_in_order() {
    let usage = test_schema().usage();
    let required = usage.find("required arguments:").unwrap();
    let positional = usage.find("required positional arguments:").unwrap();
    let optional = usage.find("optional arguments:").unwrap();

    assert!(usage.starts_with("usage: schema [-a|--a-long-param paramA]"));
    assert!(usage.find("Test schema").unwrap() < required);
    assert!(required < positional);
    assert!(positional < optional);
    assert!(usage.contains("{REPEATED,type:int32}"));
    assert!(usage.contains("PARAMH [PARAMH ...]"));
    assert!(usage.ends_with('\n'));
}

#[test]
fn test_overlong_token_is_hard_split() {
    let long = "x".repeat(200);
    let schema = Schema::new("program", &long);
    let usage = schema.usage_with(&UsageOptions {
        line_width: 80,
        ..UsageOptions::default()
    });

    let chunks: Vec<&str> = usage
        .lines()
        .filter(|line| line.starts_with('x'))
        .collect();
    assert_eq!(chunks, vec![&long[..80], &long[80..160], &long[160..]]);
}

#[test]
fn test_usage_ignores_parsed_state() {
    let mut schema = test_schema();
    let before = schema.usage();
    schema
        .parse(&["-e", "v", "-b-long-param", "99", "1", "true", "1", "1", "h"], false)
        .unwrap();

    assert_eq!(schema.usage(), before);
}

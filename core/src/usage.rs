//! Usage text rendering.
//!
//! Output layout, in order:
//!
//! ```text
//! usage: <program> [flag groups...] POSITIONALS...
//!
//! <description>
//!
//! required arguments:
//!   -e paramE              Description {REQUIRED,type:string}
//!
//! required positional arguments:
//!   SRC                    Description {REQUIRED,type:string}
//!
//! optional arguments:
//!   -h, --help             Description {OPTIONAL,type:bool,default:false}
//! ```
//!
//! Rendering reads only the schema's declarations, never parsed values.
//! Wrapping counts characters, not display columns.

use serde::{Deserialize, Serialize};

use crate::schema::dashed;
use crate::{Cardinality, CellValue, FlagSlot, PositionalSlot, Schema, ValueCell};

pub const DEFAULT_LINE_WIDTH: usize = 80;

/// Column where entry descriptions and continuation lines start.
pub const DESCRIPTION_COLUMN: usize = 25;

/// Minimum gap between an entry's names and its description.
const ENTRY_GAP: usize = 2;

/// Layout settings for [`render_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageOptions {
    pub line_width: usize,
    /// Clamped to half of `line_width`.
    pub column: usize,
}

impl Default for UsageOptions {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            column: DESCRIPTION_COLUMN,
        }
    }
}

/// Renders usage text for `schema` under the given program name and
/// description.
///
/// # Examples
///
/// ```
/// use argschema_core::*;
///
/// let schema = Schema::new("program copy", "Useful copy")
///     .with_flag(FlagSpec::presence(&["r", "recursive"]).with_description("Recursive copy"))
///     .unwrap()
///     .with_positional(PositionalSpec::required("SRC", ValueKind::String))
///     .unwrap();
///
/// let text = render_usage(&schema, "program copy", "Useful copy", 80);
/// assert!(text.starts_with("usage: program copy [-r|--recursive] SRC\n"));
/// assert!(text.lines().all(|line| line.chars().count() <= 80));
/// ```
pub fn render_usage(schema: &Schema, program: &str, description: &str, line_width: usize) -> String {
    let options = UsageOptions {
        line_width,
        ..UsageOptions::default()
    };
    render_with(schema, program, description, &options)
}

pub fn render_with(
    schema: &Schema,
    program: &str,
    description: &str,
    options: &UsageOptions,
) -> String {
    let width = options.line_width.max(1);
    let column = options.column.min(width / 2);

    let mut lines = synopsis(schema, program, width, column);

    if !description.trim().is_empty() {
        lines.push(String::new());
        for paragraph in description.lines() {
            if paragraph.trim().is_empty() {
                lines.push(String::new());
                continue;
            }
            let mut wrapper = LineWrapper::new(width, 0);
            paragraph.split_whitespace().for_each(|word| wrapper.push(word));
            lines.extend(wrapper.finish());
        }
    }

    let required_flags: Vec<Entry> = schema
        .flags()
        .iter()
        .filter(|flag| flag.is_required())
        .map(Entry::flag)
        .collect();
    let required_positionals: Vec<Entry> = schema
        .positionals()
        .iter()
        .filter(|slot| slot.is_required())
        .map(Entry::positional)
        .collect();
    let optional: Vec<Entry> = schema
        .flags()
        .iter()
        .filter(|flag| !flag.is_required())
        .map(Entry::flag)
        .chain(
            schema
                .positionals()
                .iter()
                .filter(|slot| !slot.is_required())
                .map(Entry::positional),
        )
        .collect();

    let blocks = [
        ("required arguments:", required_flags),
        ("required positional arguments:", required_positionals),
        ("optional arguments:", optional),
    ];
    for (title, entries) in blocks {
        if entries.is_empty() {
            continue;
        }
        lines.push(String::new());
        let mut header = LineWrapper::new(width, 0);
        title.split_whitespace().for_each(|word| header.push(word));
        lines.extend(header.finish());
        for entry in &entries {
            lines.extend(entry.render(width, column));
        }
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn synopsis(schema: &Schema, program: &str, width: usize, column: usize) -> Vec<String> {
    let mut wrapper = LineWrapper::new(width, column);
    wrapper.push(format!("usage: {}", program.trim()).trim_end());

    for flag in schema.flags() {
        wrapper.push(&flag_group(flag));
    }
    for slot in schema.positionals() {
        let name = slot.name();
        let group = match (slot.is_required(), slot.is_repeating()) {
            (true, false) => name.to_string(),
            (false, false) => format!("[{name}]"),
            (true, true) => format!("{name} [{name} ...]"),
            (false, true) => format!("[{name} [{name} ...]]"),
        };
        wrapper.push(&group);
    }

    wrapper.finish()
}

/// Bracketed synopsis group for one flag, e.g. `[-a|--a-long-param paramA]`.
fn flag_group(flag: &FlagSlot) -> String {
    let names = flag
        .aliases()
        .iter()
        .map(|alias| dashed(alias))
        .collect::<Vec<_>>()
        .join("|");
    let with_value = |names: &str| {
        if flag.is_presence() {
            names.to_string()
        } else {
            format!("{names} {}", flag.value_name())
        }
    };

    match flag.cell().cardinality() {
        Cardinality::Scalar => format!("[{}]", with_value(&names)),
        Cardinality::Repeated => {
            let first = dashed(&flag.aliases()[0]);
            format!("[{} [{} ...]]", with_value(&names), with_value(&first))
        }
    }
}

/// One line item of a block.
struct Entry {
    names: String,
    description: String,
    annotation: String,
}

impl Entry {
    fn flag(flag: &FlagSlot) -> Self {
        let mut names = format!(
            "  {}",
            flag.aliases()
                .iter()
                .map(|alias| dashed(alias))
                .collect::<Vec<_>>()
                .join(", ")
        );
        if !flag.is_presence() {
            names.push(' ');
            names.push_str(flag.value_name());
        }
        Self {
            names,
            description: flag.description().to_string(),
            annotation: annotation(flag.cell(), flag.is_required()),
        }
    }

    fn positional(slot: &PositionalSlot) -> Self {
        Self {
            names: format!("  {}", slot.name()),
            description: slot.description().to_string(),
            annotation: annotation(slot.cell(), slot.is_required()),
        }
    }

    fn render(&self, width: usize, column: usize) -> Vec<String> {
        let mut wrapper = LineWrapper::new(width, column);
        wrapper.push(&self.names);
        if self.names.chars().count() + ENTRY_GAP <= column {
            wrapper.pad_to(column);
        } else {
            wrapper.break_line();
        }

        self.description
            .split_whitespace()
            .chain(self.annotation.split_whitespace())
            .for_each(|word| wrapper.push(word));
        wrapper.finish()
    }
}

/// `{REQUIRED|OPTIONAL|REPEATED,type:<kind>[,default:<literal>]}`
fn annotation(cell: &ValueCell, required: bool) -> String {
    let repeated = cell.cardinality() == Cardinality::Repeated;
    let label = if required {
        "REQUIRED"
    } else if repeated {
        "REPEATED"
    } else {
        "OPTIONAL"
    };

    let mut text = format!("{{{label},type:{}", cell.kind());
    if let (false, CellValue::Scalar(default)) = (required, cell.default_value()) {
        text.push_str(",default:");
        text.push_str(&default.literal());
    }
    text.push('}');
    text
}

/// Greedy word packer with hard splitting of overlong units.
///
/// Units are pushed whole; a unit may contain spaces (synopsis groups) and is
/// never broken at them. Continuation lines start at `indent`.
struct LineWrapper {
    width: usize,
    indent: usize,
    lines: Vec<String>,
    current: String,
    current_len: usize,
    /// Next unit attaches without a separating space.
    fresh: bool,
}

impl LineWrapper {
    fn new(width: usize, indent: usize) -> Self {
        Self {
            width,
            indent: indent.min(width.saturating_sub(1)),
            lines: Vec::new(),
            current: String::new(),
            current_len: 0,
            fresh: true,
        }
    }

    fn push(&mut self, unit: &str) {
        let len = unit.chars().count();
        if len == 0 {
            return;
        }

        if !self.fresh {
            if self.current_len + 1 + len <= self.width {
                self.current.push(' ');
                self.current.push_str(unit);
                self.current_len += 1 + len;
                return;
            }
            self.break_line();
        }

        if self.current_len + len <= self.width {
            self.current.push_str(unit);
            self.current_len += len;
            self.fresh = false;
            return;
        }

        let mut chars = unit.chars().peekable();
        while chars.peek().is_some() {
            if self.current_len >= self.width {
                self.break_line();
            }
            let room = self.width - self.current_len;
            let chunk: String = chars.by_ref().take(room).collect();
            self.current_len += chunk.chars().count();
            self.current.push_str(&chunk);
            self.fresh = false;
        }
    }

    fn pad_to(&mut self, column: usize) {
        while self.current_len < column {
            self.current.push(' ');
            self.current_len += 1;
        }
        self.fresh = true;
    }

    fn break_line(&mut self) {
        let line = std::mem::replace(&mut self.current, " ".repeat(self.indent));
        self.lines.push(line);
        self.current_len = self.indent;
        self.fresh = true;
    }

    fn finish(mut self) -> Vec<String> {
        if !self.current.trim().is_empty() {
            self.lines.push(self.current);
        }
        self.lines
    }
}

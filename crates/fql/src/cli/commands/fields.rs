//! Implementation of `fql fields`.

use std::process::ExitCode;

use comfy_table::Cell;
use serde::Serialize;

use crate::cli::{
    args::FieldsCommand,
    context::CommandContext,
    output::{dim, display_path, print_json, subheader, table},
};

/// JSON output for one configured field.
#[derive(Serialize)]
struct JsonField<'a> {
    /// Logical field name.
    name: &'a str,
    /// Value kind.
    #[serde(rename = "type")]
    kind: &'static str,
    /// Backend fields searched for this field.
    backend: Vec<&'a str>,
    /// Config file defining the field.
    origin: Option<String>,
}

/// Lists configured fields with their kind, backend fields and origin.
pub fn run(ctx: &CommandContext, cmd: &FieldsCommand) -> ExitCode {
    let config = &ctx.config;

    let rows: Vec<JsonField<'_>> = config
        .fields
        .iter()
        .map(|(name, spec)| JsonField {
            name,
            kind: spec.kind.as_str(),
            backend: spec.group().map_or_else(
                || vec![spec.backend_field(name)],
                |paths| paths.iter().map(String::as_str).collect(),
            ),
            origin: config
                .origins
                .get(name)
                .map(|path| display_path(path, &ctx.cwd)),
        })
        .collect();

    if cmd.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        println!("{}", dim("No fields configured."));
        println!();
        println!("Run {} to create a configuration file.", subheader("fql init"));
        return ExitCode::SUCCESS;
    }

    let mut out = table(&["Field", "Type", "Backend", "Defined in"]);
    for row in &rows {
        out.add_row(vec![
            Cell::new(row.name),
            Cell::new(row.kind),
            Cell::new(row.backend.join("\n")),
            Cell::new(row.origin.as_deref().unwrap_or("-")),
        ]);
    }
    println!("{out}");

    let mode = if config.fields.is_strict() {
        "strict: unconfigured fields are rejected"
    } else {
        "lenient: unconfigured fields are treated as strings"
    };
    println!("{}", dim(mode));
    ExitCode::SUCCESS
}

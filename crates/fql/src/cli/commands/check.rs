//! Implementation of `fql check`.

use std::process::ExitCode;

use fql_config::{ConfigWarning, is_global_config};

use crate::cli::{
    context::CommandContext,
    output::{dim, display_path, subheader, warning},
};

/// Shows the configuration files in effect and validates the merged configuration.
///
/// Exits non-zero when there are warnings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let config = &ctx.config;

    if config.sources.is_empty() {
        println!("{}", dim("No configuration files found."));
        println!();
        println!("Run {} to create a configuration file.", subheader("fql init"));
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader("Config files (highest precedence first):"));
    for path in &config.sources {
        let scope = if is_global_config(path) { "global" } else { "local" };
        println!(
            "   {} {}",
            display_path(path, &ctx.cwd),
            dim(&format!("({scope})"))
        );
    }
    if let Some(root) = &config.root_file {
        let stop = format!("discovery stopped at {} (root = true)", display_path(root, &ctx.cwd));
        println!("   {}", dim(&stop));
    }
    println!();

    let mode = if config.settings.strict { "strict" } else { "lenient" };
    println!("{}", subheader("Settings:"));
    println!("   mode: {mode}");
    println!("   max_query_length: {}", config.settings.max_query_length);
    println!();

    println!("{}", subheader(&format!("Fields: {}", config.fields.len())));
    println!();

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("No issues found.");
        return ExitCode::SUCCESS;
    }

    println!("{}", subheader(&format!("Warnings ({}):", warnings.len())));
    for w in &warnings {
        println!("   {}", warning(&w.to_string()));
    }
    println!();

    print_hints(&warnings);

    ExitCode::FAILURE
}

/// Prints hints for resolving common warnings.
fn print_hints(warnings: &[ConfigWarning]) {
    let mut hints: Vec<&str> = warnings.iter().map(hint).collect();
    hints.sort_unstable();
    hints.dedup();

    for h in hints {
        println!("{}", dim(&format!("Hint: {h}")));
    }
}

/// Returns the fix for a warning.
fn hint(w: &ConfigWarning) -> &'static str {
    match w {
        ConfigWarning::NoFieldsDefined => "add [fields.NAME] sections to .fql.toml",
        ConfigWarning::EmptyFieldGroup { .. } => {
            "list at least one backend path in field_group, or remove it"
        }
        ConfigWarning::FieldIgnoredByGroup { .. } => {
            "drop `field` from entries that set field_group"
        }
        ConfigWarning::DuplicateGroupPath { .. } => "remove repeated field_group paths",
        ConfigWarning::BlankBackendName { .. } => "give `field` a non-empty backend name",
    }
}

//! Implementation of `fql compile`.

use std::process::ExitCode;

use fql_query::generate;
use tracing::debug;

use crate::cli::{
    args::CompileCommand,
    context::CommandContext,
    output::{print_indented, print_json, subheader},
};

/// Compiles a filter expression and prints the generated query.
pub fn run(ctx: &CommandContext, cmd: &CompileCommand) -> ExitCode {
    let query = match ctx.query_text(&cmd.query) {
        Ok(q) => q,
        Err(code) => return code,
    };

    let compiled = match generate(&query, &ctx.config.fields) {
        Ok(compiled) => compiled,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    debug!(query = %query, "filter compiled");

    if cmd.json {
        return print_json(&compiled);
    }

    println!("{}", subheader("Generated query:"));
    print_indented(&compiled.to_string());
    ExitCode::SUCCESS
}

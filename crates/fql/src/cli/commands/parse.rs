//! Implementation of `fql parse`.

use std::process::ExitCode;

use fql_query::parse;

use crate::cli::{
    args::ParseCommand,
    context::CommandContext,
    output::{dim, print_indented, print_json, subheader},
};

/// Parses a filter expression and prints its syntax tree.
///
/// No field configuration is consulted, so any well-formed filter succeeds.
pub fn run(ctx: &CommandContext, cmd: &ParseCommand) -> ExitCode {
    let query = match ctx.query_text(&cmd.query) {
        Ok(q) => q,
        Err(code) => return code,
    };

    let expr = match parse(&query) {
        Ok(expr) => expr,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&expr);
    }

    println!("{}", subheader("Syntax tree:"));
    print_indented(&expr.to_string());
    println!();
    println!("{}", subheader("Canonical form:"));
    println!("  {}", expr.to_query_string());
    println!(
        "{}",
        dim(&format!("  ({} comparisons)", expr.comparison_count()))
    );
    ExitCode::SUCCESS
}

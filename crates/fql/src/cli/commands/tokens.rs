//! Implementation of `fql tokens`.

use std::process::ExitCode;

use comfy_table::Cell;
use fql_query::{TokenKind, tokenize};

use crate::cli::{
    args::TokensCommand,
    context::CommandContext,
    output::{print_json, table, warning},
};

/// Prints the token stream for a filter expression.
///
/// Lexing never fails; illegal input shows up as `ILLEGAL` tokens and makes the
/// command exit non-zero.
pub fn run(ctx: &CommandContext, cmd: &TokensCommand) -> ExitCode {
    let query = match ctx.query_text(&cmd.query) {
        Ok(q) => q,
        Err(code) => return code,
    };

    let tokens = tokenize(&query);
    let illegal = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Illegal)
        .count();

    if cmd.json {
        let code = print_json(&tokens);
        return if illegal > 0 { ExitCode::FAILURE } else { code };
    }

    let mut out = table(&["Kind", "Literal", "Position"]);
    for token in &tokens {
        out.add_row(vec![
            Cell::new(token.kind.name()),
            Cell::new(&token.literal),
            Cell::new(token.position),
        ]);
    }
    println!("{out}");

    if illegal > 0 {
        eprintln!("{}", warning(&format!("{illegal} illegal token(s)")));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

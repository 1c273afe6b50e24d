//! Clap argument definitions for the `fql` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "fql", version)]
#[command(about = "Filter Query Language - compile filter expressions into search queries")]
pub struct Cli {
    /// Load configuration from this file instead of discovering .fql.toml files
    #[arg(short = 'c', long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// The filter expression argument shared by query commands.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Filter expression; multiple words are joined with spaces
    #[arg(required = true, value_name = "QUERY")]
    pub words: Vec<String>,
}

impl QueryArgs {
    /// Returns the filter expression as a single string.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Arguments for `fql compile`.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    #[command(flatten)]
    /// The filter expression.
    pub query: QueryArgs,

    /// Output the generated query as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `fql parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseCommand {
    #[command(flatten)]
    /// The filter expression.
    pub query: QueryArgs,

    /// Output the syntax tree as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `fql tokens`.
#[derive(Args, Debug, Clone)]
pub struct TokensCommand {
    #[command(flatten)]
    /// The filter expression.
    pub query: QueryArgs,

    /// Output tokens as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `fql fields`.
#[derive(Args, Debug, Clone)]
pub struct FieldsCommand {
    /// Output field definitions as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `fql init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.fql.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `fql` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Compile a filter expression into a search query
    #[command(after_help = "\
FILTER SYNTAX:
  field=value           Equality (== is accepted too)
  field!=value          Inequality
  field>10 field<=20    Ranges: < <= > >=
  a=1 b=2               Both comparisons (implicit AND)
  a=1 AND b=2           Both comparisons (and/AND)
  a=1 OR b=2            Either comparison (or/OR)
  (expr)                Grouping; AND binds tighter than OR
  size>5mb              Size units: kb, mb, gb, tb (powers of 1000)
  name=\"hello world\"    Quote values with spaces or digits
  first_seen>2023-01-01 ISO-8601 dates

EXAMPLES:
  fql compile 'type=pe and size>1mb'
  fql compile 'extension=dll or (type=macho and positives>10)'
  fql compile --json 'engines=eicar'")]
    Compile(CompileCommand),

    /// Show how a filter expression parses
    Parse(ParseCommand),

    /// Show the tokens of a filter expression
    Tokens(TokensCommand),

    /// List configured fields
    Fields(FieldsCommand),

    /// Validate configuration and diagnose issues
    Check,

    /// Initialize fql configuration in current directory
    Init(InitCommand),
}

/// Parses CLI arguments, exiting with clap's usage error on failure.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

//! Implementation of `fql init`.

use std::process::ExitCode;

use fql_config::{
    CONFIG_FILENAME, ConfigError, global_config_path, global_template, local_template,
    write_template,
};

use crate::cli::{
    args::InitCommand,
    context::CommandContext,
    output::{print_indented, subheader},
};

/// Initializes a `.fql.toml` configuration file.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let cwd = &ctx.cwd;

    let is_home_dir = global_config_path()
        .and_then(|p| p.parent().map(|h| h == cwd))
        .unwrap_or(false);

    let use_global = cmd.global || is_home_dir;

    let config_path = if use_global {
        match global_config_path() {
            Some(path) => path,
            None => {
                eprintln!("error: {}", ConfigError::NoHomeDirectory);
                return ExitCode::FAILURE;
            }
        }
    } else {
        cwd.join(CONFIG_FILENAME)
    };

    let template = if use_global {
        global_template()
    } else {
        local_template()
    };

    if let Err(e) = write_template(&config_path, &template, cmd.force) {
        eprintln!("error: {e}");
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    println!();
    println!("{}", subheader("Configuration written:"));
    print_indented(&template);

    ExitCode::SUCCESS
}

// src/bin/cmdr.rs

use anyhow::Result;
use clap::Parser;
use cmdr::{
    cli::{Cli, dispatcher, handlers::commons::HandlerContext},
    config::AppConfig,
    system::executor::ExecutionError,
};
use colored::*;
use std::env;
use std::io::{self, IsTerminal};

/// Sets up logging, builds the configuration once, dispatches, and turns errors
/// into an exit code.
fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        // A failing script already reported its own output; mirror its exit code.
        if let Some(ExecutionError::NonZeroExitStatus { code, .. }) =
            e.downcast_ref::<ExecutionError>()
        {
            log::debug!("{}", e);
            std::process::exit(*code);
        }

        eprintln!("\n{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let config = AppConfig::from_env()?;
    log::debug!("Using configuration: {:?}", config);

    let cwd = env::current_dir()?;
    let interactive = io::stdin().is_terminal() && io::stderr().is_terminal();
    let ctx = HandlerContext::new(config, cwd, interactive);

    dispatcher::dispatch(cli.args, &ctx)
}

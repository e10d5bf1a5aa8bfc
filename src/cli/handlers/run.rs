// src/cli/handlers/run.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::{
    cli::handlers::commons::{self, HandlerContext},
    core::{matcher, processor},
    models::ScopedScript,
    system::{executor, store::FileReader},
};

#[derive(Error, Debug)]
pub enum RunError {
    #[error("No script named '{name}' is visible from this directory.")]
    ScriptNotFound { name: String },
    #[error("Missing values for: {}. Pass them as arguments or run in a terminal.", .names.join(", "))]
    MissingArguments { names: Vec<String> },
    #[error("Could not read template '{path}': {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- Command Argument Parsing ---

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Runs a script by name.")]
struct RunArgs {
    /// Print the final command instead of running it.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// The script name followed by its arguments.
    #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
    invocation: Vec<String>,
}

// --- Main Handler ---

/// Entry point for the explicit `run` action.
pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    run_invocation(&run_args.invocation, run_args.dry_run, ctx)
}

/// Resolves, prepares and runs `tokens` (script name words followed by arguments).
pub fn run_invocation(tokens: &[String], dry_run: bool, ctx: &HandlerContext) -> Result<()> {
    // 1. Find the script among everything visible from the working directory.
    let scripts = ctx.visible_scripts()?;
    let invocation = matcher::match_invocation(&scripts, tokens);
    let Some(script) = invocation.result.script() else {
        return handle_unknown_script(tokens, ctx);
    };

    // 2. Build the final command, prompting for anything still missing.
    let command = build_command(script, invocation.args, ctx)?;

    // 3. Print or execute.
    if dry_run {
        println!("{}", command);
        return Ok(());
    }
    log::info!("Running '{}' from scope '{}'.", script.script.display_name(), script.scope);
    executor::execute_command(&command, &ctx.cwd, ctx.config.shell.as_deref())?;
    Ok(())
}

/// Reads the script's template and binds `args` to it. Missing values are asked for
/// in an interactive terminal and rebound until the command is complete.
pub fn build_command(script: &ScopedScript, args: &[String], ctx: &HandlerContext) -> Result<String> {
    let template = ctx
        .reader
        .read_file(&script.script.template)
        .map_err(|source| RunError::TemplateRead {
            path: ctx.reader.resolve(&script.script.template),
            source,
        })?;

    let mut answers: HashMap<String, String> = HashMap::new();
    loop {
        let result = processor::process(&template, args, &answers)?;

        if let Some(command) = result.command {
            return Ok(command);
        }

        if !ctx.interactive {
            return Err(RunError::MissingArguments {
                names: result.missing.iter().map(|s| s.name.clone()).collect(),
            }
            .into());
        }

        for spec in &result.missing {
            let value = commons::prompt_text(spec.prompt_label())?;
            answers.insert(spec.name.clone(), value);
        }
    }
}

/// No script matched. In a terminal, offer to save the typed name as a new script
/// in the working directory.
fn handle_unknown_script(tokens: &[String], ctx: &HandlerContext) -> Result<()> {
    let typed = tokens.join(" ");
    if typed.trim().is_empty() {
        return Err(anyhow!("No script name given."));
    }
    if !ctx.interactive {
        return Err(RunError::ScriptNotFound { name: typed }.into());
    }

    let name = commons::normalize_script_name(tokens.first().map(String::as_str).unwrap_or_default())?;
    let save = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(format!(
            "No script named '{}' here. Save it as a new script?",
            name.cyan()
        ))
        .default(false)
        .interact()?;
    if !save {
        return Err(RunError::ScriptNotFound { name: typed }.into());
    }

    let command = commons::prompt_text("Command (use %name% for placeholders)")?;
    if command.trim().is_empty() {
        println!("{}", "Empty command. Nothing saved.".yellow());
        return Ok(());
    }
    let description = commons::prompt_text("Description (optional)")?;

    let scope = ctx.target_scope(false)?;
    commons::save_script(ctx, &scope, &name, Some(description), &command)?;
    println!("Saved '{}' in {}.", name.cyan(), scope.to_string().yellow());
    Ok(())
}

// MARK: --- UNIT TESTS ---

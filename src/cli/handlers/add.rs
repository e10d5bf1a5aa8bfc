// src/cli/handlers/add.rs

use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::{
    cli::{
        dispatcher,
        handlers::commons::{self, HandlerContext},
    },
    core::placeholders,
};

// --- Command Argument Parsing ---

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Saves a command template under a name, in this directory or globally."
)]
struct AddArgs {
    /// Name used to invoke the script. Quote multi-word names.
    name: String,

    /// Short description shown by `list` and `show`.
    #[arg(short, long = "desc")]
    description: Option<String>,

    /// Save in the global scope instead of the current directory.
    #[arg(short, long)]
    global: bool,

    /// The command template. Asked for when omitted.
    #[arg(short, long, allow_hyphen_values = true)]
    command: Option<String>,
}

// --- Main Handler ---

pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let add_args = AddArgs::try_parse_from(&args)?;
    let name = commons::normalize_script_name(&add_args.name)?;

    if name
        .split(' ')
        .next()
        .is_some_and(|first| dispatcher::find_command(first).is_some())
    {
        println!(
            "{}",
            format!(
                "Note: '{}' starts with a built-in action; invoke it with `cmdr run {}`.",
                name, name
            )
            .yellow()
        );
    }

    // 1. Get the command text.
    let command = match add_args.command {
        Some(command) => command,
        None if ctx.interactive => commons::prompt_text("Command (use %name% for placeholders)")?,
        None => return Err(anyhow!("No command given. Pass it with --command.")),
    };
    if command.trim().is_empty() {
        return Err(anyhow!("The command cannot be empty."));
    }

    // 2. Confirm before replacing a script of the same name in the same scope.
    let scope = ctx.target_scope(add_args.global)?;
    let store = ctx.load_store()?;
    if store.find_in_scope(&scope, &name).is_some() && ctx.interactive {
        let overwrite = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "'{}' already exists in {}. Replace it?",
                name.cyan(),
                scope.to_string().yellow()
            ))
            .default(false)
            .interact()?;
        if !overwrite {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    // 3. Save.
    let replaced = commons::save_script(ctx, &scope, &name, add_args.description, &command)?;
    let verb = if replaced.is_some() { "Replaced" } else { "Saved" };
    println!("{} '{}' in {}.", verb, name.cyan(), scope.to_string().yellow());

    let specs = placeholders::extract_placeholders(&command);
    if !specs.is_empty() {
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        println!("  {} {}", "Placeholders:".dimmed(), names.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::handlers::commons::test_support::{context_in, to_cli_params};
    use crate::models::Scope;
    use tempfile::TempDir;

    #[test]
    fn test_add_to_directory_scope() {
        let temp = TempDir::new().unwrap();
        let ctx = context_in(&temp);
        handle(
            to_cli_params(&["deploy", "--desc", "Ship it", "--command", "./deploy.sh %env::staging%"]),
            &ctx,
        )
        .unwrap();

        let scope = ctx.target_scope(false).unwrap();
        let store = ctx.load_store().unwrap();
        let script = store.find_in_scope(&scope, "deploy").unwrap();
        assert_eq!(script.description.as_deref(), Some("Ship it"));
        assert!(store.scripts_in(&Scope::Global).is_empty());
    }

    #[test]
    fn test_add_global_with_multi_word_name() {
        let temp = TempDir::new().unwrap();
        let ctx = context_in(&temp);
        handle(
            to_cli_params(&["git  sync", "--global", "-c", "git pull --rebase"]),
            &ctx,
        )
        .unwrap();
        let store = ctx.load_store().unwrap();
        assert!(store.find_in_scope(&Scope::Global, "git sync").is_some());
    }

    #[test]
    fn test_add_requires_command_without_terminal() {
        let temp = TempDir::new().unwrap();
        let ctx = context_in(&temp);
        assert!(handle(to_cli_params(&["x"]), &ctx).is_err());
        assert!(handle(to_cli_params(&["x", "--command", "  "]), &ctx).is_err());
        assert!(ctx.load_store().unwrap().scopes.is_empty());
    }
}

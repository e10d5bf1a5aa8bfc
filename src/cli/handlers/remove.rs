// src/cli/handlers/remove.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::*;
use dialoguer::{Confirm, theme::ColorfulTheme};

use crate::{
    cli::handlers::commons::{self, HandlerContext},
    system::store::{self, Store},
};

#[derive(Parser, Debug)]
#[command(
    no_binary_name = true,
    about = "Removes a script from this directory, or from the global scope."
)]
struct RemoveArgs {
    /// The script name. Multi-word names may be given as separate words.
    #[arg(required = true, num_args = 1..)]
    name: Vec<String>,

    /// Remove from the global scope instead of the current directory.
    #[arg(short, long)]
    global: bool,

    /// Skip the confirmation prompt.
    #[arg(short, long)]
    yes: bool,
}

pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let remove_args = RemoveArgs::try_parse_from(&args)?;
    let name = commons::normalize_script_name(&remove_args.name.join(" "))?;
    let scope = ctx.target_scope(remove_args.global)?;

    // Only the exact scope is considered; scripts inherited from ancestors stay put.
    let mut scripts = ctx.load_store()?;
    if scripts.find_in_scope(&scope, &name).is_none() {
        return Err(anyhow!(
            "No script named '{}' in {}.",
            name,
            scope
        ));
    }

    if ctx.interactive && !remove_args.yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Remove '{}' from {}?",
                name.cyan(),
                scope.to_string().yellow()
            ))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let Some(removed) = scripts.remove(&scope, &name) else {
        return Ok(());
    };
    ctx.store.write(&scripts)?;
    store::remove_template_file(&ctx.reader, &removed.template)
        .with_context(|| format!("Could not delete template '{}'", removed.template.display()))?;

    println!("Removed '{}' from {}.", name.cyan(), scope.to_string().yellow());
    Ok(())
}

// src/cli/handlers/show.rs

use anyhow::Result;
use clap::Parser;
use colored::*;

use crate::{
    cli::handlers::{commons::HandlerContext, run::RunError},
    core::{matcher, placeholders},
    system::store::FileReader,
};

#[derive(Parser, Debug)]
#[command(no_binary_name = true, about = "Shows a script, its placeholders and its template.")]
struct ShowArgs {
    /// The script name. Multi-word names may be given as separate words.
    #[arg(required = true, num_args = 1..)]
    name: Vec<String>,
}

pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let show_args = ShowArgs::try_parse_from(&args)?;
    let name = show_args.name.join(" ");

    let scripts = ctx.visible_scripts()?;
    let Some(found) = matcher::match_name(&scripts, &name).into_script() else {
        return Err(RunError::ScriptNotFound { name }.into());
    };

    let template_path = ctx.reader.resolve(&found.script.template);
    let template = ctx
        .reader
        .read_file(&found.script.template)
        .map_err(|source| RunError::TemplateRead {
            path: template_path.clone(),
            source,
        })?;

    println!("{} {}", "Script:".bold(), found.script.display_name().cyan());
    println!("{} {}", "Scope:".bold(), found.scope.to_string().yellow());
    if let Some(description) = &found.script.description {
        println!("{} {}", "Description:".bold(), description);
    }
    println!("{} {}", "Template:".bold(), template_path.display());

    let specs = placeholders::extract_placeholders(&template);
    if !specs.is_empty() {
        println!("{}", "Placeholders:".bold());
        for spec in &specs {
            let mut line = format!("  {}", spec.name.green());
            if spec.positional {
                line.push_str(&format!(" {}", "(positional)".dimmed()));
            }
            if let Some(description) = &spec.description {
                line.push_str(&format!("  {}", description));
            }
            if let Some(default) = &spec.default {
                line.push_str(&format!("  {}", format!("[default: {}]", default).dimmed()));
            }
            println!("{}", line);
        }
    }

    println!("\n{}", template.trim_end());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::handlers::commons::{
        save_script,
        test_support::{context_in, to_cli_params},
    };
    use crate::models::Scope;
    use tempfile::TempDir;

    #[test]
    fn test_show_existing_and_missing() {
        let temp = TempDir::new().unwrap();
        let ctx = context_in(&temp);
        save_script(&ctx, &Scope::Global, "git sync", Some("Pull".to_string()), "git pull %remote::origin%")
            .unwrap();

        handle(to_cli_params(&["git", "sync"]), &ctx).unwrap();

        let err = handle(to_cli_params(&["git"]), &ctx).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RunError>(),
            Some(RunError::ScriptNotFound { .. })
        ));
    }
}

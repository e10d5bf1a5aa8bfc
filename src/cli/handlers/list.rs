// src/cli/handlers/list.rs

use anyhow::Result;
use clap::Parser;
use colored::*;
use std::collections::HashSet;

use crate::{
    cli::handlers::commons::HandlerContext,
    core::scope_resolver,
    models::{Scope, ScriptDefinition},
};

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the scripts visible from here.")]
struct ListArgs {
    /// List every scope in the store, not just the ones visible from here.
    #[arg(short, long)]
    all: bool,
}

/// One printed group of scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedScope {
    pub scope: Scope,
    /// `(script, shadowed)`: shadowed scripts lose to a same-named script in a
    /// more local scope.
    pub scripts: Vec<(ScriptDefinition, bool)>,
}

pub fn handle(args: Vec<String>, ctx: &HandlerContext) -> Result<()> {
    let list_args = ListArgs::try_parse_from(&args)?;
    let groups = if list_args.all {
        collect_all(ctx)?
    } else {
        collect_visible(ctx)?
    };

    if groups.is_empty() {
        println!("{}", "No scripts found.".yellow());
        return Ok(());
    }

    for group in &groups {
        println!("{}", group.scope.to_string().yellow().bold());
        for (script, shadowed) in &group.scripts {
            let name = script.display_name();
            let mut line = format!("  {}", if *shadowed { name.dimmed() } else { name.cyan() });
            if let Some(description) = &script.description {
                line.push_str(&format!("  {}", description.dimmed()));
            }
            if *shadowed {
                line.push_str(&format!(" {}", "(shadowed)".dimmed()));
            }
            println!("{}", line);
        }
    }
    Ok(())
}

/// Visible scripts grouped by scope, most local first.
pub fn collect_visible(ctx: &HandlerContext) -> Result<Vec<ListedScope>> {
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut groups: Vec<ListedScope> = Vec::new();

    for scoped in ctx.visible_scripts()? {
        let shadowed = match scoped.name() {
            Some(name) => !seen_names.insert(name.to_string()),
            None => false,
        };
        match groups.last_mut() {
            Some(group) if group.scope == scoped.scope => {
                group.scripts.push((scoped.script, shadowed));
            }
            _ => groups.push(ListedScope {
                scope: scoped.scope,
                scripts: vec![(scoped.script, shadowed)],
            }),
        }
    }
    Ok(groups)
}

/// Every scope in the store, in key order, without shadowing.
pub fn collect_all(ctx: &HandlerContext) -> Result<Vec<ListedScope>> {
    let store = ctx.load_store()?;
    Ok(store
        .scopes
        .iter()
        .filter(|(_, scripts)| !scripts.is_empty())
        .map(|(key, scripts)| ListedScope {
            scope: scope_resolver::normalize_key(key),
            scripts: scripts.iter().cloned().map(|s| (s, false)).collect(),
        })
        .collect())
}

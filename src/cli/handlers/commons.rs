// src/cli/handlers/commons.rs

// Shared state and helpers used by more than one handler.

use anyhow::{Context, Result, anyhow};
use dialoguer::{Input, theme::ColorfulTheme};
use std::path::PathBuf;

use crate::{
    config::AppConfig,
    core::scope_resolver,
    models::{Scope, ScopedScript, ScriptDefinition, ScriptStore},
    system::store::{self, FsFileReader, JsonFileStore, Store},
};

/// Everything a handler needs, built once in `main`.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub config: AppConfig,
    pub store: JsonFileStore,
    pub reader: FsFileReader,
    /// The directory the user invoked `cmdr` from.
    pub cwd: PathBuf,
    /// Whether prompts can be shown. When false, anything that would prompt fails instead.
    pub interactive: bool,
}

impl HandlerContext {
    pub fn new(config: AppConfig, cwd: PathBuf, interactive: bool) -> Self {
        Self {
            store: JsonFileStore::new(&config.store_path),
            reader: FsFileReader::new(&config.scripts_dir),
            config,
            cwd,
            interactive,
        }
    }

    pub fn load_store(&self) -> Result<ScriptStore> {
        Ok(self.store.read()?)
    }

    /// Every script visible from the working directory, in resolution order.
    pub fn visible_scripts(&self) -> Result<Vec<ScopedScript>> {
        let store = self.load_store()?;
        Ok(scope_resolver::resolve_all(&store, &self.cwd)?)
    }

    /// The scope new scripts go to: `global`, or the working directory itself.
    pub fn target_scope(&self, global: bool) -> Result<Scope> {
        if global {
            Ok(Scope::Global)
        } else {
            Ok(scope_resolver::directory_scope(&self.cwd)?)
        }
    }
}

/// Trims a script name and collapses inner whitespace, so that the stored name is
/// exactly what `cmdr a b` reconstructs from its tokens.
pub fn normalize_script_name(raw: &str) -> Result<String> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if name.is_empty() {
        return Err(anyhow!("Script name cannot be empty."));
    }
    if name.contains('%') {
        return Err(anyhow!("Script name '{}' cannot contain '%'.", name));
    }
    Ok(name)
}

/// Writes the template file and records the script in the store. A script with the
/// same name in the same scope is replaced and its old template file deleted.
pub fn save_script(
    ctx: &HandlerContext,
    scope: &Scope,
    name: &str,
    description: Option<String>,
    command: &str,
) -> Result<Option<ScriptDefinition>> {
    let mut scripts = ctx.load_store()?;

    let template = store::write_template_file(&ctx.config.scripts_dir, name, command)
        .with_context(|| {
            format!(
                "Could not write template file in '{}'",
                ctx.config.scripts_dir.display()
            )
        })?;

    let definition = ScriptDefinition {
        name: Some(name.to_string()),
        description: description.filter(|d| !d.trim().is_empty()),
        template,
    };
    let replaced = scripts.upsert(scope, definition);
    ctx.store.write(&scripts)?;

    if let Some(old) = &replaced {
        store::remove_template_file(&ctx.reader, &old.template).with_context(|| {
            format!("Could not delete old template '{}'", old.template.display())
        })?;
    }

    log::info!("Saved script '{}' in scope '{}'.", name, scope);
    Ok(replaced)
}

/// Asks for a line of text. Empty answers are allowed.
pub fn prompt_text(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value)
}

// MARK: --- TEST HELPERS ---

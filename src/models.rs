// src/models.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::GLOBAL_SCOPE_KEY;
use crate::core::scope_resolver;

// --- STORE MODELS (What is read from `scripts.json`) ---

/// A stored script. The command template itself lives in a separate file
/// and is only read when the script is about to be used.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ScriptDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path to the template file. Relative paths are resolved against the scripts directory.
    pub template: PathBuf,
}

impl ScriptDefinition {
    /// Returns the name for display purposes, falling back to the template file name.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("<{}>", self.template.display()),
        }
    }
}

/// The whole persisted collection: scope key (`"global"` or an absolute directory) to scripts.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ScriptStore {
    pub scopes: BTreeMap<String, Vec<ScriptDefinition>>,
}

impl ScriptStore {
    /// Raw keys naming `scope`. Keys are compared after normalization, so `/work/`
    /// and `/work` are one scope.
    fn keys_for(&self, scope: &Scope) -> Vec<String> {
        self.scopes
            .keys()
            .filter(|key| match scope {
                Scope::Global => key.as_str() == GLOBAL_SCOPE_KEY,
                Scope::Directory(_) => scope_resolver::normalize_key(key) == *scope,
            })
            .cloned()
            .collect()
    }

    /// Scripts stored under the given scope, in key order.
    pub fn scripts_in(&self, scope: &Scope) -> Vec<&ScriptDefinition> {
        self.keys_for(scope)
            .iter()
            .filter_map(|key| self.scopes.get(key))
            .flatten()
            .collect()
    }

    /// Finds a script by exact name inside a single scope.
    pub fn find_in_scope(&self, scope: &Scope, name: &str) -> Option<&ScriptDefinition> {
        self.scripts_in(scope)
            .into_iter()
            .find(|s| s.name.as_deref() == Some(name))
    }

    /// Inserts a script into a scope, replacing any script with the same name there.
    /// Returns the replaced definition.
    pub fn upsert(&mut self, scope: &Scope, script: ScriptDefinition) -> Option<ScriptDefinition> {
        let keys = self.keys_for(scope);

        if let Some(name) = script.name.clone() {
            for key in &keys {
                let existing = self.scopes.get_mut(key).and_then(|entries| {
                    entries
                        .iter_mut()
                        .find(|s| s.name.as_deref() == Some(name.as_str()))
                });
                if let Some(existing) = existing {
                    return Some(std::mem::replace(existing, script));
                }
            }
        }

        // New scripts join the first existing key for the scope, so no duplicate key is created.
        let key = keys.into_iter().next().unwrap_or_else(|| scope.key());
        self.scopes.entry(key).or_default().push(script);
        None
    }

    /// Removes a named script from a scope. Empty scopes are dropped from the store.
    pub fn remove(&mut self, scope: &Scope, name: &str) -> Option<ScriptDefinition> {
        for key in self.keys_for(scope) {
            let Some(entries) = self.scopes.get_mut(&key) else {
                continue;
            };
            let Some(position) = entries.iter().position(|s| s.name.as_deref() == Some(name))
            else {
                continue;
            };
            let removed = entries.remove(position);
            if entries.is_empty() {
                self.scopes.remove(&key);
            }
            return Some(removed);
        }
        None
    }
}

// --- SCOPES ---

/// A storage partition for scripts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Directory(PathBuf),
}

impl Scope {
    /// The key used for this scope in the store.
    pub fn key(&self) -> String {
        match self {
            Scope::Global => GLOBAL_SCOPE_KEY.to_string(),
            Scope::Directory(path) => path.to_string_lossy().into_owned(),
        }
    }

    /// Interprets a raw store key.
    pub fn from_key(key: &str) -> Self {
        if key == GLOBAL_SCOPE_KEY {
            Scope::Global
        } else {
            Scope::Directory(PathBuf::from(key))
        }
    }

    pub fn directory(&self) -> Option<&Path> {
        match self {
            Scope::Global => None,
            Scope::Directory(path) => Some(path),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => f.write_str(GLOBAL_SCOPE_KEY),
            Scope::Directory(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Scope priority. Lower values win ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScopeRank {
    Current = 0,
    Ancestor = 1,
    Global = 2,
}

impl ScopeRank {
    pub fn priority(self) -> u8 {
        self as u8
    }
}

/// One entry of the ordered scope chain for a working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLevel {
    pub scope: Scope,
    pub rank: ScopeRank,
    /// Number of directories walked up from the working directory (0 for the cwd itself).
    pub depth: usize,
}

/// A script tagged with the scope in which it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedScript {
    pub scope: Scope,
    pub rank: ScopeRank,
    pub depth: usize,
    pub script: ScriptDefinition,
}

impl ScopedScript {
    pub fn name(&self) -> Option<&str> {
        self.script.name.as_deref()
    }
}

// --- PLACEHOLDER MODELS ---

/// A declared hole in a command template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderSpec {
    /// Explicit name, or the synthesized `arg<N>` for positional placeholders.
    pub name: String,
    pub description: Option<String>,
    pub default: Option<String>,
    pub positional: bool,
}

impl PlaceholderSpec {
    /// Text shown when asking the user for a value.
    pub fn prompt_label(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.name)
    }
}

/// Where a bound value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Explicit,
    Default,
    Missing,
}

/// A placeholder paired with its resolved value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundArgument {
    pub name: String,
    /// `None` only when `provenance` is `Missing`.
    pub value: Option<String>,
    pub provenance: Provenance,
}

/// A placeholder token that survived substitution unexpanded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionWarning {
    pub name: String,
    pub token: String,
}

impl fmt::Display for SubstitutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "placeholder '{}' was left unexpanded ({})",
            self.name, self.token
        )
    }
}

/// The outcome of binding arguments to a template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessResult {
    /// Every declared placeholder, in declaration order.
    pub bound: Vec<BoundArgument>,
    /// Specs lacking both an explicit value and a default, in declaration order.
    pub missing: Vec<PlaceholderSpec>,
    /// The final command text. Only present when `missing` is empty.
    pub command: Option<String>,
    pub warnings: Vec<SubstitutionWarning>,
}

impl ProcessResult {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.bound
            .iter()
            .find(|b| b.name == name)
            .and_then(|b| b.value.as_deref())
    }
}

// --- CONFIGURATION FILE MODEL ---

/// Deserialized form of the optional `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub store_path: Option<String>,
    pub scripts_dir: Option<String>,
    pub shell: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(name: &str) -> ScriptDefinition {
        ScriptDefinition {
            name: Some(name.to_string()),
            description: None,
            template: PathBuf::from(format!("{}.sh", name)),
        }
    }

    #[test]
    fn test_scope_key_roundtrip() {
        assert_eq!(Scope::from_key("global"), Scope::Global);
        assert_eq!(
            Scope::from_key("/a/b"),
            Scope::Directory(PathBuf::from("/a/b"))
        );
        assert_eq!(Scope::Directory(PathBuf::from("/a/b")).key(), "/a/b");
    }

    #[test]
    fn test_upsert_replaces_same_name_in_scope() {
        let mut store = ScriptStore::default();
        let scope = Scope::Global;
        assert!(store.upsert(&scope, script("deploy")).is_none());

        let mut updated = script("deploy");
        updated.description = Some("new".to_string());
        let replaced = store.upsert(&scope, updated.clone());

        assert_eq!(replaced, Some(script("deploy")));
        assert_eq!(store.scripts_in(&scope), vec![&updated]);
    }

    #[test]
    fn test_remove_drops_empty_scope() {
        let mut store = ScriptStore::default();
        let scope = Scope::Directory(PathBuf::from("/work"));
        store.upsert(&scope, script("build"));

        assert!(store.remove(&scope, "missing").is_none());
        assert_eq!(store.remove(&scope, "build"), Some(script("build")));
        assert!(store.scopes.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_equivalent_keys_are_one_scope() {
        let mut store = ScriptStore::default();
        store.scopes.insert("/work/".to_string(), vec![script("build")]);
        let scope = Scope::Directory(PathBuf::from("/work"));

        assert_eq!(store.find_in_scope(&scope, "build"), Some(&script("build")));

        let mut updated = script("build");
        updated.description = Some("new".to_string());
        assert_eq!(store.upsert(&scope, updated.clone()), Some(script("build")));
        store.upsert(&scope, script("lint"));

        let keys: Vec<_> = store.scopes.keys().cloned().collect();
        assert_eq!(keys, vec!["/work/".to_string()]);
        assert_eq!(store.scripts_in(&scope), vec![&updated, &script("lint")]);

        assert_eq!(store.remove(&scope, "build"), Some(updated));
        assert_eq!(store.remove(&scope, "lint"), Some(script("lint")));
        assert!(store.scopes.is_empty());
    }

    #[test]
    fn test_store_serializes_as_plain_object() {
        let mut store = ScriptStore::default();
        store.upsert(&Scope::Global, script("hello"));
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"{"global":[{"name":"hello","template":"hello.sh"}]}"#);
    }
}

// src/core/scope_resolver.rs

use crate::models::{Scope, ScopeLevel, ScopeRank, ScopedScript, ScriptDefinition, ScriptStore};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Could not read the working directory '{path}': {source}")]
    WorkingDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type ScopeResult<T> = Result<T, ScopeError>;

/// Returns every stored script visible from `cwd`, tagged with its scope and ordered
/// by priority: the working directory, each ancestor up to (but excluding) the
/// filesystem root, then `global`.
///
/// # Errors
/// Fails only if the working directory cannot be canonicalized. Scopes missing from
/// the store simply contribute nothing.
pub fn resolve_all(store: &ScriptStore, cwd: &Path) -> ScopeResult<Vec<ScopedScript>> {
    let canonical_cwd = canonicalize_dir(cwd)?;
    Ok(resolve_from(store, &canonical_cwd))
}

/// Same as [`resolve_all`], for a working directory that is already canonical.
pub fn resolve_from(store: &ScriptStore, canonical_cwd: &Path) -> Vec<ScopedScript> {
    let by_scope = index_store(store);
    let mut resolved = Vec::new();

    for level in scope_chain(canonical_cwd) {
        let Some(scripts) = by_scope.get(&level.scope) else {
            continue;
        };
        log::debug!(
            "Scope '{}' (rank {:?}) contributes {} script(s).",
            level.scope,
            level.rank,
            scripts.len()
        );
        resolved.extend(scripts.iter().map(|script| ScopedScript {
            scope: level.scope.clone(),
            rank: level.rank,
            depth: level.depth,
            script: (*script).clone(),
        }));
    }

    resolved
}

/// The ordered scope chain for a canonical working directory.
///
/// The working directory itself is always included. Ancestors are visited nearest
/// first and the walk stops before the filesystem root. A directory reached twice is
/// only listed once. `global` always comes last.
pub fn scope_chain(canonical_cwd: &Path) -> Vec<ScopeLevel> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut levels = Vec::new();
    let mut current = Some(canonical_cwd);
    let mut depth = 0usize;

    while let Some(dir) = current {
        let parent = dir.parent();
        if dir.as_os_str().is_empty() || (depth > 0 && parent.is_none()) {
            break;
        }

        let normalized = normalize_lexically(dir);
        if seen.insert(normalized.clone()) {
            levels.push(ScopeLevel {
                scope: Scope::Directory(normalized),
                rank: if depth == 0 {
                    ScopeRank::Current
                } else {
                    ScopeRank::Ancestor
                },
                depth,
            });
        }

        current = parent;
        depth += 1;
    }

    levels.push(ScopeLevel {
        scope: Scope::Global,
        rank: ScopeRank::Global,
        depth,
    });
    levels
}

/// The scope a directory maps to, for storing new scripts.
pub fn directory_scope(dir: &Path) -> ScopeResult<Scope> {
    canonicalize_dir(dir).map(Scope::Directory)
}

/// Normalizes a raw store key so it compares equal to the scopes produced by
/// [`scope_chain`]. Existing directories are canonicalized (symlinks resolved);
/// keys that do not exist on disk are normalized lexically.
pub fn normalize_key(key: &str) -> Scope {
    match Scope::from_key(key) {
        Scope::Global => Scope::Global,
        Scope::Directory(path) => match dunce::canonicalize(&path) {
            Ok(canonical) => Scope::Directory(canonical),
            Err(e) => {
                if e.kind() == std::io::ErrorKind::NotFound {
                    log::debug!("Scope key '{}' does not exist on disk.", key);
                } else {
                    log::warn!("Could not canonicalize scope key '{}': {}", key, e);
                }
                Scope::Directory(normalize_lexically(&path))
            }
        },
    }
}

fn canonicalize_dir(dir: &Path) -> ScopeResult<PathBuf> {
    dunce::canonicalize(dir).map_err(|source| ScopeError::WorkingDirectory {
        path: dir.to_path_buf(),
        source,
    })
}

/// Drops trailing separators and `.` components.
fn normalize_lexically(path: &Path) -> PathBuf {
    path.components().collect()
}

/// Groups the store's scripts by normalized scope, keeping store order inside each group.
fn index_store(store: &ScriptStore) -> HashMap<Scope, Vec<&ScriptDefinition>> {
    let mut by_scope: HashMap<Scope, Vec<&ScriptDefinition>> = HashMap::new();
    for (key, scripts) in &store.scopes {
        by_scope
            .entry(normalize_key(key))
            .or_default()
            .extend(scripts.iter());
    }
    by_scope
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn script(name: &str) -> ScriptDefinition {
        ScriptDefinition {
            name: Some(name.to_string()),
            description: None,
            template: PathBuf::from(format!("{}.sh", name)),
        }
    }

    fn store_with(entries: &[(&str, &[&str])]) -> ScriptStore {
        let mut store = ScriptStore::default();
        for (key, names) in entries {
            store.scopes.insert(
                key.to_string(),
                names.iter().map(|n| script(n)).collect(),
            );
        }
        store
    }

    #[cfg(unix)]
    #[test]
    fn test_scope_chain_walks_up_and_excludes_root() {
        let chain = scope_chain(Path::new("/a/b/c"));
        let scopes: Vec<_> = chain.iter().map(|l| l.scope.key()).collect();
        assert_eq!(scopes, vec!["/a/b/c", "/a/b", "/a", "global"]);
        let ranks: Vec<_> = chain.iter().map(|l| l.rank.priority()).collect();
        assert_eq!(ranks, vec![0, 1, 1, 2]);
    }

    #[cfg(unix)]
    #[test]
    fn test_resolve_orders_by_scope_priority() {
        let store = store_with(&[
            ("global", &["g"]),
            ("/a/b", &["ab"]),
            ("/a/b/c", &["abc"]),
        ]);
        let resolved = resolve_from(&store, Path::new("/a/b/c"));
        let scopes: Vec<_> = resolved.iter().map(|s| s.scope.key()).collect();
        assert_eq!(scopes, vec!["/a/b/c", "/a/b", "global"]);
        let names: Vec<_> = resolved.iter().filter_map(|s| s.name()).collect();
        assert_eq!(names, vec!["abc", "ab", "g"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_trailing_slash_keys_name_the_same_scope() {
        let store = store_with(&[("/a/b/", &["one"]), ("/a/b", &["two"])]);
        let resolved = resolve_from(&store, Path::new("/a/b"));
        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|s| s.rank == ScopeRank::Current));
    }

    #[test]
    fn test_unrelated_scopes_are_ignored() {
        let store = store_with(&[("/somewhere/else", &["x"])]);
        let resolved = resolve_from(&store, Path::new("/a/b"));
        assert!(resolved.is_empty());
    }

    #[test]
    fn test_resolve_all_canonicalizes_real_directories() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("project").join("sub");
        fs::create_dir_all(&nested).unwrap();

        let project = temp.path().join("project");
        let mut project_key = project.to_string_lossy().into_owned();
        project_key.push(std::path::MAIN_SEPARATOR);

        let mut store = ScriptStore::default();
        store.scopes.insert(project_key, vec![script("build")]);
        store.scopes.insert("global".to_string(), vec![script("build")]);

        let resolved = resolve_all(&store, &nested).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].rank, ScopeRank::Ancestor);
        assert_eq!(resolved[0].depth, 1);
        assert_eq!(
            resolved[0].scope,
            Scope::Directory(dunce::canonicalize(&project).unwrap())
        );
        assert_eq!(resolved[1].scope, Scope::Global);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_store_key_matches_real_directory() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real");
        fs::create_dir_all(&real).unwrap();
        let link = temp.path().join("link");
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let mut store = ScriptStore::default();
        store
            .scopes
            .insert(link.to_string_lossy().into_owned(), vec![script("x")]);

        let resolved = resolve_all(&store, &real).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].rank, ScopeRank::Current);
    }

    #[test]
    fn test_missing_working_directory_is_fatal() {
        let temp = TempDir::new().unwrap();
        let gone = temp.path().join("does-not-exist");
        let result = resolve_all(&ScriptStore::default(), &gone);
        assert!(matches!(result, Err(ScopeError::WorkingDirectory { .. })));
    }
}

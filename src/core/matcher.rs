// src/core/matcher.rs

use crate::models::ScopedScript;
use std::cmp::Ordering;

/// Confidence assigned to an exact, case-sensitive name match.
pub const EXACT_MATCH_CONFIDENCE: f32 = 1.0;

/// The outcome of matching a typed invocation against the visible scripts.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    NoMatch,
    ExactName {
        script: ScopedScript,
        confidence: f32,
    },
}

impl MatchResult {
    pub fn script(&self) -> Option<&ScopedScript> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::ExactName { script, .. } => Some(script),
        }
    }

    pub fn into_script(self) -> Option<ScopedScript> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::ExactName { script, .. } => Some(script),
        }
    }
}

/// A matched invocation: the result plus the tokens left over as script arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation<'t> {
    pub result: MatchResult,
    pub args: &'t [String],
}

#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    script: &'a ScopedScript,
    confidence: f32,
    order: usize,
}

/// Picks the script whose name equals `input` exactly.
///
/// `scripts` is expected in resolution order (see `scope_resolver::resolve_all`).
/// Command text is never searched: a script whose template merely contains `input`
/// does not match.
pub fn match_name(scripts: &[ScopedScript], input: &str) -> MatchResult {
    let best = scripts
        .iter()
        .enumerate()
        .filter(|(_, s)| s.name() == Some(input))
        .map(|(order, script)| Candidate {
            script,
            confidence: EXACT_MATCH_CONFIDENCE,
            order,
        })
        .min_by(compare_candidates);

    match best {
        Some(candidate) => {
            log::debug!(
                "'{}' matched in scope '{}' with confidence {}.",
                input,
                candidate.script.scope,
                candidate.confidence
            );
            MatchResult::ExactName {
                script: candidate.script.clone(),
                confidence: candidate.confidence,
            }
        }
        None => {
            log::debug!("No script named '{}'.", input);
            MatchResult::NoMatch
        }
    }
}

/// Matches the longest run of leading tokens (joined by single spaces) against script
/// names, so `cmdr git sync origin` can reach a script named `git sync`. The tokens
/// after the matched name are returned as the script's arguments.
pub fn match_invocation<'t>(scripts: &[ScopedScript], tokens: &'t [String]) -> Invocation<'t> {
    for len in (1..=tokens.len()).rev() {
        let (name_tokens, args) = tokens.split_at(len);
        let result = match_name(scripts, &name_tokens.join(" "));
        if result != MatchResult::NoMatch {
            return Invocation { result, args };
        }
    }
    Invocation {
        result: MatchResult::NoMatch,
        args: tokens.get(1..).unwrap_or_default(),
    }
}

/// Tie-break: higher confidence, then the more local scope, then resolution order.
fn compare_candidates(a: &Candidate<'_>, b: &Candidate<'_>) -> Ordering {
    b.confidence
        .total_cmp(&a.confidence)
        .then(a.script.rank.cmp(&b.script.rank))
        .then(a.script.depth.cmp(&b.script.depth))
        .then(a.order.cmp(&b.order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Scope, ScopeRank, ScriptDefinition};
    use std::path::PathBuf;

    fn scoped(name: &str, rank: ScopeRank, depth: usize, template: &str) -> ScopedScript {
        let scope = match rank {
            ScopeRank::Global => Scope::Global,
            _ => Scope::Directory(PathBuf::from(format!("/depth{}", depth))),
        };
        ScopedScript {
            scope,
            rank,
            depth,
            script: ScriptDefinition {
                name: Some(name.to_string()),
                description: None,
                template: PathBuf::from(template),
            },
        }
    }

    fn to_tokens(params: &[&str]) -> Vec<String> {
        params.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_name_wins_over_content() {
        let scripts = vec![
            scoped("release", ScopeRank::Current, 0, "deploy.sh"),
            scoped("deploy", ScopeRank::Global, 2, "other.sh"),
        ];
        let result = match_name(&scripts, "deploy");
        let script = result.script().unwrap();
        assert_eq!(script.name(), Some("deploy"));
        assert_eq!(script.rank, ScopeRank::Global);
    }

    #[test]
    fn test_more_local_scope_wins() {
        let scripts = vec![
            scoped("build", ScopeRank::Current, 0, "local.sh"),
            scoped("build", ScopeRank::Ancestor, 1, "parent.sh"),
            scoped("build", ScopeRank::Global, 3, "global.sh"),
        ];
        match match_name(&scripts, "build") {
            MatchResult::ExactName { script, confidence } => {
                assert_eq!(script.script.template, PathBuf::from("local.sh"));
                assert_eq!(confidence, EXACT_MATCH_CONFIDENCE);
            }
            MatchResult::NoMatch => panic!("expected a match"),
        }
    }

    #[test]
    fn test_tie_break_ignores_input_order() {
        let scripts = vec![
            scoped("build", ScopeRank::Global, 3, "global.sh"),
            scoped("build", ScopeRank::Ancestor, 2, "grandparent.sh"),
            scoped("build", ScopeRank::Ancestor, 1, "parent.sh"),
        ];
        let result = match_name(&scripts, "build");
        assert_eq!(
            result.script().unwrap().script.template,
            PathBuf::from("parent.sh")
        );
    }

    #[test]
    fn test_match_is_case_sensitive_and_whole_name() {
        let scripts = vec![scoped("Deploy", ScopeRank::Current, 0, "d.sh")];
        assert_eq!(match_name(&scripts, "deploy"), MatchResult::NoMatch);
        assert_eq!(match_name(&scripts, "Dep"), MatchResult::NoMatch);
        assert_eq!(match_name(&[], "Deploy"), MatchResult::NoMatch);
    }

    #[test]
    fn test_invocation_splits_name_from_arguments() {
        let scripts = vec![scoped("deploy", ScopeRank::Current, 0, "d.sh")];
        let tokens = to_tokens(&["deploy", "prod", "--force=yes"]);
        let invocation = match_invocation(&scripts, &tokens);
        assert_eq!(invocation.result.script().unwrap().name(), Some("deploy"));
        assert_eq!(invocation.args, &tokens[1..]);
    }

    #[test]
    fn test_invocation_prefers_longest_multi_word_name() {
        let scripts = vec![
            scoped("git", ScopeRank::Current, 0, "git.sh"),
            scoped("git sync", ScopeRank::Global, 2, "sync.sh"),
        ];
        let tokens = to_tokens(&["git", "sync", "origin"]);
        let invocation = match_invocation(&scripts, &tokens);
        assert_eq!(invocation.result.script().unwrap().name(), Some("git sync"));
        assert_eq!(invocation.args, &to_tokens(&["origin"])[..]);
    }

    #[test]
    fn test_invocation_without_match() {
        let tokens = to_tokens(&["nothing", "here"]);
        let invocation = match_invocation(&[], &tokens);
        assert_eq!(invocation.result, MatchResult::NoMatch);
        assert!(match_invocation(&[], &[]).args.is_empty());
    }
}

// src/core/arg_binder.rs

use crate::models::{BoundArgument, PlaceholderSpec, Provenance};
use std::collections::HashMap;
use thiserror::Error;

/// Validation errors raised while binding CLI tokens to placeholders.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The template declares positional placeholders, so flags cannot be used at all.
    #[error(
        "named arguments not allowed when script contains positional placeholders (got: {})",
        format_flags(.names)
    )]
    NamedWithPositional { names: Vec<String> },
    /// A flag does not match any placeholder of the script.
    #[error("Unknown argument '--{name}'. The script accepts: {expected}")]
    UnknownArgument { name: String, expected: String },
    /// More positional values than the template declares placeholders.
    #[error("Too many arguments: the script accepts {accepted} value(s) but {provided} were given.")]
    TooManyArguments { accepted: usize, provided: usize },
    /// A flag appeared last, or right before another flag, without a value.
    #[error("Flag '--{name}' requires a value (use --{name}=<value> or --{name} <value>).")]
    MissingFlagValue { name: String },
}

fn format_flags(names: &[String]) -> String {
    names
        .iter()
        .map(|n| format!("--{}", n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// CLI tokens split into named (`--key=value`, `--key value`) and positional buckets.
/// Both buckets keep the order in which the tokens were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgTokens<'a> {
    pub named: Vec<(&'a str, &'a str)>,
    pub positional: Vec<&'a str>,
}

impl<'a> ArgTokens<'a> {
    /// Classifies raw tokens without cloning them.
    ///
    /// # Logic:
    /// - `--key=value` is a named argument.
    /// - `--key value` is a named argument when `value` does not itself start with `--`.
    /// - A bare `--` ends option parsing; every later token is positional.
    /// - Anything else, including single-dash tokens like `-5`, is positional.
    pub fn parse(tokens: &'a [String]) -> Result<Self, BindError> {
        let mut named = Vec::new();
        let mut positional = Vec::new();
        let mut iter = tokens.iter().map(String::as_str).peekable();

        while let Some(token) = iter.next() {
            if token == "--" {
                positional.extend(iter.by_ref());
                break;
            }

            let Some(flag) = token.strip_prefix("--") else {
                positional.push(token);
                continue;
            };

            if let Some((key, value)) = flag.split_once('=') {
                named.push((key, value));
                continue;
            }

            match iter.peek() {
                Some(&value) if !value.starts_with("--") => {
                    iter.next();
                    named.push((flag, value));
                }
                _ => {
                    return Err(BindError::MissingFlagValue {
                        name: flag.to_string(),
                    });
                }
            }
        }

        Ok(Self { named, positional })
    }
}

/// Bound values for every declared placeholder plus the ones still lacking a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    /// One entry per spec, in declaration order.
    pub bound: Vec<BoundArgument>,
    /// Specs with neither an explicit value nor a default, in declaration order.
    pub missing: Vec<PlaceholderSpec>,
}

impl Binding {
    pub fn get(&self, name: &str) -> Option<&BoundArgument> {
        self.bound.iter().find(|b| b.name == name)
    }
}

/// Binds CLI tokens (script name already stripped) to the placeholder specs.
pub fn bind(specs: &[PlaceholderSpec], tokens: &[String]) -> Result<Binding, BindError> {
    bind_with_answers(specs, tokens, &HashMap::new())
}

/// Like [`bind`], but first binds `answers` (placeholder name to value) collected
/// from a prompt. Answers are bound by name regardless of the template's shape and
/// are skipped when positional tokens are distributed, so a prompt-then-retry loop
/// converges on the same result every time.
///
/// Binding never performs I/O and never mutates its inputs.
pub fn bind_with_answers(
    specs: &[PlaceholderSpec],
    tokens: &[String],
    answers: &HashMap<String, String>,
) -> Result<Binding, BindError> {
    let args = ArgTokens::parse(tokens)?;

    // --- 1. Upfront validation of the named/positional rule ---
    let has_positional = specs.iter().any(|s| s.positional);
    if has_positional && !args.named.is_empty() {
        return Err(BindError::NamedWithPositional {
            names: args.named.iter().map(|(k, _)| k.to_string()).collect(),
        });
    }

    // --- 1b. More positional values than the template has placeholders ---
    if args.positional.len() > specs.len() {
        return Err(BindError::TooManyArguments {
            accepted: specs.len(),
            provided: args.positional.len(),
        });
    }

    // --- 2. Named values (CLI flags, then prompted answers) ---
    let mut explicit: HashMap<&str, String> = HashMap::with_capacity(specs.len());
    for &(key, value) in &args.named {
        if !specs.iter().any(|s| s.name == key) {
            return Err(BindError::UnknownArgument {
                name: key.to_string(),
                expected: format_flags(&specs.iter().map(|s| s.name.clone()).collect::<Vec<_>>()),
            });
        }
        if explicit.insert(key, value.to_string()).is_some() {
            log::debug!("Flag '--{}' given more than once; keeping the last value.", key);
        }
    }
    for spec in specs {
        if let Some(answer) = answers.get(&spec.name) {
            explicit.insert(spec.name.as_str(), answer.clone());
        }
    }

    // --- 3. Declaration-order fill from the positional bucket ---
    let mut positional = args.positional.iter();
    let mut bound = Vec::with_capacity(specs.len());
    let mut missing = Vec::new();

    for spec in specs {
        let (value, provenance) = if let Some(value) = explicit.remove(spec.name.as_str()) {
            (Some(value), Provenance::Explicit)
        } else if let Some(value) = positional.next() {
            (Some(value.to_string()), Provenance::Explicit)
        } else if let Some(default) = &spec.default {
            (Some(default.clone()), Provenance::Default)
        } else {
            missing.push(spec.clone());
            (None, Provenance::Missing)
        };
        bound.push(BoundArgument {
            name: spec.name.clone(),
            value,
            provenance,
        });
    }

    // --- 4. Leftover positional values ---
    // Within the limit above, values left over once named flags have taken their
    // placeholders are dropped.
    let leftover: Vec<&str> = positional.copied().collect();
    if !leftover.is_empty() {
        log::debug!("Ignoring unused positional value(s): {:?}", leftover);
    }

    Ok(Binding { bound, missing })
}

// MARK: --- UNIT TESTS ---

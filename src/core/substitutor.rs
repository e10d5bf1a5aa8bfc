// src/core/substitutor.rs

use crate::{
    core::{commons::quote_if_needed, placeholders},
    models::{BoundArgument, SubstitutionWarning},
};

/// The rewritten template plus every token that could not be expanded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution {
    pub command: String,
    pub warnings: Vec<SubstitutionWarning>,
}

/// "Renders" a template by replacing each placeholder occurrence with its value.
///
/// Occurrences are re-scanned in template order, so a name repeated several times is
/// replaced at each of its own sites exactly once. The value of an occurrence is the
/// bound value (explicit or default), else the default written at that occurrence.
/// Without either, the token is copied through unchanged and reported as a warning.
///
/// Text outside placeholder spans is copied byte for byte.
pub fn substitute(template: &str, bound: &[BoundArgument]) -> Substitution {
    let mut command = String::with_capacity(template.len());
    let mut warnings = Vec::new();
    let mut last_index = 0;

    for token in placeholders::scan(template) {
        command.push_str(template.get(last_index..token.range.start).unwrap_or_default());

        match resolve_value(&token, bound) {
            Some(value) => command.push_str(&quote_if_needed(value)),
            None => {
                log::warn!("Placeholder '{}' left unexpanded.", token.spec.name);
                command.push_str(token.raw);
                warnings.push(SubstitutionWarning {
                    name: token.spec.name.clone(),
                    token: token.raw.to_string(),
                });
            }
        }
        last_index = token.range.end;
    }
    command.push_str(template.get(last_index..).unwrap_or_default());

    Substitution { command, warnings }
}

fn resolve_value<'b>(
    token: &'b placeholders::PlaceholderToken<'_>,
    bound: &'b [BoundArgument],
) -> Option<&'b str> {
    bound
        .iter()
        .find(|b| b.name == token.spec.name)
        .and_then(|b| b.value.as_deref())
        .or(token.spec.default.as_deref())
}

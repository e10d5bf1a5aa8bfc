// src/core/placeholders.rs

//! Placeholder grammar for command templates.
//!
//! A placeholder is delimited by `%` and holds up to three colon-separated fields:
//! `%name:description:default%`. Every field may be empty, and `%%` is the bare
//! positional form. A literal colon inside the description or default is written `\:`.
//!
//! Parsing is permissive: anything that does not match the grammar (an unbalanced `%`,
//! a name containing spaces, ...) is plain text and is never reported as an error.

use crate::models::PlaceholderSpec;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::ops::Range;

lazy_static! {
    static ref PLACEHOLDER_RE: Regex =
        Regex::new(r"%([\w.-]*)(?::((?:\\:|[^%:])*))?(?::((?:\\:|[^%:])*))?%")
            .expect("placeholder regex is valid");
}

/// Prefix of the synthetic names given to positional placeholders.
pub const POSITIONAL_PREFIX: &str = "arg";

/// A single placeholder occurrence inside a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderToken<'a> {
    /// Byte range of the whole token (delimiters included) in the template.
    pub range: Range<usize>,
    /// The literal token text, e.g. `%env:target environment:staging%`.
    pub raw: &'a str,
    /// The spec as written at this occurrence. Repeated names may carry other fields
    /// than the first occurrence; `extract_placeholders` keeps the first one.
    pub spec: PlaceholderSpec,
}

/// Finds every placeholder occurrence, in template order.
///
/// Positional occurrences are numbered `arg1`, `arg2`, ... in the order they appear,
/// so two calls on the same text always assign the same names.
pub fn scan(template: &str) -> Vec<PlaceholderToken<'_>> {
    let mut positional_count = 0usize;
    PLACEHOLDER_RE
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let spec = spec_from_captures(&caps, &mut positional_count);
            Some(PlaceholderToken {
                range: whole.range(),
                raw: whole.as_str(),
                spec,
            })
        })
        .collect()
}

/// Parses a template into its ordered, deduplicated list of placeholder specs.
/// The first occurrence of a name wins.
///
/// An explicit `%arg<N>%` names the same value as the N-th positional placeholder.
/// The merged spec is positional, so the named/positional rule still applies.
pub fn extract_placeholders(template: &str) -> Vec<PlaceholderSpec> {
    let mut index_by_name: HashMap<String, usize> = HashMap::new();
    let mut specs: Vec<PlaceholderSpec> = Vec::new();

    for token in scan(template) {
        match index_by_name.get(&token.spec.name) {
            Some(&index) => {
                if token.spec.positional
                    && let Some(first) = specs.get_mut(index)
                {
                    first.positional = true;
                }
            }
            None => {
                index_by_name.insert(token.spec.name.clone(), specs.len());
                specs.push(token.spec);
            }
        }
    }
    log::debug!("Extracted {} placeholder(s): {:?}", specs.len(), specs);
    specs
}

/// Returns true if the text still contains anything that parses as a placeholder.
pub fn contains_placeholders(text: &str) -> bool {
    PLACEHOLDER_RE.is_match(text)
}

fn spec_from_captures(caps: &Captures<'_>, positional_count: &mut usize) -> PlaceholderSpec {
    let name = caps.get(1).map_or("", |m| m.as_str());
    let description = caps.get(2).and_then(|m| field_value(m.as_str()));
    let default = caps.get(3).and_then(|m| field_value(m.as_str()));

    if name.is_empty() {
        *positional_count += 1;
        PlaceholderSpec {
            name: format!("{}{}", POSITIONAL_PREFIX, positional_count),
            description,
            default,
            positional: true,
        }
    } else {
        PlaceholderSpec {
            name: name.to_string(),
            description,
            default,
            positional: false,
        }
    }
}

/// Unescapes `\:` and maps an empty field to `None`.
fn field_value(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.replace("\\:", ":"))
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, description: Option<&str>, default: Option<&str>) -> PlaceholderSpec {
        PlaceholderSpec {
            name: name.to_string(),
            description: description.map(str::to_string),
            default: default.map(str::to_string),
            positional: false,
        }
    }

    fn positional(n: usize, description: Option<&str>, default: Option<&str>) -> PlaceholderSpec {
        PlaceholderSpec {
            name: format!("arg{}", n),
            description: description.map(str::to_string),
            default: default.map(str::to_string),
            positional: true,
        }
    }

    #[test]
    fn test_extract_named_and_bare_positional() {
        let specs = extract_placeholders("deploy %env:target environment:staging% --port %%");
        assert_eq!(
            specs,
            vec![
                named("env", Some("target environment"), Some("staging")),
                positional(1, None, None),
            ]
        );
    }

    #[test]
    fn test_extract_empty_fields() {
        let specs = extract_placeholders("a %host::localhost% b %user:login name:% c %:port:8080%");
        assert_eq!(
            specs,
            vec![
                named("host", None, Some("localhost")),
                named("user", Some("login name"), None),
                positional(1, Some("port"), Some("8080")),
            ]
        );
    }

    #[test]
    fn test_extract_name_only() {
        assert_eq!(
            extract_placeholders("echo %greeting%"),
            vec![named("greeting", None, None)]
        );
    }

    #[test]
    fn test_escaped_colons_are_unescaped() {
        let specs = extract_placeholders(r"curl %url:full url\: with scheme:http\://localhost\:8080%");
        assert_eq!(
            specs,
            vec![named(
                "url",
                Some("full url: with scheme"),
                Some("http://localhost:8080")
            )]
        );
    }

    #[test]
    fn test_positional_ids_increment_in_order() {
        let specs = extract_placeholders("cp %% %:destination:% %%");
        let names: Vec<_> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["arg1", "arg2", "arg3"]);
        assert!(specs.iter().all(|s| s.positional));
    }

    #[test]
    fn test_duplicate_names_first_occurrence_wins() {
        let specs = extract_placeholders("echo %name:first:one% and %name:second:two%");
        assert_eq!(specs, vec![named("name", Some("first"), Some("one"))]);

        // Both occurrences remain distinct substitution sites.
        let tokens = scan("echo %name:first:one% and %name:second:two%");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].raw, "%name:second:two%");
        assert_eq!(tokens[1].spec.default.as_deref(), Some("two"));
    }

    #[test]
    fn test_explicit_arg_name_merges_with_positional() {
        let specs = extract_placeholders("echo %arg1:first value% %%");
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "arg1");
        assert_eq!(specs[0].description.as_deref(), Some("first value"));
        assert!(specs[0].positional);

        // A non-colliding explicit name stays named.
        let specs = extract_placeholders("echo %arg2% %%");
        let names: Vec<_> = specs.iter().map(|s| (s.name.as_str(), s.positional)).collect();
        assert_eq!(names, vec![("arg2", false), ("arg1", true)]);
    }

    #[test]
    fn test_malformed_sequences_are_literal_text() {
        assert!(extract_placeholders("echo 100% done").is_empty());
        assert!(extract_placeholders("echo % not a name %").is_empty());
        assert!(extract_placeholders("no placeholders here").is_empty());
        assert!(!contains_placeholders("50% off"));
    }

    #[test]
    fn test_scan_ranges_point_at_raw_tokens() {
        let text = "ssh %user%@%host:server%";
        for token in scan(text) {
            assert_eq!(&text[token.range.clone()], token.raw);
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let text = "run %b% %a% %% %b% %:x:y% %c::z%";
        let first = extract_placeholders(text);
        for _ in 0..10 {
            assert_eq!(extract_placeholders(text), first);
        }
    }
}

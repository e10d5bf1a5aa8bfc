// src/core/processor.rs

use crate::{
    core::{
        arg_binder::{self, BindError},
        placeholders, substitutor,
    },
    models::ProcessResult,
};
use std::collections::HashMap;

/// Runs a template through extraction, binding and, when nothing is missing, substitution.
///
/// `answers` holds values collected for previously missing placeholders; pass an empty
/// map on the first attempt. The call is pure, so the caller can prompt for
/// `result.missing` and call it again with the answers filled in.
pub fn process(
    template: &str,
    tokens: &[String],
    answers: &HashMap<String, String>,
) -> Result<ProcessResult, BindError> {
    let specs = placeholders::extract_placeholders(template);
    let binding = arg_binder::bind_with_answers(&specs, tokens, answers)?;

    if !binding.missing.is_empty() {
        log::debug!(
            "{} placeholder(s) still missing a value: {:?}",
            binding.missing.len(),
            binding.missing.iter().map(|s| &s.name).collect::<Vec<_>>()
        );
        return Ok(ProcessResult {
            bound: binding.bound,
            missing: binding.missing,
            command: None,
            warnings: Vec::new(),
        });
    }

    let substitution = substitutor::substitute(template, &binding.bound);
    Ok(ProcessResult {
        bound: binding.bound,
        missing: Vec::new(),
        command: Some(substitution.command),
        warnings: substitution.warnings,
    })
}

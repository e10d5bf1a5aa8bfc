//! # Resolution and Substitution Engine
//!
//! Everything needed to turn a typed invocation into final command text, with no
//! terminal or filesystem writes involved.
//!
//! ## Modules
//!
//! - **`scope_resolver`**: Lists the scripts visible from a working directory, ordered
//!   from the most local scope to `global`.
//! - **`matcher`**: Picks the script whose name equals the invocation.
//! - **`placeholders`**: The `%name:description:default%` template grammar.
//! - **`arg_binder`**: Binds CLI tokens and defaults to placeholders, reporting what is missing.
//! - **`substitutor`**: Rewrites a template with the bound values.
//! - **`processor`**: Chains extraction, binding and substitution.

pub mod arg_binder;
pub mod commons;
pub mod matcher;
pub mod placeholders;
pub mod processor;
pub mod scope_resolver;
pub mod substitutor;

//! # cmdr
//!
//! Stores shell command templates per directory (or globally) and runs them again
//! by name, filling `%placeholder%` holes from command-line arguments, template
//! defaults, or a prompt.
//!
//! - [`core`] holds the pure engine: scope resolution, matching, placeholder
//!   extraction, argument binding and substitution.
//! - [`system`] holds the I/O: the JSON store, template files and the shell executor.
//! - [`cli`] and [`config`] wire them together for the `cmdr` binary.

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;

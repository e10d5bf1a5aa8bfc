// src/cli/handlers/mod.rs

// One module per CLI action, plus the helpers they share.

pub mod add;
pub mod commons;
pub mod list;
pub mod remove;
pub mod run;
pub mod show;

//! # System Interaction Layer
//!
//! Abstractions over the filesystem and process management, kept apart from the
//! core engine so the engine can be tested without touching either.
//!
//! ## Modules
//!
//! - **`store`**: The `Store` and `FileReader` seams, with the JSON-file and
//!   filesystem implementations used at runtime.
//! - **`executor`**: Spawns the final command through the configured shell.

pub mod executor;
pub mod store;

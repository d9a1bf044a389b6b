//! Utility modules shared by the engine and the CLI.

pub mod exec;
pub mod mime;
pub mod path;

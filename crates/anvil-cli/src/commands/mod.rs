//! Subcommand handlers. Each module exposes a single `execute` entry point.

pub mod completions;
pub mod config;
pub mod init;
pub mod list;
pub mod new;

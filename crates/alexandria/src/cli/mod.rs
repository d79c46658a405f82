//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the
//! alexandria binary.

mod commands;
mod handlers;

pub use commands::{CacheCommands, Cli, Commands};
pub use handlers::handle_command;

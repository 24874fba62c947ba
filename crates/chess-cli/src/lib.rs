//! Library half of the `chess-cli` binary: configuration and subcommands.

pub mod commands;
pub mod config;

//! Command-line interface: argument parsing and the `evaluate` command.

pub mod commands;
pub mod parser;

pub use commands::execute;
pub use parser::Cli;

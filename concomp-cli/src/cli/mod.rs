//! Command-line interface orchestration.
//!
//! The single `run` command reads a graph in the plain-text format of
//! [`parse_graph`], computes its components with the requested back-end, and
//! renders them with [`render_summary`].

mod commands;
mod input;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, ModeArg, OutputFormat, RunCommand, render_summary,
    run_cli,
};
pub use input::{InputError, Slot, parse_graph};

#[cfg(test)]
mod tests;

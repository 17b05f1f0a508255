//! Command implementations and argument parsing for the concomp CLI.

use std::fs;
use std::io::{self, Read, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use concomp_core::{Components, ComponentsBuilder, ComponentsError, ExecutionMode};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::input::{InputError, parse_graph};

const STDIN_MARKER: &str = "-";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "concomp",
    about = "Compute connected components of an undirected graph."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Read a graph and print its connected components.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Graph file (`n m` followed by `m` vertex pairs); `-` or omitted reads
    /// stdin.
    pub input: Option<PathBuf>,

    /// Back-end executing the phases.
    #[arg(long, value_enum, default_value_t = ModeArg::Sequential)]
    pub mode: ModeArg,

    /// Worker threads (shared-memory) or ranks (distributed).
    #[arg(long, short = 'p', default_value_t = 1)]
    pub parallelism: usize,

    /// Abort when the run has not converged after this many iterations.
    #[arg(long)]
    pub max_iterations: Option<NonZeroUsize>,

    /// Output layout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

/// Command-line names of the execution modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Single-threaded reference run.
    Sequential,
    /// Rayon worker pool over a shared parent array.
    SharedMemory,
    /// In-process ranks synchronised by collectives.
    Distributed,
}

impl From<ModeArg> for ExecutionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Sequential => Self::Sequential,
            ModeArg::SharedMemory => Self::SharedMemory,
            ModeArg::Distributed => Self::Distributed,
        }
    }
}

/// How [`render_summary`] lays out the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Iteration and component counts, then one `vertex<TAB>parent` line per
    /// vertex.
    Table,
    /// One `representative: {members}` line per component.
    Components,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the input failed.
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        /// Path that triggered the failure; `-` for stdin.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The input was not a valid graph.
    #[error("failed to parse `{}`: {source}", path.display())]
    Input {
        /// Path whose contents were rejected; `-` for stdin.
        path: PathBuf,
        /// Parse failure.
        #[source]
        source: InputError,
    },
    /// The engine rejected the configuration or failed while running.
    #[error(transparent)]
    Core(#[from] ComponentsError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Where the graph was read from; `-` for stdin.
    pub input: PathBuf,
    /// Back-end that produced the result.
    pub mode: ExecutionMode,
    /// Layout requested for rendering.
    pub format: OutputFormat,
    /// Converged components.
    pub components: Components,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading, parsing, or execution fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use concomp_cli::cli::{Cli, Command, ModeArg, OutputFormat, RunCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "3 1\n2 1\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         input: Some(file.path().to_path_buf()),
///         mode: ModeArg::SharedMemory,
///         parallelism: 2,
///         max_iterations: None,
///         format: OutputFormat::Table,
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.components.parents(), &[0, 1, 1]);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(input = field::Empty, mode = field::Empty, parallelism = command.parallelism),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let mode = ExecutionMode::from(command.mode);
    let mut builder = ComponentsBuilder::new()
        .with_execution_mode(mode)
        .with_parallelism(command.parallelism);
    if let Some(limit) = command.max_iterations {
        builder = builder.with_max_iterations(limit);
    }
    let runner = builder.build()?;

    let path = command
        .input
        .unwrap_or_else(|| PathBuf::from(STDIN_MARKER));
    let span = Span::current();
    span.record("input", field::display(path.display()));
    span.record("mode", field::display(mode));

    let text = read_input(&path)?;
    let graph = parse_graph(&text).map_err(|source| CliError::Input {
        path: path.clone(),
        source,
    })?;
    let components = runner.run(graph)?;

    info!(
        vertices = components.vertex_count(),
        components = components.component_count(),
        iterations = components.iterations(),
        "command completed"
    );
    Ok(ExecutionSummary {
        input: path,
        mode,
        format: command.format,
        components,
    })
}

/// Reads the whole input, treating `-` as stdin.
pub(super) fn read_input(path: &Path) -> Result<String, CliError> {
    let wrap = |source: io::Error| CliError::Io {
        path: path.to_path_buf(),
        source,
    };
    if path.as_os_str() == STDIN_MARKER {
        let mut text = String::new();
        io::stdin().lock().read_to_string(&mut text).map_err(wrap)?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(wrap)
    }
}

/// Renders `summary` to `writer` in the layout it requests.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use concomp_cli::cli::{ExecutionSummary, OutputFormat, render_summary};
/// # use concomp_core::{ExecutionMode, Graph, run};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let graph = Graph::try_from_edges(4, [(0, 1), (2, 3)])?;
/// let summary = ExecutionSummary {
///     input: "-".into(),
///     mode: ExecutionMode::Sequential,
///     format: OutputFormat::Components,
///     components: run(graph, ExecutionMode::Sequential, 1)?,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "0: {0, 1}\n2: {2, 3}\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    let components = &summary.components;
    match summary.format {
        OutputFormat::Table => {
            writeln!(writer, "iterations: {}", components.iterations())?;
            writeln!(writer, "components: {}", components.component_count())?;
            for (vertex, parent) in components.parents().iter().enumerate() {
                writeln!(writer, "{vertex}\t{parent}")?;
            }
        }
        OutputFormat::Components => {
            for (representative, members) in components.groups() {
                let members: Vec<String> = members.iter().map(ToString::to_string).collect();
                writeln!(writer, "{representative}: {{{}}}", members.join(", "))?;
            }
        }
    }
    Ok(())
}

//! Unit tests for argument parsing, input parsing, and rendering.

use super::commands::{read_input, run_command};
use super::{
    Cli, CliError, Command, ExecutionSummary, InputError, ModeArg, OutputFormat, RunCommand, Slot,
    parse_graph, render_summary, run_cli,
};

use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::Parser;
use concomp_core::{
    ComponentsErrorCode, ExecutionMode, GraphError, InvalidEdgeReason,
};
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tracing_subscriber::layer::SubscriberExt;

use concomp_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const SCENARIO: &str = "10 6\n0 1\n1 2\n2 3\n5 6\n6 7\n8 9\n";

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

fn write_graph(dir: &TempDir, contents: &str) -> std::io::Result<PathBuf> {
    let path = dir.path().join("graph.txt");
    fs::write(&path, contents)?;
    Ok(path)
}

fn run_command_for(path: PathBuf, mode: ModeArg, parallelism: usize) -> RunCommand {
    RunCommand {
        input: Some(path),
        mode,
        parallelism,
        max_iterations: None,
        format: OutputFormat::Table,
    }
}

#[test]
fn parse_graph_accepts_any_whitespace_layout() {
    let graph = parse_graph("  5\t2 0 4\n\n3\r\n1 ").expect("input is valid");
    assert_eq!(graph.vertex_count(), 5);
    let pairs: Vec<_> = graph
        .edges()
        .iter()
        .map(|edge| (edge.source(), edge.target()))
        .collect();
    assert_eq!(pairs, vec![(0, 4), (3, 1)]);
}

#[test]
fn parse_graph_accepts_empty_graph() {
    let graph = parse_graph("0 0").expect("input is valid");
    assert!(graph.is_empty());
    assert_eq!(graph.edge_count(), 0);
}

#[rstest]
#[case::empty("", InputError::Truncated { slot: Slot::VertexCount })]
#[case::header_only("4", InputError::Truncated { slot: Slot::EdgeCount })]
#[case::missing_edge("4 2\n0 1\n", InputError::Truncated { slot: Slot::Endpoint { edge: 2 } })]
#[case::half_edge("4 1\n0", InputError::Truncated { slot: Slot::Endpoint { edge: 1 } })]
#[case::negative(
    "-4 0",
    InputError::InvalidNumber { slot: Slot::VertexCount, token: "-4".to_owned() }
)]
#[case::word(
    "4 1\n0 x",
    InputError::InvalidNumber { slot: Slot::Endpoint { edge: 1 }, token: "x".to_owned() }
)]
#[case::trailing(
    "4 1\n0 1 2",
    InputError::TrailingInput { token: "2".to_owned(), declared: 1 }
)]
fn parse_graph_rejects_malformed_input(#[case] text: &str, #[case] expected: InputError) {
    assert_eq!(parse_graph(text).expect_err("input is malformed"), expected);
}

#[rstest]
#[case::self_loop("4 2\n0 1\n2 2\n", 2, (2, 2), InvalidEdgeReason::SelfLoop)]
#[case::out_of_range("4 1\n0 4\n", 1, (0, 4), InvalidEdgeReason::OutOfRange)]
fn parse_graph_numbers_invalid_edges_from_one(
    #[case] text: &str,
    #[case] edge: usize,
    #[case] endpoints: (usize, usize),
    #[case] reason: InvalidEdgeReason,
) {
    let err = parse_graph(text).expect_err("edge is invalid");
    assert_eq!(
        err,
        InputError::InvalidEdge {
            edge,
            source: GraphError::InvalidEdge {
                left: endpoints.0,
                right: endpoints.1,
                vertex_count: 4,
                reason,
            },
        }
    );
    assert!(err.to_string().starts_with(&format!("edge {edge} is invalid")));
}

#[rstest]
#[case::sequential(ModeArg::Sequential, 1)]
#[case::shared_memory(ModeArg::SharedMemory, 3)]
#[case::distributed(ModeArg::Distributed, 4)]
fn run_cli_computes_components(
    temp_dir: TempDir,
    #[case] mode: ModeArg,
    #[case] parallelism: usize,
) -> TestResult {
    let path = write_graph(&temp_dir, SCENARIO)?;
    let cli = Cli {
        command: Command::Run(run_command_for(path.clone(), mode, parallelism)),
    };
    let summary = run_cli(cli)?;
    assert_eq!(summary.input, path);
    assert_eq!(summary.mode, ExecutionMode::from(mode));
    assert_eq!(
        summary.components.parents(),
        &[0, 0, 0, 0, 4, 5, 5, 5, 8, 8]
    );
    Ok(())
}

#[rstest]
fn run_reports_missing_file(temp_dir: TempDir) {
    let path = temp_dir.path().join("absent.txt");
    let err = run_command(run_command_for(path.clone(), ModeArg::Sequential, 1))
        .expect_err("missing file must fail");
    match err {
        CliError::Io { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn run_reports_parse_failures_with_path(temp_dir: TempDir) -> TestResult {
    let path = write_graph(&temp_dir, "3 1\n1 1\n")?;
    let err = run_command(run_command_for(path.clone(), ModeArg::Sequential, 1))
        .expect_err("self-loop must fail");
    assert!(matches!(
        &err,
        CliError::Input { path: reported, source: InputError::InvalidEdge { edge: 1, .. } }
            if reported == &path
    ));
    assert!(err.to_string().contains("graph.txt"));
    Ok(())
}

#[rstest]
fn run_rejects_zero_parallelism_before_reading(temp_dir: TempDir) {
    let path = temp_dir.path().join("never-read.txt");
    let err = run_command(run_command_for(path, ModeArg::SharedMemory, 0))
        .expect_err("zero parallelism must fail");
    match err {
        CliError::Core(core) => {
            assert_eq!(core.code(), ComponentsErrorCode::InvalidConfiguration);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
fn run_honours_iteration_cap(temp_dir: TempDir) -> TestResult {
    let path = write_graph(&temp_dir, "6 5\n0 1\n1 2\n2 3\n3 4\n4 5\n")?;
    let mut command = run_command_for(path, ModeArg::Distributed, 2);
    command.max_iterations = NonZeroUsize::new(1);
    let err = run_command(command).expect_err("one iteration cannot converge a path");
    match err {
        CliError::Core(core) => assert_eq!(core.code(), ComponentsErrorCode::IterationLimit),
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn read_input_wraps_io_errors() {
    let err = read_input(Path::new("/definitely/not/here.txt")).expect_err("path is missing");
    assert!(matches!(err, CliError::Io { .. }));
}

#[test]
fn cli_parses_full_argument_set() {
    let cli = Cli::try_parse_from([
        "concomp",
        "run",
        "graph.txt",
        "--mode",
        "shared-memory",
        "-p",
        "4",
        "--max-iterations",
        "9",
        "--format",
        "components",
    ])
    .expect("arguments are valid");
    let Command::Run(run) = cli.command;
    assert_eq!(run.input, Some(PathBuf::from("graph.txt")));
    assert_eq!(run.mode, ModeArg::SharedMemory);
    assert_eq!(run.parallelism, 4);
    assert_eq!(run.max_iterations, NonZeroUsize::new(9));
    assert_eq!(run.format, OutputFormat::Components);
}

#[test]
fn cli_defaults_to_sequential_table_on_stdin() {
    let cli = Cli::try_parse_from(["concomp", "run"]).expect("arguments are valid");
    let Command::Run(run) = cli.command;
    assert_eq!(run.input, None);
    assert_eq!(run.mode, ModeArg::Sequential);
    assert_eq!(run.parallelism, 1);
    assert_eq!(run.max_iterations, None);
    assert_eq!(run.format, OutputFormat::Table);
}

#[rstest]
#[case::unknown_mode(&["concomp", "run", "--mode", "gpu"])]
#[case::zero_cap(&["concomp", "run", "--max-iterations", "0"])]
#[case::negative_parallelism(&["concomp", "run", "-p", "-1"])]
fn cli_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

fn summary_for(text: &str, format: OutputFormat) -> ExecutionSummary {
    let graph = parse_graph(text).expect("input is valid");
    ExecutionSummary {
        input: PathBuf::from("-"),
        mode: ExecutionMode::Sequential,
        format,
        components: concomp_core::run(graph, ExecutionMode::Sequential, 1).expect("run succeeds"),
    }
}

#[test]
fn render_table_lists_every_vertex() -> TestResult {
    let summary = summary_for("4 2\n1 0\n3 2\n", OutputFormat::Table);
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    assert_eq!(
        String::from_utf8(buffer)?,
        "iterations: 2\ncomponents: 2\n0\t0\n1\t0\n2\t2\n3\t2\n"
    );
    Ok(())
}

#[test]
fn render_components_groups_members() -> TestResult {
    let summary = summary_for(SCENARIO, OutputFormat::Components);
    let mut buffer = Vec::new();
    render_summary(&summary, &mut buffer)?;
    assert_eq!(
        String::from_utf8(buffer)?,
        "0: {0, 1, 2, 3}\n4: {4}\n5: {5, 6, 7}\n8: {8, 9}\n"
    );
    Ok(())
}

#[rstest]
fn run_records_cli_spans(temp_dir: TempDir) -> TestResult {
    let path = write_graph(&temp_dir, SCENARIO)?;
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let cli = Cli {
        command: Command::Run(run_command_for(path.clone(), ModeArg::SharedMemory, 2)),
    };

    tracing::subscriber::with_default(subscriber, || run_cli(cli))?;

    let run_span = layer
        .spans_named("cli.run")
        .into_iter()
        .next()
        .expect("cli.run span must exist");
    assert_eq!(run_span.fields.get("command"), Some(&"run".to_owned()));

    let execute = layer
        .spans_named("cli.execute")
        .into_iter()
        .next()
        .expect("cli.execute span must exist");
    assert_eq!(
        execute.fields.get("input"),
        Some(&path.display().to_string())
    );
    assert_eq!(execute.fields.get("mode"), Some(&"shared-memory".to_owned()));
    assert_eq!(execute.fields.get("parallelism"), Some(&"2".to_owned()));

    assert_eq!(layer.spans_named("core.run").len(), 1);
    assert_eq!(layer.events_with_message("command completed").len(), 1);
    Ok(())
}

//! Dependency Graph Sorting Tool
//!
//! Loads a JSON graph snapshot and prints its topological order, or its DOT
//! form for visualization.
//!
//! ## Input
//!
//! ```json
//! { "nodes": ["core", "parser", "cli"], "targets": [[1], [2], []] }
//! ```
//!
//! `targets[i]` lists the indices node `i` has edges to. Pass `-` to read
//! the snapshot from stdin.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default: warn)
//! - `LOG_FORMAT`: "json" for structured logs, "pretty" for development (default: pretty)
//!
//! ## Usage
//!
//! ```bash
//! depgraph graph.json            # print the sort result, exit 1 on cycles
//! depgraph graph.json --precise  # report only nodes found on cycles
//! depgraph graph.json --dot      # print DOT text
//! ```

use std::io::Read;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use depgraph_kernel::{Graph, GraphError, SortConfig, GRAPH_SNAPSHOT_SCHEMA_VERSION};

/// Initialize the tracing subscriber with JSON or pretty format on stderr
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());

    if log_format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .flatten_event(true),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

struct Args {
    input: String,
    dot: bool,
    precise: bool,
}

fn parse_args() -> Option<Args> {
    let mut input = None;
    let mut dot = false;
    let mut precise = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--dot" => dot = true,
            "--precise" => precise = true,
            _ if input.is_none() => input = Some(arg),
            _ => return None,
        }
    }

    Some(Args { input: input?, dot, precise })
}

fn load_graph(input: &str) -> Result<Graph<String>, GraphError> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)?
    };
    Ok(serde_json::from_str(&text)?)
}

fn main() -> ExitCode {
    init_tracing();

    let Some(args) = parse_args() else {
        eprintln!("usage: depgraph <graph.json | -> [--dot] [--precise]");
        return ExitCode::from(2);
    };

    let graph = match load_graph(&args.input) {
        Ok(graph) => graph,
        Err(e) => {
            error!(input = %args.input, error = %e, "Failed to load graph snapshot");
            return ExitCode::from(2);
        }
    };

    info!(
        input = %args.input,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        schema = GRAPH_SNAPSHOT_SCHEMA_VERSION,
        "Graph snapshot loaded"
    );

    if args.dot {
        print!("{}", graph.format_dot(|n| n.clone()));
        return ExitCode::SUCCESS;
    }

    let config = if args.precise {
        SortConfig::precise()
    } else {
        SortConfig::default()
    };
    let sorted = graph.topological_sort_with(&config);
    println!("{sorted}");

    if sorted.is_valid() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

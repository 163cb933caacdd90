//! # Roadgraph CLI
//!
//! Command-line interface for the roadgraph library.
//! Imports a road network and runs shortest-path, picking and connectivity queries.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::{error, info};
use roadgraph::{DisplayScale, EngineConfig, GraphSession, PathSuccess};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod cli;

/// Command-line interface for roadgraph
#[derive(Parser)]
#[command(name = "roadgraph")]
#[command(about = "Shortest paths on OpenStreetMap extracts and POLY edge lists")]
#[command(long_about = "Builds a road graph from an .osm/.xml or .poly file and queries it:
  roadgraph stats monaco.osm                      # Graph summary
  roadgraph route monaco.osm --from 0 --to 120    # Dijkstra shortest path
  roadgraph route grid.poly --from 0 --to 8 --remove 4,5 --json
  roadgraph route points.poly --from 0 --to 3 --triangulate
  roadgraph pick monaco.osm --x 640 --y 410       # Node under a canvas point
  roadgraph check monaco.osm                      # Connectivity report

Exit status is 1 when a route or connectivity check fails.")]
#[command(version = env!("ROADGRAPH_VERSION"))]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print node, way and arc counts
    Stats {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Compute the shortest path between two node indices
    Route {
        input: PathBuf,
        #[arg(long)]
        from: usize,
        #[arg(long)]
        to: usize,
        /// Remove the way between two nodes before routing, e.g. `--remove 3,7`
        #[arg(long = "remove", value_parser = parse_pair)]
        remove: Vec<(usize, usize)>,
        /// Replace all ways with a Delaunay triangulation of the nodes
        #[arg(long)]
        triangulate: bool,
        #[arg(long)]
        json: bool,
    },
    /// Find the node selected by a click at a canvas point
    Pick {
        input: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        /// Rendered size over canvas size
        #[arg(long, default_value_t = 1.0)]
        display_scale: f64,
    },
    /// Report whether the graph is a single connected component
    Check { input: PathBuf },
}

/// Parse `A,B` into a node index pair
fn parse_pair(value: &str) -> std::result::Result<(usize, usize), String> {
    let (a, b) = value
        .split_once(',')
        .ok_or_else(|| format!("expected two node indices as A,B, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid node index '{part}': {e}"))
    };
    Ok((parse(a)?, parse(b)?))
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            error!("❌ Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging to stderr
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();

    if cli.verbose {
        eprintln!("🗺️  Roadgraph v{} starting...", env!("ROADGRAPH_VERSION"));
    }

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Command::Stats { input, json } => {
            let session = load_session(&config, &input)?;
            let stats = session.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", cli::report::render_stats(&stats));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Route {
            input,
            from,
            to,
            remove,
            triangulate,
            json,
        } => {
            let mut session = load_session(&config, &input)?;

            for (a, b) in remove {
                session
                    .remove_edge(a, b)
                    .with_context(|| format!("cannot remove edge {a}-{b}"))?;
            }
            if triangulate {
                let stats = session
                    .synthesize_edges()
                    .context("cannot triangulate graph")?;
                info!("Triangulated: {} ways, {} arcs", stats.ways, stats.arcs);
            }

            let result = session.shortest_path(from, to);
            if json {
                println!("{}", serde_json::to_string_pretty(&route_json(&result))?);
            } else {
                print!("{}", cli::report::render_route(&session.snapshot(), &result));
            }
            Ok(exit_code(result.is_ok()))
        }
        Command::Pick {
            input,
            x,
            y,
            display_scale,
        } => {
            if !display_scale.is_finite() || display_scale <= 0.0 {
                bail!("--display-scale must be a positive number, got {display_scale}");
            }
            let session = load_session(&config, &input)?;
            let snapshot = session.snapshot();

            match session.pick(x, y, DisplayScale::uniform(display_scale)) {
                Some(index) => {
                    println!("Selected {}", cli::report::describe_node(&snapshot, index));
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    println!("No node within the pick radius of ({x}, {y})");
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        Command::Check { input } => {
            let session = load_session(&config, &input)?;
            match session.check_connectivity() {
                Ok(_) => {
                    println!("✅ Graph is connected");
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    print!("{}", cli::report::render_path_error(&err));
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

/// Import with a spinner on stderr
fn load_session(config: &EngineConfig, input: &Path) -> Result<GraphSession> {
    let mut session = GraphSession::new(config.clone())?;
    let progress = cli::ProgressManager::new(&format!("📂 Importing {}", input.display()));

    match session.load_file(input) {
        Ok(stats) => {
            progress.finish(format!(
                "✅ Imported {} nodes, {} ways",
                stats.nodes, stats.ways
            ));
            Ok(session)
        }
        Err(e) => {
            progress.fail();
            Err(e).with_context(|| format!("failed to import {}", input.display()))
        }
    }
}

fn route_json(
    result: &std::result::Result<PathSuccess, roadgraph::PathError>,
) -> serde_json::Value {
    match result {
        Ok(route) => serde_json::json!({ "success": true, "result": route }),
        Err(err) => serde_json::json!({ "success": false, "error": err }),
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

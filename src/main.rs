//! `dcmst` command-line interface.
//!
//! - `dcmst solve <instance.json>`: build and solve the MTZ model
//! - `dcmst check <instance.json>`: validate an instance without solving
//!
//! Exit codes: 0 tree found, 1 error, 2 no solution, 3 backend unavailable.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use dcmst_mtz::instance::Instance;
use dcmst_mtz::validate::validate_instance;
use dcmst_mtz::{DegreeRule, RootSelection, SolveOutcome, SolverConfig, solve_with_mtz};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "dcmst", version, about = "Degree-constrained minimum spanning trees via MTZ")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve an instance
    Solve(SolveArgs),
    /// Validate an instance without solving it
    Check {
        instance: PathBuf,
        #[arg(long)]
        root: Option<u32>,
    },
}

#[derive(Args, Debug)]
struct SolveArgs {
    instance: PathBuf,
    #[arg(long, help = "JSON solver configuration")]
    config: Option<PathBuf>,
    #[arg(long)]
    backend: Option<String>,
    #[arg(long, help = "Time limit in seconds")]
    time_limit: Option<f64>,
    #[arg(long, help = "Root vertex of the labeling (default: smallest vertex)")]
    root: Option<u32>,
    #[arg(long, value_enum)]
    degree_rule: Option<DegreeRuleArg>,
    #[arg(long, default_value_t = false, help = "Drop the one-parent-per-vertex constraints")]
    no_single_parent: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DegreeRuleArg {
    Total,
    InAndOut,
}

impl From<DegreeRuleArg> for DegreeRule {
    fn from(arg: DegreeRuleArg) -> Self {
        match arg {
            DegreeRuleArg::Total => DegreeRule::Total,
            DegreeRuleArg::InAndOut => DegreeRule::InAndOut,
        }
    }
}

const EXIT_NO_SOLUTION: u8 = 2;
const EXIT_BACKEND_UNAVAILABLE: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Solve(args) => run_solve(args, cli.json),
        Commands::Check { instance, root } => run_check(instance, root, cli.json),
    };
    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_instance(path: &Path) -> Result<Instance> {
    Instance::from_json_file(path).with_context(|| format!("failed to read instance {}", path.display()))
}

fn root_selection(root: Option<u32>) -> RootSelection {
    root.map_or(RootSelection::Auto, RootSelection::Vertex)
}

fn solver_config(args: &SolveArgs) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::from_json_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => SolverConfig::default(),
    };
    if let Some(backend) = &args.backend {
        config.backend = backend.clone();
    }
    if let Some(secs) = args.time_limit {
        config.time_limit_secs = secs;
    }
    if args.root.is_some() {
        config.root = root_selection(args.root);
    }
    if let Some(rule) = args.degree_rule {
        config.degree_rule = rule.into();
    }
    if args.no_single_parent {
        config.single_parent = false;
    }
    config.validate()?;
    Ok(config)
}

fn run_solve(args: SolveArgs, as_json: bool) -> Result<ExitCode> {
    let config = solver_config(&args)?;
    let instance = load_instance(&args.instance)?;
    let graph = instance.graph();

    let outcome = solve_with_mtz(&graph, &instance.centers, &config).context("solve failed")?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&outcome_report(&outcome))?);
    } else {
        println!("{}", outcome.status_message());
        if let Some(elapsed) = outcome.elapsed() {
            println!("elapsed: {:.3}s", elapsed.as_secs_f64());
        }
        if let Some(tree) = outcome.tree() {
            println!("objective: {}", tree.objective);
            println!("root: {}", tree.root);
            for (u, v, w) in tree.edges() {
                println!("  {u} - {v} ({w})");
            }
        }
    }

    Ok(match outcome {
        SolveOutcome::Optimal(_) | SolveOutcome::Feasible(_) => ExitCode::SUCCESS,
        SolveOutcome::NoSolution { .. } => ExitCode::from(EXIT_NO_SOLUTION),
        SolveOutcome::BackendUnavailable { .. } => ExitCode::from(EXIT_BACKEND_UNAVAILABLE),
    })
}

fn outcome_report(outcome: &SolveOutcome) -> serde_json::Value {
    let mut report = json!({
        "outcome": outcome.kind(),
        "message": outcome.status_message(),
        "elapsed_secs": outcome.elapsed().map(|d| d.as_secs_f64()),
    });
    match outcome {
        SolveOutcome::Optimal(tree) | SolveOutcome::Feasible(tree) => {
            report["status"] = json!(tree.status);
            report["objective"] = json!(tree.objective);
            report["root"] = json!(tree.root);
            report["edges"] = tree
                .edges()
                .iter()
                .map(|&(u, v, weight)| json!({ "u": u, "v": v, "weight": weight }))
                .collect();
            report["degrees"] = json!(tree.degrees());
            report["labels"] = json!(tree.labels);
        }
        SolveOutcome::NoSolution { status, .. } => report["status"] = json!(status),
        SolveOutcome::BackendUnavailable { backend } => report["backend"] = json!(backend),
    }
    report
}

fn run_check(path: PathBuf, root: Option<u32>, as_json: bool) -> Result<ExitCode> {
    let instance = load_instance(&path)?;
    let graph = instance.graph();
    let root = validate_instance(&graph, &instance.centers, root_selection(root))
        .with_context(|| format!("invalid instance {}", path.display()))?;

    if as_json {
        let report = json!({
            "valid": true,
            "vertices": graph.num_vertices(),
            "edges": graph.num_edges(),
            "centers": instance.centers.len(),
            "root": root,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "instance valid: {} vertices, {} edges, {} centers, root {root}",
            graph.num_vertices(),
            graph.num_edges(),
            instance.centers.len()
        );
    }
    Ok(ExitCode::SUCCESS)
}

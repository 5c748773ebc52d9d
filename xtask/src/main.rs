use anyhow::{bail, Context, Result};
use brandes_batch::{compute_betweenness, Adjacency, BcConfig, CostReport, Schedule, Sources};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_NODES: usize = 10_000_000;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "brandes-batch workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the criterion benchmarks and summarize them
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
    /// Run one betweenness computation and print its cost report as JSON
    BcReport {
        /// Whitespace-separated edge list, one `from to` pair per line
        #[arg(long)]
        edges: Option<PathBuf>,

        /// Node count of the generated graph (ignored with --edges)
        #[arg(long, default_value_t = 10_000)]
        nodes: usize,

        /// Out-degree of the generated graph (ignored with --edges)
        #[arg(long, default_value_t = 8)]
        degree: usize,

        /// Number of sources, spread evenly over the nodes; 0 means all
        #[arg(long, default_value_t = 64)]
        sources: usize,

        /// Push/pull policy, overriding the config file
        #[arg(long, value_enum)]
        schedule: Option<ScheduleArg>,

        /// JSON file with a `BcConfig`
        #[arg(long)]
        config: Option<PathBuf>,

        /// Compute in single precision
        #[arg(long, default_value_t = false)]
        single: bool,

        /// How many of the highest-scoring nodes to list
        #[arg(long, default_value_t = 10)]
        top: usize,

        /// Largest node count accepted from --edges or --nodes
        #[arg(long, default_value_t = DEFAULT_MAX_NODES)]
        max_nodes: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ScheduleArg {
    Push,
    Pull,
    Compare,
    Heuristic,
}

impl From<ScheduleArg> for Schedule {
    fn from(arg: ScheduleArg) -> Self {
        match arg {
            ScheduleArg::Push => Schedule::Push,
            ScheduleArg::Pull => Schedule::Pull,
            ScheduleArg::Compare => Schedule::Compare,
            ScheduleArg::Heuristic => Schedule::Heuristic,
        }
    }
}

#[derive(Serialize)]
struct RunSummary {
    nodes: usize,
    edges: usize,
    self_loops: usize,
    sources: usize,
    depth: usize,
    top: Vec<(usize, f64)>,
    report: CostReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
        Commands::BcReport {
            edges,
            nodes,
            degree,
            sources,
            schedule,
            config,
            single,
            top,
            max_nodes,
        } => {
            let mut bc_config = match config {
                Some(path) => load_config(&path)?,
                None => BcConfig::default(),
            };
            if let Some(schedule) = schedule {
                bc_config.schedule = schedule.into();
            }
            let graph = match edges {
                Some(path) => load_edges(&path, max_nodes)?,
                None => generated_graph(nodes, degree, max_nodes)?,
            };
            let summary = bc_report(&graph, sources, &bc_config, single, top)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<BcConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: BcConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn load_edges(path: &Path, max_nodes: usize) -> Result<Adjacency> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read edge list {}", path.display()))?;
    let (nodes, edges) = parse_edges(&text, max_nodes)
        .with_context(|| format!("Failed to parse edge list {}", path.display()))?;
    info!(nodes, edges = edges.len(), path = %path.display(), "edge list loaded");
    Ok(Adjacency::from_edges(nodes, &edges)?)
}

/// Parses `from to` lines into the node count they imply and the edge list.
fn parse_edges(text: &str, max_nodes: usize) -> Result<(usize, Vec<(usize, usize)>)> {
    let mut edges = Vec::new();
    let mut nodes = 0;
    for (lineno, line) in text.lines().enumerate() {
        let lineno = lineno + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('%') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(from), Some(to)) = (fields.next(), fields.next()) else {
            bail!("line {lineno}: expected `from to`");
        };
        let from: usize = from.parse().with_context(|| format!("line {lineno}"))?;
        let to: usize = to.parse().with_context(|| format!("line {lineno}"))?;
        let highest = from.max(to);
        let needed = highest
            .checked_add(1)
            .with_context(|| format!("line {lineno}: node {highest} overflows the node count"))?;
        if needed > max_nodes {
            bail!("line {lineno}: node {highest} is beyond --max-nodes {max_nodes}");
        }
        nodes = nodes.max(needed);
        edges.push((from, to));
    }
    Ok((nodes, edges))
}

fn generated_graph(nodes: usize, degree: usize, max_nodes: usize) -> Result<Adjacency> {
    if nodes == 0 {
        bail!("--nodes must be positive");
    }
    if nodes > max_nodes {
        bail!("--nodes {nodes} is beyond --max-nodes {max_nodes}");
    }
    let total = nodes
        .checked_mul(degree)
        .context("--nodes times --degree overflows")?;
    let mut edges = Vec::with_capacity(total);
    for i in 0..nodes {
        for j in 1..=degree {
            edges.push((i, (i + j * j * 7 + j) % nodes));
        }
    }
    Ok(Adjacency::from_edges(nodes, &edges)?)
}

fn bc_report(
    graph: &Adjacency,
    sources: usize,
    config: &BcConfig,
    single: bool,
    top: usize,
) -> Result<RunSummary> {
    let n = graph.node_count();
    let picked: Vec<usize> = if sources == 0 || sources >= n {
        (0..n).collect()
    } else {
        let stride = n / sources;
        (0..sources).map(|i| i * stride).collect()
    };

    let start = Instant::now();
    let (centrality, depth, report) = if single {
        let run = compute_betweenness::<f32>(graph, Sources::Nodes(&picked), config)?;
        let scores = run.centrality.into_iter().map(f64::from).collect::<Vec<_>>();
        (scores, run.depth, run.report)
    } else {
        let run = compute_betweenness::<f64>(graph, Sources::Nodes(&picked), config)?;
        (run.centrality, run.depth, run.report)
    };
    info!(elapsed = ?start.elapsed(), depth, "betweenness finished");

    let mut ranked: Vec<(usize, f64)> = centrality.into_iter().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(top);

    Ok(RunSummary {
        nodes: n,
        edges: graph.edge_count(),
        self_loops: graph.self_loop_count(),
        sources: picked.len(),
        depth,
        top: ranked,
        report,
    })
}

fn run_benchmarks(quick: bool) -> Result<()> {
    info!("compiling benchmarks");
    let status = Command::new("cargo")
        .args(["build", "--bench", "betweenness_benchmark", "--release"])
        .status()?;
    if !status.success() {
        bail!("Failed to compile benchmarks");
    }

    for features in [None, Some("parallel")] {
        let baseline = features.unwrap_or("sequential");
        info!(baseline, "benchmarking");
        let start = Instant::now();

        let mut cmd = Command::new("cargo");
        cmd.arg("bench").arg("--bench").arg("betweenness_benchmark");
        if let Some(features) = features {
            cmd.arg("--features").arg(features);
        }

        // Args for the test runner (Criterion) go after --
        cmd.arg("--");
        cmd.arg("--save-baseline").arg(baseline);
        if quick {
            cmd.arg("--measurement-time").arg("0.1");
            cmd.arg("--noplot");
            cmd.arg("--sample-size").arg("10");
        }

        let status = cmd
            .status()
            .with_context(|| format!("Failed to run bench for {baseline}"))?;
        if status.success() {
            info!(baseline, elapsed = ?start.elapsed(), "finished");
        } else {
            tracing::warn!(baseline, "benchmark failed");
        }
    }

    Ok(())
}

fn generate_report() -> Result<()> {
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        tracing::warn!(dir = %criterion_dir.display(), "no criterion output found");
        return Ok(());
    }

    // workload -> baseline -> mean nanoseconds
    let mut results: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    collect_results(criterion_dir, criterion_dir, &mut results);

    let baselines: Vec<String> = {
        let mut all: Vec<String> = results.values().flat_map(|m| m.keys().cloned()).collect();
        all.sort();
        all.dedup();
        all
    };

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }

    use std::fmt::Write as _;
    let mut out = String::new();
    writeln!(out, "# Betweenness Benchmark Report\n")?;
    write!(out, "| Workload |")?;
    for baseline in &baselines {
        write!(out, " {baseline} |")?;
    }
    writeln!(out)?;
    write!(out, "|---|")?;
    for _ in &baselines {
        write!(out, "---|")?;
    }
    writeln!(out)?;

    for (workload, times) in &results {
        write!(out, "| {workload} |")?;
        for baseline in &baselines {
            match times.get(baseline) {
                Some(ns) if *ns > 1e6 => write!(out, " {:.2} ms |", ns / 1e6)?,
                Some(ns) => write!(out, " {:.1} µs |", ns / 1e3)?,
                None => write!(out, " N/A |")?,
            }
        }
        writeln!(out)?;
    }

    fs::write(report_path, out)?;
    info!(path = %report_path.display(), "report written");
    Ok(())
}

fn collect_results(root: &Path, dir: &Path, results: &mut BTreeMap<String, BTreeMap<String, f64>>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(root, &path, results);
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        // Structure: <root>/<group>/<parameter>/<baseline>/estimates.json
        let Some(baseline_dir) = path.parent() else {
            continue;
        };
        let Some(workload_dir) = baseline_dir.parent() else {
            continue;
        };
        let Some(baseline) = baseline_dir.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if baseline == "report" || baseline == "new" || baseline == "base" || baseline == "change" {
            continue;
        }
        let Ok(workload) = workload_dir.strip_prefix(root) else {
            continue;
        };

        let mean = fs::read_to_string(&path)
            .ok()
            .and_then(|content| serde_json::from_str::<serde_json::Value>(&content).ok())
            .and_then(|json| json.get("mean")?.get("point_estimate")?.as_f64());
        if let Some(ns) = mean.filter(|ns| *ns > 0.0) {
            results
                .entry(workload.display().to_string())
                .or_default()
                .insert(baseline.to_string(), ns);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_edges_skips_comments_and_counts_nodes() {
        let text = "% matrix market style header\n# comment\n\n0 1\n  3 2  \n1 1\n";
        let (nodes, edges) = parse_edges(text, DEFAULT_MAX_NODES).unwrap();
        assert_eq!(nodes, 4);
        assert_eq!(edges, vec![(0, 1), (3, 2), (1, 1)]);
    }

    #[test]
    fn parse_edges_rejects_index_at_usize_max() {
        let text = format!("0 1\n{} 0\n", usize::MAX);
        let err = parse_edges(&text, usize::MAX).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
        assert!(err.to_string().contains("overflows"), "{err}");
    }

    #[test]
    fn parse_edges_rejects_index_beyond_limit() {
        let err = parse_edges("0 1\n2 99\n", 50).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{err}");
        assert!(err.to_string().contains("--max-nodes 50"), "{err}");

        // The highest index must still fit: 49 needs exactly 50 nodes.
        let (nodes, _) = parse_edges("49 0\n", 50).unwrap();
        assert_eq!(nodes, 50);
    }

    #[test]
    fn parse_edges_rejects_malformed_lines() {
        assert!(parse_edges("0\n", 10).is_err());
        assert!(parse_edges("0 x\n", 10).is_err());
        assert!(parse_edges("-1 0\n", 10).is_err());
    }

    #[test]
    fn generated_graph_respects_limits() {
        assert!(generated_graph(0, 2, 10).is_err());
        assert!(generated_graph(11, 2, 10).is_err());
        assert!(generated_graph(usize::MAX, 2, usize::MAX).is_err());

        let g = generated_graph(10, 2, 10).unwrap();
        assert_eq!(g.node_count(), 10);
    }
}

//! Domainrank CLI: rank a crawled link graph from the command line
//!
//! Reads a dot-style edge file, runs the partitioned (or the whole-graph)
//! computation and prints the top entries. Diagnostics go to stderr; stdout
//! only carries the report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table};
use domainrank::{
    format_pairs, read_edge_file, ConflictPolicy, DomainPartitioner, Edge, MergeScope, Pipeline,
    RankConfig, RankRun, RankedUrl, Score,
};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "domainrank", version, about = "Domain-partitioned PageRank")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "DOMAINRANK_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Table,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Partition by domain, rank in parallel, merge and refine
    Distributed,
    /// Rank the whole graph in one pass
    Sequential,
}

#[derive(clap::Args)]
struct Overrides {
    /// Damping factor
    #[arg(long)]
    damping: Option<Score>,

    /// Convergence threshold on the L1 distance
    #[arg(long)]
    epsilon: Option<Score>,

    /// Iteration cap per engine run
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Time budget per partition, in milliseconds
    #[arg(long)]
    partition_timeout_ms: Option<u64>,

    /// Worker threads
    #[arg(long)]
    threads: Option<usize>,

    /// Label the domain key sits in front of
    #[arg(long)]
    root_label: Option<String>,

    /// Keep cross-domain links when merging partitions
    #[arg(long)]
    cross_domain: bool,

    /// Fail when two partitions own the same node
    #[arg(long)]
    reject_conflicts: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a link file and print the top entries
    Rank {
        /// Dot-style edge file
        file: PathBuf,

        #[arg(long, default_value = "distributed")]
        mode: Mode,

        /// Number of entries to print (defaults to the configured top_k)
        #[arg(long)]
        top: Option<usize>,

        /// Print the best entry of every domain instead
        #[arg(long)]
        per_domain: bool,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// List the domain partitions of a link file
    Domains {
        file: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },
    /// Rank both ways and report how far apart the results are
    Compare {
        file: PathBuf,

        #[command(flatten)]
        overrides: Overrides,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Rank {
            file,
            mode,
            top,
            per_domain,
            overrides,
        } => load_config(cli.config.as_deref(), overrides)
            .and_then(|config| run_rank(config, file, *mode, *top, *per_domain, cli.format)),
        Commands::Domains { file, overrides } => {
            load_config(cli.config.as_deref(), overrides).and_then(|config| run_domains(config, file, cli.format))
        }
        Commands::Compare { file, overrides } => {
            load_config(cli.config.as_deref(), overrides).and_then(|config| run_compare(config, file, cli.format))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<RankConfig> {
    let mut config = match path {
        Some(path) => RankConfig::from_file(path)?,
        None => RankConfig::default(),
    };

    if let Some(damping) = overrides.damping {
        config.damping_factor = damping;
    }
    if let Some(epsilon) = overrides.epsilon {
        config.tolerance = epsilon;
    }
    if let Some(max_iterations) = overrides.max_iterations {
        config.max_iterations = max_iterations;
    }
    if overrides.partition_timeout_ms.is_some() {
        config.partition_time_budget_ms = overrides.partition_timeout_ms;
    }
    if overrides.threads.is_some() {
        config.threads = overrides.threads;
    }
    if let Some(label) = &overrides.root_label {
        config.root_label = label.clone();
    }
    if overrides.cross_domain {
        config.merge_scope = MergeScope::CrossDomain;
    }
    if overrides.reject_conflicts {
        config.conflict_policy = ConflictPolicy::Reject;
    }

    config.validate()?;
    Ok(config)
}

fn read(file: &Path) -> Result<Vec<Edge>> {
    let edges = read_edge_file(file)?;
    tracing::info!("Loaded {} links from {}", edges.len(), file.display());
    Ok(edges)
}

fn rank(pipeline: &Pipeline, edges: &[Edge], mode: Mode) -> Result<RankRun> {
    let run = match mode {
        Mode::Distributed => pipeline.run(edges),
        Mode::Sequential => pipeline.run_sequential(edges),
    };
    run.context("ranking failed")
}

fn run_rank(
    config: RankConfig,
    file: &Path,
    mode: Mode,
    top: Option<usize>,
    per_domain: bool,
    format: OutputFormat,
) -> Result<()> {
    let k = top.unwrap_or(config.top_k);
    let pipeline = Pipeline::new(config)?;
    let edges = read(file)?;
    let run = rank(&pipeline, &edges, mode)?;

    if !run.is_converged() {
        eprintln!("warning: global pass did not converge ({:?})", run.global.status);
    }

    if per_domain {
        let leaders = pipeline.leaders(&run);
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&leaders)?),
            OutputFormat::Table => {
                let mut table = Table::new();
                table.set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(vec!["domain", "url", "score"]);
                for leader in &leaders {
                    table.add_row(vec![
                        display_domain(&leader.domain),
                        leader.leader.url.to_string(),
                        format!("{:.6}", leader.leader.score),
                    ]);
                }
                println!("{}", table);
            }
            OutputFormat::Text => {
                for leader in &leaders {
                    println!(
                        "{}:\t{}",
                        display_domain(&leader.domain),
                        format_pairs(std::slice::from_ref(&leader.leader))
                    );
                }
            }
        }
        return Ok(());
    }

    let top = run.top_k(k);
    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "global": run.global,
                "partitions": run.partitions,
                "top": top,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table => println!("{}", ranked_table(&top)),
        OutputFormat::Text => println!("{}", format_pairs(&top)),
    }

    Ok(())
}

fn run_domains(config: RankConfig, file: &Path, format: OutputFormat) -> Result<()> {
    let partitioner = DomainPartitioner::new(config.domain_extractor());
    let edges = read(file)?;
    let partitions = partitioner.partition(&edges);

    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = partitions
                .iter()
                .map(|p| {
                    serde_json::json!({
                        "domain": p.domain(),
                        "nodes": p.node_count(),
                        "links": p.edge_count(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        _ => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["domain", "nodes", "links"]);
            for partition in &partitions {
                table.add_row(vec![
                    display_domain(partition.domain()),
                    partition.node_count().to_string(),
                    partition.edge_count().to_string(),
                ]);
            }
            println!("{}", table);
            println!("{} partition(s)", partitions.len());
        }
    }

    Ok(())
}

fn run_compare(config: RankConfig, file: &Path, format: OutputFormat) -> Result<()> {
    let pipeline = Pipeline::new(config)?;
    let edges = read(file)?;

    let sequential = rank(&pipeline, &edges, Mode::Sequential)?;
    let distributed = rank(&pipeline, &edges, Mode::Distributed)?;

    let mut l1: Score = 0.0;
    let mut max: Score = 0.0;
    let mut missing = 0usize;
    for (url, &expected) in sequential.graph.ranks() {
        let actual = distributed.graph.rank(url).unwrap_or_else(|| {
            missing += 1;
            0.0
        });
        let diff = (expected - actual).abs();
        l1 += diff;
        max = max.max(diff);
    }

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "nodes": sequential.graph.node_count(),
                "missing_in_distributed": missing,
                "l1_distance": l1,
                "max_difference": max,
                "sequential": sequential.global,
                "distributed": distributed.global,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        _ => {
            println!("Nodes:                   {}", sequential.graph.node_count());
            println!("Missing in distributed:  {}", missing);
            println!("L1 distance:             {:.6}", l1);
            println!("Max difference:          {:.6}", max);
            println!("Sequential iterations:   {}", sequential.global.status.iterations());
            println!("Refinement iterations:   {}", distributed.global.status.iterations());
        }
    }

    Ok(())
}

fn ranked_table(entries: &[RankedUrl]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "url", "score"]);
    for (i, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            entry.url.to_string(),
            format!("{:.6}", entry.score),
        ]);
    }
    table
}

fn display_domain(domain: &str) -> String {
    if domain.is_empty() {
        "(root)".to_string()
    } else {
        domain.to_string()
    }
}

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sccdag::algorithms::analysis::{analyze, AnalysisOptions};
use sccdag::algorithms::condensation::{build_condensation, CondensationWeight};
use sccdag::algorithms::path::{dag_paths, PathKind};
use sccdag::algorithms::scc::{SCCResult, SCC};
use sccdag::algorithms::topo::topological_sort;
use sccdag::config::RunConfig;
use sccdag::generator::generate_all;
use sccdag::types::graph_json::load_document;
use sccdag::types::Graph;
use sccdag::util::{format_distance, format_named_path, format_path, path_weight};

#[derive(Parser, Debug, Serialize)]
#[command(author, version, about)]
struct Args {
    /// Path of the JSON graph description.
    #[arg(short, long)]
    dataset: Option<String>,

    /// The task to be performed: scc, condense, topo, shortest, longest, all or generate.
    #[arg(short, long, default_value_t = String::from("all"))]
    task: String,

    /// Source vertex id.
    #[arg(short, long)]
    source_vertex: Option<usize>,

    /// Target vertex id whose path is printed.
    #[arg(short = 'g', long)]
    target_vertex: Option<usize>,

    /// YAML run configuration; flags override its values.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Weight policy for merged condensation edges: first, min, max or sum.
    #[arg(short, long)]
    weight: Option<CondensationWeight>,

    /// Output directory of the generate task.
    #[arg(short, long)]
    output_dir: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("SCCDAG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "sccdag=debug,info"
        } else {
            "sccdag=info,warn"
        })
    });

    let format = env::var("SCCDAG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr)).init();
        }
        _ => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
        }
    }
}

/// The graph the DAG-only tasks run on.
///
/// For a cyclic input this is the condensation and `scc` maps original
/// vertices onto its vertices.
struct DagView {
    dag: Graph,
    scc: Option<SCCResult>,
}

impl DagView {
    fn build(graph: &Graph, weight: CondensationWeight) -> anyhow::Result<Self> {
        let scc = graph.scc();
        let acyclic = (0..scc.len()).all(|c| !scc.is_cyclic(c));
        if acyclic && graph.is_directed() {
            return Ok(DagView { dag: graph.clone(), scc: None });
        }

        warn!(components = scc.len(), "input is cyclic, running on the condensation");
        let condensation = build_condensation(graph, &scc, weight)?;
        Ok(DagView { dag: condensation.dag, scc: Some(scc) })
    }

    /// DAG vertex standing for original vertex `v`.
    fn map(&self, v: usize) -> Option<usize> {
        match &self.scc {
            Some(scc) => scc.component_of_vertex(v),
            None => (v < self.dag.size()).then_some(v),
        }
    }

    fn describe(&self, path: &[usize]) -> String {
        match self.scc {
            Some(_) => format!("components {}", format_path(path)),
            None => format_named_path(&self.dag, path),
        }
    }
}

fn run_paths(view: &DagView, kind: PathKind, source: usize, target: Option<usize>) -> anyhow::Result<()> {
    let mapped_source = view
        .map(source)
        .with_context(|| format!("source vertex {} is not in the graph", source))?;
    let order = topological_sort(&view.dag)?;
    let result = dag_paths(&view.dag, order.order(), mapped_source, kind)?;

    print!("{}", result);
    println!("{}", result.metrics);

    if let Some(target) = target {
        let mapped_target = view
            .map(target)
            .with_context(|| format!("target vertex {} is not in the graph", target))?;
        println!(
            "Distance {} -> {}: {}",
            source,
            target,
            format_distance(result.distance_to(mapped_target))
        );
        if let Some(path) = result.path_to(mapped_target) {
            println!("Path: {}", view.describe(&path));
            if let Some(total) = path_weight(&view.dag, &path, kind) {
                println!("Path weight: {}", total);
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Args = Args::parse();

    // Step 1: Resolve the run configuration, flags over file values.
    let mut config = match &args.config {
        Some(path) => RunConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => RunConfig::default(),
    };
    if args.dataset.is_some() {
        config.dataset = args.dataset.clone();
    }
    if let Some(target) = args.target_vertex {
        config.target_vertex = Some(target);
    }
    if let Some(weight) = args.weight {
        config.condensation_weight = weight;
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    let task = args.task.as_str();

    if task == "generate" {
        let written = generate_all(&config.output_dir, config.seed)
            .with_context(|| format!("failed to generate datasets into {}", config.output_dir))?;
        for path in &written {
            println!("{}", path.display());
        }
        return Ok(());
    }

    // Step 2: Load the graph.
    let Some(dataset) = config.dataset.clone() else {
        bail!("no dataset given; pass --dataset or set it in the config file");
    };
    let document = load_document(&dataset).with_context(|| format!("failed to load {}", dataset))?;
    let graph = document
        .to_graph()
        .with_context(|| format!("invalid graph in {}", dataset))?;

    // The file's source applies only when neither flag nor config names one.
    let source = match (args.source_vertex, &args.config) {
        (Some(source), _) => source,
        (None, Some(_)) => config.source_vertex,
        (None, None) => document.source,
    };
    info!(
        dataset = %dataset,
        vertices = graph.size(),
        edges = graph.edge_count(),
        source,
        "graph loaded"
    );

    // Step 3. Perform the task and report results.
    if task == "scc" {
        let scc = graph.scc();
        print!("{}", scc);
        println!("{}", scc.metrics);
    } else if task == "condense" {
        let scc = graph.scc();
        let condensation = build_condensation(&graph, &scc, config.condensation_weight)?;
        println!(
            "Condensation: {} vertices, {} edges",
            condensation.dag.size(),
            condensation.dag.edge_count()
        );
        for edge in condensation.dag.edges() {
            println!("  C{} -> C{} (w={})", edge.from, edge.to, edge.weight);
        }
        println!("{}", condensation.metrics);
    } else if task == "topo" {
        let view = DagView::build(&graph, config.condensation_weight)?;
        let order = topological_sort(&view.dag)?;
        println!("{}", order);
        println!("{}", order.metrics);
    } else if task == "shortest" {
        let view = DagView::build(&graph, config.condensation_weight)?;
        run_paths(&view, PathKind::Shortest, source, config.target_vertex)?;
    } else if task == "longest" {
        let view = DagView::build(&graph, config.condensation_weight)?;
        run_paths(&view, PathKind::Longest, source, config.target_vertex)?;
    } else if task == "all" {
        let analysis = analyze(&graph, source, AnalysisOptions::with_weight(config.condensation_weight))?;
        print!("{}", analysis.report());
        if let Some(target) = config.target_vertex {
            let (shortest, longest) = analysis
                .distances_to(target)
                .with_context(|| format!("target vertex {} is not in the graph", target))?;
            println!("Shortest {} -> {}: {}", source, target, format_distance(shortest));
            println!("Longest {} -> {}: {}", source, target, format_distance(longest));
        }
    } else {
        bail!("task {} not supported", task);
    }

    Ok(())
}

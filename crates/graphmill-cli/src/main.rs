//! Graphmill CLI
//!
//! Unified command-line interface for the graph build pipeline:
//! - `filter`: remap predicates, standardize knowledge sources, deduplicate
//!   edges, and stamp build metadata onto a graph document
//! - `slim`: reduce a graph document to bare-bones node/edge fields
//! - `ingest dgidb` / `ingest umls`: convert upstream source dumps into
//!   graph documents and JSON-Lines node files
//!
//! Fatal consistency violations print every offending identifier to stderr
//! before the process exits non-zero; no output file is written for them.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use graphmill_filter::{run_filter, FilterConfig};
use graphmill_ingest_umls::UmlsIngestConfig;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod slim;

use slim::SlimConfig;

#[derive(Parser)]
#[command(name = "graphmill")]
#[command(author, version, about = "Graphmill: batch knowledge-graph build pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a graph document: remap predicates against the rule table,
    /// standardize knowledge-source labels, deduplicate edges, and stamp
    /// build metadata.
    Filter {
        /// Predicate remap rules YAML
        predicate_remap: PathBuf,
        /// Knowledge-source remap YAML
        infores_remap: PathBuf,
        /// CURIE-prefix-to-URI map YAML
        curies_to_uri: PathBuf,
        /// Input graph document
        input: PathBuf,
        /// Output graph document
        output: PathBuf,
        /// Version file; its first non-blank line names the build
        version_file: PathBuf,
        /// Mark the build as a test build and pretty-print the output
        #[arg(long)]
        test: bool,
        /// Keep self-edges only for these source predicate labels
        /// (comma-separated); omit to keep all self-edges
        #[arg(long = "dropSelfEdgesExcept", value_name = "LABELS")]
        drop_self_edges_except: Option<String>,
        /// Drop negated edges
        #[arg(long = "dropNegated")]
        drop_negated: bool,
    },

    /// Reduce a graph document to bare-bones node and edge fields.
    Slim {
        /// Input graph document
        input: PathBuf,
        /// Output graph document
        output: PathBuf,
        /// Pretty-print the output
        #[arg(long)]
        test: bool,
    },

    /// Convert upstream source dumps into graph documents.
    Ingest {
        #[command(subcommand)]
        command: IngestCommands,
    },
}

#[derive(Subcommand)]
enum IngestCommands {
    /// DGIdb drug-gene interactions TSV
    Dgidb {
        /// Interactions TSV (header line plus a leading `#` date line)
        input: PathBuf,
        /// Output graph document
        output: PathBuf,
        /// Cap the run at the first 10,000 rows and pretty-print
        #[arg(long)]
        test: bool,
    },

    /// UMLS Metathesaurus item JSONL
    Umls {
        /// Item dump, one entity per line
        input: PathBuf,
        /// Output nodes JSON-Lines file
        nodes_out: PathBuf,
        /// Output edges JSON-Lines file (written empty by this stage)
        edges_out: PathBuf,
        /// CURIE-prefix-to-URI map YAML
        curies_to_uri: PathBuf,
        /// TUI-combination-to-category JSON
        tui_mappings: PathBuf,
        /// Cap the run at the first 10,000 items
        #[arg(long)]
        test: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Filter {
            predicate_remap,
            infores_remap,
            curies_to_uri,
            input,
            output,
            version_file,
            test,
            drop_self_edges_except,
            drop_negated,
        } => cmd_filter(FilterConfig {
            predicate_remap_path: predicate_remap,
            infores_remap_path: infores_remap,
            curie_uri_map_path: curies_to_uri,
            input_path: input,
            output_path: output,
            version_path: version_file,
            test_mode: test,
            drop_negated,
            self_edge_exceptions: drop_self_edges_except.map(parse_label_set),
        }),
        Commands::Slim {
            input,
            output,
            test,
        } => cmd_slim(SlimConfig {
            input_path: input,
            output_path: output,
            test_mode: test,
        }),
        Commands::Ingest { command } => match command {
            IngestCommands::Dgidb {
                input,
                output,
                test,
            } => cmd_dgidb(&input, &output, test),
            IngestCommands::Umls {
                input,
                nodes_out,
                edges_out,
                curies_to_uri,
                tui_mappings,
                test,
            } => cmd_umls(UmlsIngestConfig {
                input_path: input,
                nodes_out_path: nodes_out,
                edges_out_path: edges_out,
                curie_uri_map_path: curies_to_uri,
                tui_mapping_path: tui_mappings,
                test_mode: test,
            }),
        },
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn parse_label_set(labels: String) -> BTreeSet<String> {
    labels.split(',').map(str::to_string).collect()
}

fn cmd_filter(config: FilterConfig) -> Result<()> {
    println!(
        "{} {}",
        "Filtering".green().bold(),
        config.input_path.display()
    );
    let summary = run_filter(&config)?;
    if summary.warnings > 0 || summary.infos > 0 {
        println!(
            "{} {} warnings, {} informational findings (details on stderr)",
            "Audit".yellow().bold(),
            summary.warnings,
            summary.infos
        );
    }
    println!(
        "{} {} nodes and {} edges to {}",
        "Wrote".green().bold(),
        summary.nodes,
        summary.edges,
        config.output_path.display()
    );
    Ok(())
}

fn cmd_slim(config: SlimConfig) -> Result<()> {
    println!(
        "{} {}",
        "Slimming".green().bold(),
        config.input_path.display()
    );
    let summary = slim::run_slim(&config)?;
    println!(
        "{} {} nodes and {} edges to {}",
        "Wrote".green().bold(),
        summary.nodes,
        summary.edges,
        config.output_path.display()
    );
    Ok(())
}

fn cmd_dgidb(input: &Path, output: &Path, test_mode: bool) -> Result<()> {
    println!(
        "{} DGIdb interactions {}",
        "Ingesting".green().bold(),
        input.display()
    );
    let graph = graphmill_ingest_dgidb::build_graph(input, test_mode)?;
    graphmill_io::save_json(&graph, output, test_mode)?;
    println!(
        "{} {} nodes and {} edges to {}",
        "Wrote".green().bold(),
        graph.nodes.len(),
        graph.edges.len(),
        output.display()
    );
    Ok(())
}

fn cmd_umls(config: UmlsIngestConfig) -> Result<()> {
    println!(
        "{} UMLS items {}",
        "Ingesting".green().bold(),
        config.input_path.display()
    );
    let summary = graphmill_ingest_umls::run_ingest(&config)?;
    println!(
        "{} {} nodes from {} items to {}",
        "Wrote".green().bold(),
        summary.nodes,
        summary.items,
        config.nodes_out_path.display()
    );
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

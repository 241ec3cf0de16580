//! One whole filter run, front to back: load the remap configuration,
//! normalize nodes, filter edges, audit, then write the graph document.
//!
//! The output file is only created after the audit passes. A run with
//! fatal findings renders every finding to stderr and returns
//! [`FilterError::AuditFailed`] without touching the output path.

use crate::audit::ConsistencyReport;
use crate::build::build_metadata;
use crate::config::{load_infores_remap, load_predicate_remap};
use crate::edges::{process_edges, EdgeFilterOptions};
use crate::nodes::normalize_nodes;
use crate::FilterError;
use anyhow::Result;
use graphmill_io::{read_version_file, save_json, CurieUriMap};
use graphmill_schema::Graph;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::info;

/// Everything a filter run needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub predicate_remap_path: PathBuf,
    pub infores_remap_path: PathBuf,
    pub curie_uri_map_path: PathBuf,
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub version_path: PathBuf,
    /// Marks the build name with `-TEST` and pretty-prints the output.
    pub test_mode: bool,
    pub drop_negated: bool,
    pub self_edge_exceptions: Option<BTreeSet<String>>,
}

/// What a successful run produced, for the caller's status output.
#[derive(Debug, Clone, Copy)]
pub struct FilterSummary {
    pub nodes: usize,
    pub edges: usize,
    pub warnings: usize,
    pub infos: usize,
}

pub fn run_filter(config: &FilterConfig) -> Result<FilterSummary> {
    let rules = load_predicate_remap(&config.predicate_remap_path)?;
    let infores = load_infores_remap(&config.infores_remap_path)?;
    let prefix_map = CurieUriMap::load(&config.curie_uri_map_path)?;
    let version = read_version_file(&config.version_path)?;
    info!(
        rules = rules.len(),
        infores = infores.len(),
        prefixes = prefix_map.len(),
        version = %version,
        "remap configuration loaded"
    );

    let nodes = normalize_nodes(&config.input_path, &infores)?;

    let options = EdgeFilterOptions {
        drop_negated: config.drop_negated,
        self_edge_exceptions: config.self_edge_exceptions.clone(),
    };
    let outcome = process_edges(
        &config.input_path,
        &rules,
        &infores,
        &prefix_map,
        &nodes,
        &options,
    )?;

    let report = ConsistencyReport::from_audit(&outcome.audit);
    report.render_to_stderr();
    let fatal = report.fatal_count();
    if fatal > 0 {
        return Err(FilterError::AuditFailed { fatal }.into());
    }

    let (build_node, build_info) = build_metadata(&version, config.test_mode);
    let mut graph_nodes: Vec<_> = nodes.into_values().collect();
    graph_nodes.push(build_node);
    let mut graph = Graph::new(graph_nodes, outcome.edges.into_values().collect());
    graph.build = Some(build_info);

    let summary = FilterSummary {
        nodes: graph.nodes.len(),
        edges: graph.edges.len(),
        warnings: report.warning_count(),
        infos: report.info_count(),
    };
    save_json(&graph, &config.output_path, config.test_mode)?;
    info!(
        nodes = summary.nodes,
        edges = summary.edges,
        output = %config.output_path.display(),
        "filtered graph written"
    );
    Ok(summary)
}

// ============================================================================
// Tests
// ============================================================================

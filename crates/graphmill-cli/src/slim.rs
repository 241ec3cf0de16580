//! Bare-bones graph projection.
//!
//! Reduces a graph document to the handful of node and edge fields that
//! downstream indexing actually touches, dropping everything else. Records
//! pass through as raw JSON objects so the projection works on any dump,
//! modeled fields or not. The top-level `build` object is carried over
//! when present.

use anyhow::Result;
use graphmill_io::{read_section_value, save_json, stream_section};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::info;

// The legacy `knowledge_source` spelling stays on the allowlists so that
// slimming an unmigrated dump still preserves its provenance.
const NODE_FIELDS: &[&str] = &[
    "name",
    "id",
    "full_name",
    "category",
    "provided_by",
    "knowledge_source",
];
const EDGE_FIELDS: &[&str] = &[
    "predicate",
    "subject",
    "object",
    "predicate_label",
    "primary_knowledge_source",
    "knowledge_source",
];

const PROGRESS_INTERVAL: u64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct SlimConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    /// Pretty-prints the output.
    pub test_mode: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct SlimSummary {
    pub nodes: u64,
    pub edges: u64,
}

/// Project the document down to the fixed field allowlists and write it.
pub fn run_slim(config: &SlimConfig) -> Result<SlimSummary> {
    let build = read_section_value(&config.input_path, "build")?;

    let mut nodes: Vec<Value> = Vec::new();
    let node_count = stream_section::<Map<String, Value>, _>(
        &config.input_path,
        "nodes",
        |record| {
            nodes.push(project(record, NODE_FIELDS));
            if nodes.len() as u64 % PROGRESS_INTERVAL == 0 {
                info!(nodes = nodes.len(), "slimming nodes");
            }
            Ok(())
        },
    )?;

    let mut edges: Vec<Value> = Vec::new();
    let edge_count = stream_section::<Map<String, Value>, _>(
        &config.input_path,
        "edges",
        |record| {
            edges.push(project(record, EDGE_FIELDS));
            if edges.len() as u64 % PROGRESS_INTERVAL == 0 {
                info!(edges = edges.len(), "slimming edges");
            }
            Ok(())
        },
    )?;

    let mut document = Map::new();
    document.insert("nodes".to_string(), Value::Array(nodes));
    document.insert("edges".to_string(), Value::Array(edges));
    if let Some(build) = build {
        document.insert("build".to_string(), build);
    }
    save_json(&Value::Object(document), &config.output_path, config.test_mode)?;

    info!(nodes = node_count, edges = edge_count, "graph slimmed");
    Ok(SlimSummary {
        nodes: node_count,
        edges: edge_count,
    })
}

fn project(record: Map<String, Value>, keep: &[&str]) -> Value {
    let kept: Map<String, Value> = record
        .into_iter()
        .filter(|(key, _)| keep.contains(&key.as_str()))
        .collect();
    Value::Object(kept)
}

// ============================================================================
// Tests
// ============================================================================

//! Node provenance normalization.

use crate::config::InforesRemapTable;
use crate::{FilterError, PROGRESS_INTERVAL};
use anyhow::Result;
use graphmill_io::stream_section;
use graphmill_schema::Node;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Stream the document's nodes, replacing every provenance label with its
/// standardized infores curie, and materialize them keyed by id. The node
/// map doubles as the node-id set the edge pass audits against.
///
/// Provenance is strict: the first label with no infores mapping aborts the
/// run with [`FilterError::UnmappedNodeSource`]. A later node with the same
/// id silently replaces an earlier one.
pub fn normalize_nodes(
    input_path: &Path,
    infores: &InforesRemapTable,
) -> Result<BTreeMap<String, Node>> {
    let mut nodes = BTreeMap::new();
    let mut count: u64 = 0;
    stream_section::<Node, _>(input_path, "nodes", |mut node| {
        count += 1;
        if count % PROGRESS_INTERVAL == 0 {
            info!(nodes = count, "normalizing nodes");
        }
        node.migrate_legacy();
        let mut infores_curies = Vec::with_capacity(node.provided_by.len());
        for source in &node.provided_by {
            match infores.get(source) {
                Some(mapping) => infores_curies.push(mapping.infores_curie.clone()),
                None => {
                    return Err(FilterError::UnmappedNodeSource {
                        node_id: node.id.clone(),
                        source: source.clone(),
                    }
                    .into());
                }
            }
        }
        node.provided_by = infores_curies;
        nodes.insert(node.id.clone(), node);
        Ok(())
    })?;
    info!(nodes = count, "nodes normalized");
    Ok(nodes)
}

// ============================================================================
// Tests
// ============================================================================

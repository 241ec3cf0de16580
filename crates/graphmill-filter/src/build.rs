//! Synthetic build provenance: one node describing the graph build itself,
//! plus the document-level [`BuildInfo`] stamp.

use chrono::Utc;
use graphmill_schema::{BuildInfo, Node, SOURCE_NODE_CATEGORY};

/// CURIE of the synthetic node representing the build.
pub const BUILD_NODE_CURIE: &str = "GRAPHMILL:KG";
/// Base IRI under which project identifiers live.
pub const BUILD_BASE_IRI: &str = "https://graphmill.org/identifiers#";
/// Provenance curie every build node carries.
pub const BUILD_PROVENANCE_CURIE: &str = "GRAPHMILL:";
/// Display-name prefix; the version string is appended.
pub const BUILD_NAME_PREFIX: &str = "Graphmill KG";
/// Timestamp layout used for the build node and the document stamp.
pub const UPDATE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The build node and document stamp for a build happening now.
///
/// Test-mode builds get a `-TEST` suffix on the version name so their
/// artifacts can never be mistaken for a real release.
pub fn build_metadata(version: &str, test_mode: bool) -> (Node, BuildInfo) {
    let update_date = Utc::now().format(UPDATE_DATE_FORMAT).to_string();
    build_metadata_with_date(version, test_mode, update_date)
}

/// Same as [`build_metadata`] with the timestamp supplied by the caller.
pub fn build_metadata_with_date(
    version: &str,
    test_mode: bool,
    update_date: String,
) -> (Node, BuildInfo) {
    let suffix = if test_mode { "-TEST" } else { "" };
    let name = format!("{BUILD_NAME_PREFIX} {version}{suffix}");

    let mut node = Node::new(BUILD_NODE_CURIE);
    node.iri = Some(format!("{BUILD_BASE_IRI}KG"));
    node.name = Some(name.clone());
    node.full_name = Some(name.clone());
    node.category = Some(SOURCE_NODE_CATEGORY.to_string());
    node.update_date = Some(update_date.clone());
    node.provided_by = vec![BUILD_PROVENANCE_CURIE.to_string()];

    let info = BuildInfo {
        version: name,
        timestamp_utc: update_date,
    };
    (node, info)
}

// ============================================================================
// Tests
// ============================================================================

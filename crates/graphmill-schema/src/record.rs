//! Node/edge/graph wire types.
//!
//! These are the records every pipeline stage reads and writes. Two schema
//! generations are in circulation: older dumps carry node provenance under
//! `knowledge_source` and the edge's source predicate under
//! `original_predicate`. Rather than falling back at every read site, each
//! record exposes a one-shot [`Node::migrate_legacy`] / [`Edge::migrate_legacy`]
//! that folds the legacy field into its successor immediately after
//! deserialization; downstream code only ever sees the current names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A graph node. `id` is a CURIE (`<prefix>:<local-id>`) and is globally
/// unique within a graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonym: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
    /// Provenance identifiers. Raw source labels on ingest; standardized
    /// infores curies after the filter stage.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provided_by: Vec<String>,
    /// Legacy name for `provided_by`. Present only in old dumps; folded
    /// forward by [`Node::migrate_legacy`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_source: Option<Vec<String>>,
    /// Passthrough for fields this schema does not model.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Node {
    /// A node with only the identifier set. Ingest stages fill in the rest.
    pub fn new(id: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            iri: None,
            name: None,
            full_name: None,
            category: None,
            description: None,
            synonym: Vec::new(),
            publications: Vec::new(),
            update_date: None,
            provided_by: Vec::new(),
            knowledge_source: None,
            extra: BTreeMap::new(),
        }
    }

    /// Fold the legacy `knowledge_source` field into `provided_by`. The
    /// legacy field wins only when `provided_by` is absent; afterwards it is
    /// always `None`.
    pub fn migrate_legacy(&mut self) {
        if let Some(sources) = self.knowledge_source.take() {
            if self.provided_by.is_empty() {
                self.provided_by = sources;
            }
        }
    }
}

/// A graph edge. The `id` string is the `---`-delimited composite rendered
/// by [`crate::ident::EdgeId`]; all other fields are plain values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub subject: String,
    pub object: String,
    /// Relation IRI, as emitted by the extraction stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    /// Human-readable label of the relation as extracted from the source.
    pub relation_label: String,
    /// The predicate curie as extracted from the source, before any remap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_predicate: Option<String>,
    /// Legacy name for `source_predicate`; folded forward by
    /// [`Edge::migrate_legacy`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_predicate: Option<String>,
    /// Controlled-vocabulary core predicate. `None` until the filter stage
    /// assigns it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_predicate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_object_aspect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_object_direction: Option<String>,
    #[serde(default)]
    pub negated: bool,
    /// Primary provenance of the assertion. Raw source label on ingest; a
    /// standardized infores curie after the filter stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_knowledge_source: Option<String>,
    /// Legacy name for `primary_knowledge_source`; folded forward by
    /// [`Edge::migrate_legacy`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_source: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_date: Option<String>,
    /// Passthrough for fields this schema does not model.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Edge {
    /// An edge with the identifying fields set and everything else empty.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        object: impl Into<String>,
        relation_label: impl Into<String>,
    ) -> Self {
        Edge {
            id: id.into(),
            subject: subject.into(),
            object: object.into(),
            relation: None,
            relation_label: relation_label.into(),
            source_predicate: None,
            original_predicate: None,
            predicate: None,
            predicate_label: None,
            qualified_predicate: None,
            qualified_object_aspect: None,
            qualified_object_direction: None,
            negated: false,
            primary_knowledge_source: None,
            knowledge_source: None,
            publications: Vec::new(),
            update_date: None,
            extra: BTreeMap::new(),
        }
    }

    /// Fold both legacy edge fields forward: `original_predicate` into
    /// `source_predicate` and `knowledge_source` into
    /// `primary_knowledge_source`. Current names win when both are present.
    pub fn migrate_legacy(&mut self) {
        if let Some(predicate) = self.original_predicate.take() {
            if self.source_predicate.is_none() {
                self.source_predicate = Some(predicate);
            }
        }
        if let Some(source) = self.knowledge_source.take() {
            if self.primary_knowledge_source.is_none() {
                self.primary_knowledge_source = Some(source);
            }
        }
    }
}

/// Build provenance attached to a finished graph document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildInfo {
    pub version: String,
    pub timestamp_utc: String,
}

/// A complete graph document: the shape of every intermediate and final
/// JSON file in the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildInfo>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Graph {
            nodes,
            edges,
            build: None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

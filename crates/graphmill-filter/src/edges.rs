//! The edge pass: predicate remapping, qualifier splicing, filtering,
//! and duplicate collapse.
//!
//! Every edge flows through [`EdgeProcessor::process`] in a fixed order:
//!
//! 1. drop negated edges when requested,
//! 2. fold legacy field names forward and resolve the remap rule for the
//!    edge's source predicate (absent rules behave as an implicit `keep`),
//! 3. apply the rule: `delete` ends the edge here, `invert` swaps the
//!    endpoints and prefixes the relation label with `INVERTED:`,
//! 4. stamp `predicate_label` with the pre-invert relation label and drop
//!    self-referential edges not on the exception list,
//! 5. settle the core predicate, falling back to the source predicate when
//!    it already lives in the controlled vocabulary,
//! 6. splice the qualifier values into the edge id's segment form,
//! 7. record source predicates that resolve to neither a node nor a known
//!    URI prefix,
//! 8. standardize the knowledge source to its infores curie, keeping the
//!    raw label (and recording it) when no mapping exists,
//! 9. collapse duplicates by [`EdgeKey`], last write wins.
//!
//! The duplicate key deliberately uses the raw knowledge-source label from
//! step 8, not the infores curie, so two raw labels mapped to the same
//! curie stay distinct edges.

use crate::audit::EdgeAudit;
use crate::config::{
    InforesRemapTable, PredicateRemapRule, PredicateRemapTable, RemapOperation,
};
use crate::{FilterError, PROGRESS_INTERVAL};
use anyhow::Result;
use graphmill_io::{stream_section, CurieUriMap};
use graphmill_schema::{curie_prefix, is_biolink_curie, Edge, EdgeId, EdgeKey, Node};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

/// Behavioral switches for the edge pass, both off by default.
#[derive(Debug, Clone, Default)]
pub struct EdgeFilterOptions {
    /// Drop every edge whose `negated` flag is set.
    pub drop_negated: bool,
    /// When present, drop self-referential edges unless their pre-remap
    /// relation label is in the set. `None` keeps all self edges.
    pub self_edge_exceptions: Option<BTreeSet<String>>,
}

/// Everything the edge pass produces: the deduplicated edges keyed for
/// deterministic output order, plus the audit evidence.
#[derive(Debug, Default)]
pub struct EdgeOutcome {
    pub edges: BTreeMap<EdgeKey, Edge>,
    pub audit: EdgeAudit,
}

/// Stream the document's edges through the remap state machine.
///
/// `node_ids` is the normalized node map from the node pass; the audit
/// checks source predicates against its keys.
pub fn process_edges(
    input_path: &Path,
    rules: &PredicateRemapTable,
    infores: &InforesRemapTable,
    prefix_map: &CurieUriMap,
    node_ids: &BTreeMap<String, Node>,
    options: &EdgeFilterOptions,
) -> Result<EdgeOutcome> {
    let mut processor = EdgeProcessor::new(rules, infores, prefix_map, node_ids, options);
    let mut count: u64 = 0;
    stream_section::<Edge, _>(input_path, "edges", |edge| {
        count += 1;
        if count % PROGRESS_INTERVAL == 0 {
            info!(edges = count, "filtering edges");
        }
        processor.process(edge)?;
        Ok(())
    })?;
    let outcome = processor.into_outcome();
    info!(edges = count, kept = outcome.edges.len(), "edges filtered");
    Ok(outcome)
}

struct EdgeProcessor<'a> {
    rules: &'a PredicateRemapTable,
    infores: &'a InforesRemapTable,
    prefix_map: &'a CurieUriMap,
    node_ids: &'a BTreeMap<String, Node>,
    options: &'a EdgeFilterOptions,
    audit: EdgeAudit,
    edges: BTreeMap<EdgeKey, Edge>,
}

impl<'a> EdgeProcessor<'a> {
    fn new(
        rules: &'a PredicateRemapTable,
        infores: &'a InforesRemapTable,
        prefix_map: &'a CurieUriMap,
        node_ids: &'a BTreeMap<String, Node>,
        options: &'a EdgeFilterOptions,
    ) -> Self {
        EdgeProcessor {
            rules,
            infores,
            prefix_map,
            node_ids,
            options,
            audit: EdgeAudit::for_rules(rules),
            edges: BTreeMap::new(),
        }
    }

    fn process(&mut self, mut edge: Edge) -> Result<(), FilterError> {
        if self.options.drop_negated && edge.negated {
            return Ok(());
        }
        edge.migrate_legacy();

        // The label the edge arrived with. It survives as predicate_label
        // even when inversion rewrites relation_label.
        let source_label = edge.relation_label.clone();
        let source_predicate = edge.source_predicate.clone().ok_or_else(|| {
            FilterError::MissingSourcePredicate {
                edge_id: edge.id.clone(),
            }
        })?;

        let rule = match self.rules.get(&source_predicate) {
            Some(rule) => {
                if let Some(used) = self.audit.rule_usage.get_mut(&source_predicate) {
                    *used = true;
                }
                rule.clone()
            }
            None => {
                self.audit
                    .unmapped_source_predicates
                    .insert(source_predicate.clone());
                PredicateRemapRule::implicit_keep()
            }
        };

        if rule.operation == RemapOperation::Delete {
            return Ok(());
        }
        let invert = rule.operation == RemapOperation::Invert;

        let mut core_predicate = None;
        let mut qualified_predicate = None;
        let mut object_aspect = None;
        let mut object_direction = None;
        if invert || rule.has_override() {
            core_predicate = Some(rule.core_predicate.clone().ok_or_else(|| {
                FilterError::MalformedRule {
                    source_predicate: source_predicate.clone(),
                    reason: "invert rule with no core_predicate".to_string(),
                }
            })?);
            qualified_predicate = rule.qualified_predicate.clone();
            let (aspect, direction) = rule.qualifier_parts();
            object_aspect = aspect;
            object_direction = direction;
        }

        if invert {
            edge.relation_label = format!("INVERTED:{source_label}");
            std::mem::swap(&mut edge.subject, &mut edge.object);
        }

        edge.predicate_label = Some(source_label.clone());
        if let Some(exceptions) = &self.options.self_edge_exceptions {
            if edge.subject == edge.object && !exceptions.contains(&source_label) {
                return Ok(());
            }
        }

        if core_predicate.is_none() && is_biolink_curie(&source_predicate) {
            core_predicate = Some(source_predicate.clone());
        }
        edge.predicate = core_predicate;
        edge.qualified_predicate = qualified_predicate.clone();
        edge.qualified_object_aspect = object_aspect.clone();
        edge.qualified_object_direction = object_direction.clone();

        let mut id = EdgeId::parse(&edge.id)?;
        id.qualified_predicate = qualified_predicate;
        id.qualified_object_aspect = object_aspect;
        id.qualified_object_direction = object_direction;
        edge.id = id.render();

        if !self.node_ids.contains_key(&source_predicate) {
            let expandable = curie_prefix(&source_predicate)
                .and_then(|prefix| self.prefix_map.expand_prefix(prefix))
                .is_some();
            if !expandable {
                self.audit
                    .predicates_missing_nodes
                    .insert(source_predicate.clone());
            }
        }

        let raw_knowledge_source = edge.primary_knowledge_source.clone().ok_or_else(|| {
            FilterError::MissingKnowledgeSource {
                edge_id: edge.id.clone(),
            }
        })?;
        match self.infores.get(&raw_knowledge_source) {
            Some(mapping) => {
                edge.primary_knowledge_source = Some(mapping.infores_curie.clone());
            }
            None => {
                self.audit
                    .unmapped_knowledge_sources
                    .insert(raw_knowledge_source.clone());
            }
        }

        let key = EdgeKey {
            subject: edge.subject.clone(),
            source_predicate,
            qualified_predicate: edge.qualified_predicate.clone(),
            qualified_object_aspect: edge.qualified_object_aspect.clone(),
            qualified_object_direction: edge.qualified_object_direction.clone(),
            object: edge.object.clone(),
            knowledge_source: raw_knowledge_source,
        };
        self.edges.insert(key, edge);
        Ok(())
    }

    fn into_outcome(self) -> EdgeOutcome {
        EdgeOutcome {
            edges: self.edges,
            audit: self.audit,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! End-of-run consistency auditing.
//!
//! The edge pass collects evidence into an [`EdgeAudit`] as it streams; once
//! the pass finishes, [`ConsistencyReport::from_audit`] turns the evidence
//! into ordered findings. Every finding is rendered to stderr before the
//! run is allowed to fail, so an operator sees the complete list of
//! offenders in one run instead of one per rerun.
//!
//! Finding classes, in render order:
//!
//! - configured remap rules no edge used (warning),
//! - source predicate curies with no node of the same id and no known URI
//!   expansion for their prefix (info),
//! - source predicate curies absent from the remap table, excluding the
//!   controlled vocabulary's own prefix (**fatal**),
//! - edge knowledge-source labels absent from the infores table (**fatal**).
//!
//! The node-side provenance check has no finding class here: it fails
//! eagerly inside the node pass.

use crate::config::PredicateRemapTable;
use graphmill_schema::is_biolink_curie;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Evidence collected while streaming edges. Owned by the edge pass and
/// handed to the report builder afterwards; nothing here is global.
#[derive(Debug, Clone, Default)]
pub struct EdgeAudit {
    /// Source predicates seen on edges but absent from the remap table.
    /// Vocabulary-prefixed predicates are recorded too; the report builder
    /// is what exempts them from the fatal class.
    pub unmapped_source_predicates: BTreeSet<String>,
    /// Source predicates that are neither a node id nor expandable through
    /// the prefix map.
    pub predicates_missing_nodes: BTreeSet<String>,
    /// Raw knowledge-source labels on edges with no infores mapping.
    pub unmapped_knowledge_sources: BTreeSet<String>,
    /// Per-rule usage flags, seeded false for every configured rule.
    pub rule_usage: BTreeMap<String, bool>,
}

impl EdgeAudit {
    pub fn for_rules(rules: &PredicateRemapTable) -> Self {
        EdgeAudit {
            rule_usage: rules.keys().map(|key| (key.clone(), false)).collect(),
            ..EdgeAudit::default()
        }
    }

    pub fn unused_rules(&self) -> impl Iterator<Item = &str> {
        self.rule_usage
            .iter()
            .filter(|(_, used)| !**used)
            .map(|(curie, _)| curie.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingLevel {
    Warning,
    Info,
    Fatal,
}

impl fmt::Display for FindingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            FindingLevel::Warning => "warning",
            FindingLevel::Info => "info",
            FindingLevel::Fatal => "fatal",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone)]
pub struct ConsistencyFinding {
    pub level: FindingLevel,
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConsistencyReport {
    pub findings: Vec<ConsistencyFinding>,
}

impl ConsistencyReport {
    pub fn from_audit(audit: &EdgeAudit) -> Self {
        let mut findings = Vec::new();

        for curie in audit.unused_rules() {
            findings.push(ConsistencyFinding {
                level: FindingLevel::Warning,
                code: "unused_remap_rule",
                message: format!(
                    "remap rule for {curie} was not used by any edge in the graph"
                ),
            });
        }
        for curie in &audit.predicates_missing_nodes {
            findings.push(ConsistencyFinding {
                level: FindingLevel::Info,
                code: "predicate_without_node",
                message: format!("could not find a node for source predicate curie: {curie}"),
            });
        }
        for curie in &audit.unmapped_source_predicates {
            if is_biolink_curie(curie) {
                continue;
            }
            findings.push(ConsistencyFinding {
                level: FindingLevel::Fatal,
                code: "unmapped_source_predicate",
                message: format!(
                    "source predicate curie is missing from the remap config: {curie}"
                ),
            });
        }
        for label in &audit.unmapped_knowledge_sources {
            findings.push(ConsistencyFinding {
                level: FindingLevel::Fatal,
                code: "unmapped_knowledge_source",
                message: format!(
                    "edge knowledge source is missing from the remap config: {label}"
                ),
            });
        }

        ConsistencyReport { findings }
    }

    pub fn fatal_count(&self) -> usize {
        self.count(FindingLevel::Fatal)
    }

    pub fn warning_count(&self) -> usize {
        self.count(FindingLevel::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(FindingLevel::Info)
    }

    fn count(&self, level: FindingLevel) -> usize {
        self.findings.iter().filter(|f| f.level == level).count()
    }

    /// One line per finding, in order. These lines are the operator
    /// contract; they go to stderr regardless of any logging configuration.
    pub fn render_to_stderr(&self) {
        for finding in &self.findings {
            eprintln!("{}: {}", finding.level, finding.message);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

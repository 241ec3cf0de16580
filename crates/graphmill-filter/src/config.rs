//! The two remap tables that drive the filter stage.
//!
//! Both are YAML maps keyed by the raw identifier seen in the graph. The
//! predicate table is validated at load time so rule-shape problems surface
//! before hours of streaming, not in the middle of it.

use crate::FilterError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// What to do with every edge carrying a given source predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemapOperation {
    Keep,
    Invert,
    Delete,
}

/// One entry of a rule's `qualifiers` list. Only the first entry is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Qualifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_aspect: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_direction: Option<String>,
}

/// A predicate remap rule. Any operation outside keep/invert/delete and any
/// unknown key fail deserialization, so a malformed table never reaches the
/// edge pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PredicateRemapRule {
    pub operation: RemapOperation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_predicate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_predicate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<Vec<Qualifier>>,
}

impl PredicateRemapRule {
    /// The rule applied to source predicates absent from the table: keep,
    /// no override. Their absence is still recorded for the audit.
    pub fn implicit_keep() -> Self {
        PredicateRemapRule {
            operation: RemapOperation::Keep,
            core_predicate: None,
            qualified_predicate: None,
            qualifiers: None,
        }
    }

    /// Whether the rule rewrites predicate detail (core predicate plus
    /// qualifier triple) rather than passing the edge through untouched.
    pub fn has_override(&self) -> bool {
        self.core_predicate.is_some()
    }

    /// First qualifier entry's aspect/direction pair, if any.
    pub fn qualifier_parts(&self) -> (Option<String>, Option<String>) {
        match self.qualifiers.as_ref().and_then(|list| list.first()) {
            Some(q) => (q.object_aspect.clone(), q.object_direction.clone()),
            None => (None, None),
        }
    }
}

/// source predicate curie -> rule
pub type PredicateRemapTable = BTreeMap<String, PredicateRemapRule>;

/// One entry of the knowledge-source remap table. The table format carries
/// keys beyond `infores_curie`; they are ignored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InforesMapping {
    pub infores_curie: String,
}

/// raw knowledge-source label -> standardized infores mapping
pub type InforesRemapTable = BTreeMap<String, InforesMapping>;

pub fn load_predicate_remap(path: &Path) -> Result<PredicateRemapTable> {
    let table: PredicateRemapTable = graphmill_io::load_yaml(path)?;
    validate_predicate_remap(&table)?;
    Ok(table)
}

pub fn load_infores_remap(path: &Path) -> Result<InforesRemapTable> {
    graphmill_io::load_yaml(path)
}

/// An invert rule rewrites the edge around its core predicate, so a missing
/// core predicate makes the rule unapplicable.
pub fn validate_predicate_remap(table: &PredicateRemapTable) -> Result<(), FilterError> {
    for (source_predicate, rule) in table {
        if rule.operation == RemapOperation::Invert && rule.core_predicate.is_none() {
            return Err(FilterError::MalformedRule {
                source_predicate: source_predicate.clone(),
                reason: "invert requires a core_predicate".to_string(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

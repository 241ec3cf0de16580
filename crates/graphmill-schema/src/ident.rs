//! Structured edge identifiers and dedup keys.
//!
//! Edge identity lives in two places:
//!
//! - the **storage identifier** ([`EdgeId`]): a `---`-delimited string kept
//!   on the edge record. Extraction stages stamp a four-segment form
//!   (subject, predicate, object, knowledge source); the filter stage
//!   upgrades it to seven segments by splicing the qualifier triple into the
//!   middle. Absent qualifiers render as empty segments so the arity is
//!   stable for anything that splits on the delimiter.
//! - the **dedup key** ([`EdgeKey`]): the tuple the filter stage
//!   deduplicates on. It is never serialized; `Display` exists only so
//!   diagnostics can show which edges collided.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const EDGE_ID_DELIMITER: &str = "---";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EdgeIdError {
    #[error("edge id {id:?} has {found} segments, expected at least 4")]
    TooFewSegments { id: String, found: usize },
}

/// The four-segment identifier stamped on an edge at extraction time.
pub fn make_edge_id(subject: &str, predicate: &str, object: &str, knowledge_source: &str) -> String {
    format!("{subject}---{predicate}---{object}---{knowledge_source}")
}

/// Parsed form of an edge's storage identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeId {
    pub subject: String,
    pub predicate: String,
    pub qualified_predicate: Option<String>,
    pub qualified_object_aspect: Option<String>,
    pub qualified_object_direction: Option<String>,
    pub object: String,
    pub knowledge_source: String,
}

impl EdgeId {
    /// Parse a delimited identifier. Both the four-segment extraction form
    /// and the seven-segment filtered form are accepted; for any other
    /// arity of at least four, the outer pairs are kept and the qualifier
    /// segments are discarded. Fewer than four segments is malformed input.
    pub fn parse(id: &str) -> Result<EdgeId, EdgeIdError> {
        let parts: Vec<&str> = id.split(EDGE_ID_DELIMITER).collect();
        if parts.len() < 4 {
            return Err(EdgeIdError::TooFewSegments {
                id: id.to_string(),
                found: parts.len(),
            });
        }
        let (qualified_predicate, qualified_object_aspect, qualified_object_direction) =
            if parts.len() == 7 {
                (segment(parts[2]), segment(parts[3]), segment(parts[4]))
            } else {
                (None, None, None)
            };
        Ok(EdgeId {
            subject: parts[0].to_string(),
            predicate: parts[1].to_string(),
            qualified_predicate,
            qualified_object_aspect,
            qualified_object_direction,
            object: parts[parts.len() - 2].to_string(),
            knowledge_source: parts[parts.len() - 1].to_string(),
        })
    }

    /// Render the seven-segment form. Absent qualifiers become empty
    /// segments, never a placeholder word.
    pub fn render(&self) -> String {
        format!(
            "{}---{}---{}---{}---{}---{}---{}",
            self.subject,
            self.predicate,
            opt(&self.qualified_predicate),
            opt(&self.qualified_object_aspect),
            opt(&self.qualified_object_direction),
            self.object,
            self.knowledge_source,
        )
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn segment(part: &str) -> Option<String> {
    if part.is_empty() {
        None
    } else {
        Some(part.to_string())
    }
}

fn opt(part: &Option<String>) -> &str {
    part.as_deref().unwrap_or("")
}

/// The tuple an edge is deduplicated on. `knowledge_source` is the raw
/// label as extracted, captured before infores normalization, so edges from
/// different raw sources never collapse even when they normalize to the
/// same infores curie.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct EdgeKey {
    pub subject: String,
    pub source_predicate: String,
    pub qualified_predicate: Option<String>,
    pub qualified_object_aspect: Option<String>,
    pub qualified_object_direction: Option<String>,
    pub object: String,
    pub knowledge_source: String,
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} /// {} /// {} /// {} /// {} /// {} /// {}",
            self.subject,
            self.source_predicate,
            opt(&self.qualified_predicate),
            opt(&self.qualified_object_aspect),
            opt(&self.qualified_object_direction),
            self.object,
            self.knowledge_source,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

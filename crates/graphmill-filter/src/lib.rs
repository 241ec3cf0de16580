//! Graph filtering and predicate remapping.
//!
//! This is the stage that turns a merged, source-shaped graph into a
//! vocabulary-shaped one. It runs as a strict batch pipeline:
//!
//! 1. [`nodes`]: stream every node, standardize its provenance against the
//!    knowledge-source remap table. One unmapped node source aborts the run
//!    on the spot.
//! 2. [`edges`]: stream every edge through the remap state machine
//!    (negation filter, rule dispatch, invert/override, self-edge filter,
//!    identifier rebuild, provenance normalization, keyed dedup), collecting
//!    audit evidence as it goes.
//! 3. [`audit`]: render every finding to stderr, then fail the run if any
//!    fatal class is non-empty. Nothing is written on a fatal outcome.
//! 4. [`build`]: append the synthetic build node and stamp the document's
//!    build info.
//!
//! [`pipeline::run_filter`] wires the stages together.

pub mod audit;
pub mod build;
pub mod config;
pub mod edges;
pub mod nodes;
pub mod pipeline;

pub use audit::{ConsistencyFinding, ConsistencyReport, EdgeAudit, FindingLevel};
pub use config::{
    load_infores_remap, load_predicate_remap, InforesMapping, InforesRemapTable,
    PredicateRemapRule, PredicateRemapTable, Qualifier, RemapOperation,
};
pub use edges::{process_edges, EdgeFilterOptions, EdgeOutcome};
pub use nodes::normalize_nodes;
pub use pipeline::{run_filter, FilterConfig, FilterSummary};

use graphmill_schema::EdgeIdError;
use thiserror::Error;

/// Progress is logged once per this many streamed records.
pub(crate) const PROGRESS_INTERVAL: u64 = 1_000_000;

#[derive(Debug, Error)]
pub enum FilterError {
    /// A node's provenance label has no infores mapping. Raised eagerly
    /// during the node pass; the run stops at the first offender.
    #[error("node {node_id} has knowledge source {source:?} with no infores mapping")]
    UnmappedNodeSource {
        node_id: String,
        // Declared raw so thiserror does not infer this String as the
        // Error::source() cause; `r#source` is the same field name as `source`.
        r#source: String,
    },

    /// A remap rule that cannot be applied as written.
    #[error("remap rule for {source_predicate:?}: {reason}")]
    MalformedRule {
        source_predicate: String,
        reason: String,
    },

    /// An edge record missing the field the state machine keys on.
    #[error("edge {edge_id} has no source predicate")]
    MissingSourcePredicate { edge_id: String },

    /// An edge record with no provenance at all.
    #[error("edge {edge_id} has no knowledge source")]
    MissingKnowledgeSource { edge_id: String },

    #[error(transparent)]
    EdgeId(#[from] EdgeIdError),

    /// The end-of-run audit found fatal inconsistencies. The individual
    /// findings have already been written to stderr by the time this is
    /// raised.
    #[error("consistency audit failed with {fatal} fatal finding(s); add the missing entries to the remap configs and rerun")]
    AuditFailed { fatal: usize },
}
